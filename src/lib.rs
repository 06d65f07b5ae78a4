// turns source text into an ordered sequence of lexed tokens.
mod lexer;
pub use lexer::{Lexer, LexerError, Pos, Token, TokenValue};

// The declaration nodes produced by the parser - operations, records,
// unions, enums - plus the type-reference algebra shared by all of them.
// There are many data structures but not many functions; the code that
// builds and checks them lives in the parser and api modules.
mod lang;
pub use lang::*;

// recursive-descent parser; one function per grammar production.
mod parser;
pub use parser::{parse_schema, ParserError};

// schema accumulation, validation, and the frozen query api.
mod api;
pub use api::{Schema, SchemaBuilder, SchemaError};

mod error;
pub use error::Error;

// string-templating emitters over a validated schema. no parsing, no i/o.
pub mod codegen;
