mod error;
pub use error::ParserError;

mod schema;
pub use schema::parse_schema;
