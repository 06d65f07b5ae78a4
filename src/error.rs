use crate::{ParserError, SchemaError};

use thiserror::Error as ThisError;

/// Any fatal error surfaced by [`parse_schema`](crate::parse_schema):
/// either the parse aborted or validation rejected the declarations. The
/// first error encountered wins; there is no partial-success state.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Parser(#[from] ParserError),

    #[error("{0}")]
    Schema(#[from] SchemaError),
}
