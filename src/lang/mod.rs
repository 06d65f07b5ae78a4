mod names;
pub use names::TypeRef;

mod scalars;
pub use scalars::{is_scalar, SCALARS};

mod schema;
pub use schema::{Enum, FieldDef, OpKind, Operation, Record, RecordKind, Union};
