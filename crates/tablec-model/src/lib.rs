#![deny(unsafe_code)]

pub mod data;
pub mod error;
pub mod raw_table;
pub mod schema;
pub mod table;

pub use data::{DataValue, Record};
pub use error::{ModelError, Result};
pub use raw_table::{InputFileRef, RawTable, TableMode};
pub use schema::{FieldDef, FieldType, RecordType, ValidatorDecl};
pub use table::{CodenameConflict, CodenameMap, CompiledTable};
