use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid validator declaration '{raw}': {reason}")]
    InvalidValidatorDecl { raw: String, reason: String },
    #[error("invalid input file reference '{raw}': {reason}")]
    InvalidInputFile { raw: String, reason: String },
    #[error("record type {record_type} has no field named '{field}'")]
    UnknownField { record_type: String, field: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
