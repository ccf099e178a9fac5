//! Compiled type model the validators run against.
//!
//! Type resolution itself happens in the schema compiler; this module only
//! holds its output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "lowercase")]
pub enum FieldType {
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
    /// Enum type by full name.
    Enum(String),
    /// Nested record type by full name.
    Bean(String),
    List(Box<FieldType>),
    Array(Box<FieldType>),
    Map(Box<FieldType>, Box<FieldType>),
}

impl FieldType {
    /// Plain text type. Localized or structured types do not count.
    pub fn is_string_like(&self) -> bool {
        matches!(self, FieldType::String)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, FieldType::Int | FieldType::Long)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Int | FieldType::Long | FieldType::Float | FieldType::Double
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => f.write_str("bool"),
            FieldType::Int => f.write_str("int"),
            FieldType::Long => f.write_str("long"),
            FieldType::Float => f.write_str("float"),
            FieldType::Double => f.write_str("double"),
            FieldType::String => f.write_str("string"),
            FieldType::Enum(name) | FieldType::Bean(name) => f.write_str(name),
            FieldType::List(element) => write!(f, "list,{element}"),
            FieldType::Array(element) => write!(f, "array,{element}"),
            FieldType::Map(key, value) => write!(f, "map,{key},{value}"),
        }
    }
}

/// A validator attached to a field, e.g. `codename(TbItem, TbSkill)`.
///
/// `args` keeps the raw argument text including its enclosing brackets;
/// each validator parses it during compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDecl {
    pub tag: String,
    pub args: String,
}

impl ValidatorDecl {
    pub fn new(tag: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            args: args.into(),
        }
    }
}

fn is_tag_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

impl FromStr for ValidatorDecl {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = |reason: &str| ModelError::InvalidValidatorDecl {
            raw: s.to_string(),
            reason: reason.to_string(),
        };
        let split = text.find(|ch: char| !is_tag_char(ch)).unwrap_or(text.len());
        let (tag, rest) = text.split_at(split);
        if tag.is_empty() {
            return Err(invalid("missing validator tag"));
        }
        let args = rest.trim();
        if let Some(open) = args.chars().next() {
            let close = match open {
                '(' => ')',
                '[' => ']',
                '{' => '}',
                _ => return Err(invalid("arguments must be wrapped in (), [] or {}")),
            };
            if !args.ends_with(close) || args.len() < 2 {
                return Err(invalid("unbalanced argument brackets"));
            }
        }
        Ok(Self::new(tag, args))
    }
}

impl fmt::Display for ValidatorDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tag, self.args)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub validators: Vec<ValidatorDecl>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            validators: Vec::new(),
        }
    }

    pub fn with_validator(mut self, decl: ValidatorDecl) -> Self {
        self.validators.push(decl);
        self
    }
}

/// A type-checked record type (bean).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    pub full_name: String,
    pub fields: Vec<FieldDef>,
}

impl RecordType {
    pub fn new(full_name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            full_name: full_name.into(),
            fields,
        }
    }

    /// Position of a field by exact name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn require_field_index(&self, name: &str) -> Result<usize, ModelError> {
        self.field_index(name).ok_or_else(|| ModelError::UnknownField {
            record_type: self.full_name.clone(),
            field: name.to_string(),
        })
    }
}
