use std::fmt;

use serde::{Deserialize, Serialize};

/// A loaded, type-checked field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum DataValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Enum item name.
    Enum(String),
    Bean(Vec<DataValue>),
    List(Vec<DataValue>),
    Map(Vec<(DataValue, DataValue)>),
}

impl DataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(text) | DataValue::Enum(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Int(value) => Some(*value as f64),
            DataValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Unquoted text used for primary keys and record paths.
    pub fn as_key(&self) -> String {
        match self {
            DataValue::String(text) | DataValue::Enum(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Renders strings quoted so text and numbers stay distinguishable in reports.
impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => f.write_str("null"),
            DataValue::Bool(value) => write!(f, "{value}"),
            DataValue::Int(value) => write!(f, "{value}"),
            DataValue::Float(value) => write!(f, "{value}"),
            DataValue::String(text) => write!(f, "\"{text}\""),
            DataValue::Enum(name) => f.write_str(name),
            DataValue::Bean(fields) => write_seq(f, '{', '}', fields),
            DataValue::List(items) => write_seq(f, '[', ']', items),
            DataValue::Map(entries) => {
                f.write_str("{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: char, close: char, items: &[DataValue]) -> fmt::Result {
    write!(f, "{open}")?;
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

/// One data record, values aligned with its record type's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub values: Vec<DataValue>,
    /// File the record was loaded from (`Sheet@path` for sub-units).
    pub source: String,
}

impl Record {
    pub fn new(values: Vec<DataValue>, source: impl Into<String>) -> Self {
        Self {
            values,
            source: source.into(),
        }
    }

    pub fn value(&self, index: usize) -> Option<&DataValue> {
        self.values.get(index)
    }
}
