//! Diagnostics sink handed to validators through the context.

use std::fmt::{self, Display, Write};
use std::sync::{Mutex, PoisonError};

/// Structured key/value pairs attached to a message.
pub type Fields<'a> = &'a [(&'a str, &'a dyn Display)];

/// Receives messages from the engine and from validators.
pub trait Diagnostics: Send + Sync {
    fn debug(&self, message: &str, fields: Fields<'_>);
    fn info(&self, message: &str, fields: Fields<'_>);
    fn error(&self, message: &str, fields: Fields<'_>);
}

fn render_fields(fields: Fields<'_>) -> String {
    let mut out = String::new();
    for (idx, (key, value)) in fields.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{key}={value}");
    }
    out
}

/// Well-known keys become event fields of their own; anything else is
/// rendered into `extra`.
#[derive(Debug, Default, PartialEq, Eq)]
struct TracedFields {
    table: Option<String>,
    record: Option<String>,
    record_index: Option<String>,
    source: Option<String>,
    field: Option<String>,
    validator: Option<String>,
    value: Option<String>,
    existing: Option<String>,
    extra: Option<String>,
}

impl TracedFields {
    fn split(fields: Fields<'_>) -> Self {
        let mut traced = Self::default();
        let mut extra = Vec::new();
        for &(key, value) in fields {
            let slot = match key {
                "table" => &mut traced.table,
                "record" => &mut traced.record,
                "record_index" => &mut traced.record_index,
                "source" => &mut traced.source,
                "field" => &mut traced.field,
                "validator" => &mut traced.validator,
                "value" => &mut traced.value,
                "existing" => &mut traced.existing,
                _ => {
                    extra.push((key, value));
                    continue;
                }
            };
            *slot = Some(value.to_string());
        }
        if !extra.is_empty() {
            traced.extra = Some(render_fields(&extra));
        }
        traced
    }
}

macro_rules! trace_event {
    ($level:ident, $message:expr, $fields:expr) => {{
        let traced = TracedFields::split($fields);
        tracing::$level!(
            table = traced.table.as_deref(),
            record = traced.record.as_deref(),
            record_index = traced.record_index.as_deref(),
            source = traced.source.as_deref(),
            field = traced.field.as_deref(),
            validator = traced.validator.as_deref(),
            value = traced.value.as_deref(),
            existing = traced.existing.as_deref(),
            extra = traced.extra.as_deref(),
            "{}",
            $message
        );
    }};
}

/// Forwards to `tracing` under the `tablec_validate` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn debug(&self, message: &str, fields: Fields<'_>) {
        trace_event!(debug, message, fields);
    }

    fn info(&self, message: &str, fields: Fields<'_>) {
        trace_event!(info, message, fields);
    }

    fn error(&self, message: &str, fields: Fields<'_>) {
        trace_event!(error, message, fields);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Debug,
    Info,
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticLevel::Debug => "debug",
            DiagnosticLevel::Info => "info",
            DiagnosticLevel::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub level: DiagnosticLevel,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl DiagnosticEntry {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    entries: Mutex<Vec<DiagnosticEntry>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn errors(&self) -> Vec<DiagnosticEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level == DiagnosticLevel::Error)
            .collect()
    }

    fn push(&self, level: DiagnosticLevel, message: &str, fields: Fields<'_>) {
        let entry = DiagnosticEntry {
            level,
            message: message.to_string(),
            fields: fields
                .iter()
                .map(|(key, value)| ((*key).to_string(), value.to_string()))
                .collect(),
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn debug(&self, message: &str, fields: Fields<'_>) {
        self.push(DiagnosticLevel::Debug, message, fields);
    }

    fn info(&self, message: &str, fields: Fields<'_>) {
        self.push(DiagnosticLevel::Info, message, fields);
    }

    fn error(&self, message: &str, fields: Fields<'_>) {
        self.push(DiagnosticLevel::Error, message, fields);
    }
}
