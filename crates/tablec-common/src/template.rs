//! Single-placeholder format templates.
//!
//! Naming options such as `Tb{0}` or `{0}Config` are parsed once up front so
//! a malformed template is reported as configuration trouble instead of
//! surfacing halfway through an import.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced while parsing a [`FormatTemplate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A `{` was never closed.
    #[error("unterminated placeholder at offset {offset} in '{template}'")]
    Unterminated { template: String, offset: usize },

    /// A placeholder other than `{0}` was used.
    #[error("unsupported placeholder '{{{placeholder}}}' in '{template}', only {{0}} is allowed")]
    UnsupportedPlaceholder {
        template: String,
        placeholder: String,
    },

    /// A lone `}` without a matching `{`.
    #[error("unmatched '}}' at offset {offset} in '{template}'")]
    UnmatchedClose { template: String, offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Placeholder,
}

/// A parsed template with zero or more `{0}` placeholders.
///
/// `{{` and `}}` escape literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    source: String,
    pieces: Vec<Piece>,
}

impl FormatTemplate {
    /// Parse a template string.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices().peekable();

        while let Some((offset, ch)) = chars.next() {
            match ch {
                '{' => {
                    if matches!(chars.peek(), Some((_, '{'))) {
                        chars.next();
                        literal.push('{');
                        continue;
                    }
                    let mut placeholder = String::new();
                    let mut closed = false;
                    for (_, inner) in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        placeholder.push(inner);
                    }
                    if !closed {
                        return Err(TemplateError::Unterminated {
                            template: template.to_string(),
                            offset,
                        });
                    }
                    if placeholder.trim() != "0" {
                        return Err(TemplateError::UnsupportedPlaceholder {
                            template: template.to_string(),
                            placeholder,
                        });
                    }
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(Piece::Placeholder);
                }
                '}' => {
                    if matches!(chars.peek(), Some((_, '}'))) {
                        chars.next();
                        literal.push('}');
                        continue;
                    }
                    return Err(TemplateError::UnmatchedClose {
                        template: template.to_string(),
                        offset,
                    });
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self {
            source: template.to_string(),
            pieces,
        })
    }

    /// Substitute `arg` for every placeholder.
    pub fn apply(&self, arg: &str) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Placeholder => out.push_str(arg),
            }
        }
        out
    }

    /// The template as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the template is exactly `{0}`.
    pub fn is_identity(&self) -> bool {
        self.pieces == [Piece::Placeholder]
    }
}

impl FromStr for FormatTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FormatTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
