//! Validator argument grammar.
//!
//! `(a, b)`, `[a, b]`, `{a, b}` and `a, b` all yield `["a", "b"]`. Only one
//! enclosing pair is stripped, and only when the brackets match.

const BRACKETS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

/// Remove one matching pair of enclosing brackets, if present.
pub fn strip_brackets(raw: &str) -> &str {
    let trimmed = raw.trim();
    BRACKETS
        .iter()
        .find_map(|&(open, close)| trimmed.strip_prefix(open)?.strip_suffix(close))
        .unwrap_or(trimmed)
}

/// Split a raw argument string into trimmed terms.
///
/// Blank input yields no terms. Blank terms between commas are kept so
/// positional arguments can be left empty (`range(,10)`).
pub fn parse_args(raw: &str) -> Vec<String> {
    let inner = strip_brackets(raw);
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split(',').map(|term| term.trim().to_string()).collect()
}
