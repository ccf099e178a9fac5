//! Identifier normalization.
//!
//! Namespaces are dot-separated; every segment is rendered in PascalCase.
//! Both functions are pure and idempotent.

/// Characters that separate words inside a namespace segment.
fn is_word_separator(ch: char) -> bool {
    ch == '_' || ch == '-' || ch.is_whitespace()
}

/// Convert a single segment to PascalCase.
///
/// Words are split on `_`, `-` and whitespace. The first character of each
/// word is upper-cased, the rest is kept as written, so `weapon_list` becomes
/// `WeaponList` and `HTTPServer` stays `HTTPServer`.
pub fn to_pascal_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for word in segment.split(is_word_separator).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Normalize a raw name into a namespace-style identifier.
///
/// ```
/// use tablec_common::format_namespace;
///
/// assert_eq!(format_namespace("item.weapon_list"), "Item.WeaponList");
/// assert_eq!(format_namespace("Item.WeaponList"), "Item.WeaponList");
/// ```
pub fn format_namespace(raw: &str) -> String {
    raw.split('.')
        .map(to_pascal_case)
        .collect::<Vec<_>>()
        .join(".")
}
