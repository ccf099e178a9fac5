//! Dotted full-name helpers.

/// Join a namespace and a name, skipping the dot when either side is empty.
pub fn make_full_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        namespace.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// Namespace part of a full name (everything before the last `.`).
pub fn namespace_of(full_name: &str) -> &str {
    full_name
        .rsplit_once('.')
        .map(|(namespace, _)| namespace)
        .unwrap_or("")
}

/// Name part of a full name (everything after the last `.`).
pub fn name_of(full_name: &str) -> &str {
    full_name
        .rsplit_once('.')
        .map(|(_, name)| name)
        .unwrap_or(full_name)
}
