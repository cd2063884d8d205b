//! Diagnostic paths locating a schema inside its root.
//!
//! The root is the empty path. Children append `.field` for object fields,
//! `[i]` for tuple positions, `[*]` for the shared item of arrays and sets,
//! and `.(key)` / `.(value)` for map keys and values.

pub(crate) fn field(path: &str, name: &str) -> String {
    format!("{}.{}", path, name)
}

pub(crate) fn index(path: &str, position: usize) -> String {
    format!("{}[{}]", path, position)
}

pub(crate) fn item(path: &str) -> String {
    format!("{}[*]", path)
}

pub(crate) fn key(path: &str) -> String {
    format!("{}.(key)", path)
}

pub(crate) fn value(path: &str) -> String {
    format!("{}.(value)", path)
}

/// Render a path for messages; the root shows as `.`
pub(crate) fn display(path: &str) -> String {
    if path.is_empty() {
        ".".to_string()
    } else {
        path.to_string()
    }
}
