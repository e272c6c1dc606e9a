use heck::ToSnakeCase;
use proc_macro2::{Ident, Span};
use std::path::{Path, PathBuf};

pub const NAMESPACE_SEPARATOR: char = '\\';

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

// Keywords that cannot be written as raw identifiers either.
const RESERVED_PATH_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// `order_items` -> `OrderItems`.
///
/// Each `_`-separated segment is lowercased and then gets its first letter
/// uppercased, so `orderItems` becomes `Orderitems` rather than being split
/// on the case boundary.
pub fn to_class_name(table_name: &str) -> String {
    table_name
        .split('_')
        .map(|segment: &str| {
            let lower = segment.to_lowercase();
            let mut chars = lower.chars();

            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Strips any trailing separators and appends exactly one.
pub fn normalize_namespace(namespace: &str) -> String {
    let mut normalized = namespace.trim_end_matches(NAMESPACE_SEPARATOR).to_string();
    normalized.push(NAMESPACE_SEPARATOR);
    normalized
}

/// Last segment of a qualified name: `App\Entities\Customers` -> `Customers`.
pub fn short_name(qualified_name: &str) -> &str {
    qualified_name
        .rsplit(NAMESPACE_SEPARATOR)
        .next()
        .unwrap_or(qualified_name)
}

/// Where a qualified class lives below `dir`; one directory per namespace segment.
pub fn class_file_path(dir: &Path, qualified_name: &str) -> PathBuf {
    let mut path = dir.to_path_buf();

    for segment in qualified_name
        .split(NAMESPACE_SEPARATOR)
        .filter(|segment| !segment.is_empty())
    {
        path.push(segment);
    }

    path.set_extension("rs");
    path
}

/// Rust path segments for a qualified name: every namespace segment becomes a
/// snake_case module, the final segment is kept verbatim.
///
/// `Base\Entity` -> `["base", "Entity"]`
pub fn rust_path_segments(qualified_name: &str) -> Vec<String> {
    let segments: Vec<&str> = qualified_name
        .split(NAMESPACE_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect();

    match segments.split_last() {
        Some((last, modules)) => modules
            .iter()
            .map(|module| module.to_snake_case())
            .chain(std::iter::once(last.to_string()))
            .collect(),
        None => Vec::new(),
    }
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            name != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Identifier for `name`, written as `r#name` when it is a keyword.
/// `None` when `name` cannot be a Rust identifier at all.
pub fn rust_ident(name: &str) -> Option<Ident> {
    if !is_identifier(name) || RESERVED_PATH_KEYWORDS.contains(&name) {
        return None;
    }

    if KEYWORDS.contains(&name) {
        Some(Ident::new_raw(name, Span::call_site()))
    } else {
        Some(Ident::new(name, Span::call_site()))
    }
}
