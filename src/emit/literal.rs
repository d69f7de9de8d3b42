//! Helpers for turning names and constants into target-language source text.

use crate::ir::Literal;
use itertools::Itertools;

/// Whether `s` can be written as a bare identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Whether `expr` can be repeated in emitted code without re-evaluating anything
/// expensive: identifiers, numbers and plain member chains.
pub fn is_simple(expr: &str) -> bool {
    !expr.is_empty()
        && expr
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.')
}

/// Wraps `expr` in parentheses unless it is already simple.
pub fn atom(expr: &str) -> String {
    if is_simple(expr) {
        expr.to_string()
    } else {
        format!("({})", expr)
    }
}

/// Quotes a string as a string literal.
pub fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s.replace('"', "\\\"")))
}

/// Renders an object key, quoting it when it is not an identifier.
pub fn property_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        js_string(key)
    }
}

/// Builds a settings object from key/value pairs, dropping `undefined` entries.
pub fn settings_object(entries: &[(String, Literal)]) -> String {
    let kept = entries
        .iter()
        .filter(|(_, value)| !value.is_undefined())
        .map(|(key, value)| format!("{}: {}", property_key(key), value))
        .collect::<Vec<_>>();
    if kept.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", kept.join(", "))
    }
}

/// Recursively quotes every string so the literal reads as data, not code.
pub fn quote_strings(literal: &Literal) -> Literal {
    match literal {
        Literal::Str(s) => Literal::Str(js_string(s)),
        Literal::List(items) => Literal::List(items.iter().map(quote_strings).collect()),
        Literal::Map(entries) => Literal::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), quote_strings(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Replaces every character that is not ASCII alphanumeric with `_`.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// The function name a task compiles to.
pub fn task_identifier(name: &str) -> String {
    format!("task_{}", sanitize_identifier(name))
}

/// Splits a dot-delimited path into trimmed, non-empty segments.
pub fn split_path(path: &str) -> Vec<String> {
    path.split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// `base.a.b`, switching to bracket access for segments that are not identifiers.
pub fn member_path(base: &str, path: &str) -> String {
    split_path(path).iter().fold(base.to_string(), |acc, segment| {
        if is_identifier(segment) {
            format!("{}.{}", acc, segment)
        } else {
            format!("{}[{}]", acc, js_string(segment))
        }
    })
}

/// `[a, b, c]` from already-rendered expressions.
pub fn list(items: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    format!("[{}]", items.into_iter().map(|i| i.as_ref().to_string()).join(", "))
}
