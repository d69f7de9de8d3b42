use serde::{Deserialize, Serialize};
use std::fmt;

/// An inline constant carried by a node input or configuration field.
///
/// Unlike JSON, a literal can be `Undefined`, which is what an absent
/// configuration value turns into.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Literal {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<Literal>),
    /// Key-value pairs in declaration order.
    Map(Vec<(String, Literal)>),
}

impl Literal {
    /// A raw expression snippet. Strings are emitted verbatim, so this is just `Str`.
    pub fn expr(snippet: impl Into<String>) -> Self {
        Literal::Str(snippet.into())
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Literal::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Literal> {
        match self {
            Literal::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Literal {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Literal::Null,
            Value::Bool(b) => Literal::Bool(b),
            Value::Number(n) => Literal::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Literal::Str(s),
            Value::Array(items) => Literal::List(items.into_iter().map(Literal::from).collect()),
            Value::Object(map) => {
                Literal::Map(map.into_iter().map(|(k, v)| (k, Literal::from(v))).collect())
            }
        }
    }
}

impl From<Literal> for serde_json::Value {
    fn from(literal: Literal) -> Self {
        use serde_json::Value;
        match literal {
            Literal::Undefined | Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(b),
            Literal::Number(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Literal::Str(s) => Value::String(s),
            Literal::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Literal::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Str(s.to_string())
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

/// Renders the literal as an expression of the target language.
///
/// Strings are written verbatim, never re-quoted: they double as raw expression
/// snippets. Callers that want a string constant quote it themselves.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Undefined => write!(f, "undefined"),
            Literal::Null => write!(f, "null"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Number(n) => write!(f, "{}", format_number(*n)),
            Literal::Str(s) => write!(f, "{}", s),
            Literal::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Literal::Map(entries) => {
                if entries.is_empty() {
                    return write!(f, "{{}}");
                }
                write!(f, "{{ ")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", crate::emit::literal::property_key(key), value)?;
                }
                write!(f, " }}")
            }
        }
    }
}

/// Formats a number the way the target language would print it.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
