//! Attribute and style arguments
//!
//! A props argument is either one key/value pair or an ordered list of them.
//! Values keep the loose typing of markup attributes: a string, a boolean
//! flag, or for the reserved `event` key a listener.

use std::fmt;
use std::rc::Rc;

use dom::{Document, DomEvent, Listener};

/// Attribute value
#[derive(Clone)]
pub enum Value {
    Text(String),
    Flag(bool),
    /// Only meaningful under the `event` key
    Listener { event: String, callback: Listener },
}

impl Value {
    pub fn listener<F>(event: &str, callback: F) -> Self
    where
        F: Fn(&mut Document, &DomEvent) + 'static,
    {
        Value::Listener {
            event: event.to_string(),
            callback: Rc::new(callback),
        }
    }

    /// Attribute text, `None` when the value is falsy (`""` or `false`)
    ///
    /// `true` becomes the empty string, which serializes as a bare
    /// boolean attribute.
    pub fn attribute_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) if text.is_empty() => None,
            Value::Text(text) => Some(text.as_str()),
            Value::Flag(true) => Some(""),
            Value::Flag(false) => None,
            Value::Listener { .. } => None,
        }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Value::Text(text) => text.as_str(),
            Value::Flag(true) => "true",
            Value::Flag(false) | Value::Listener { .. } => "",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Value::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            Value::Listener { event, .. } => f
                .debug_struct("Listener")
                .field("event", event)
                .finish_non_exhaustive(),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Flag(flag)
    }
}

/// One pair or an ordered list of pairs
#[derive(Debug, Clone)]
pub enum Props<V = Value> {
    Single(String, V),
    Bulk(Vec<(String, V)>),
}

impl<V> Props<V> {
    pub fn bulk() -> Self {
        Props::Bulk(Vec::new())
    }

    /// Append a pair, turning a single pair into a list
    pub fn with(self, key: impl Into<String>, value: impl Into<V>) -> Self {
        let mut pairs = match self {
            Props::Single(k, v) => vec![(k, v)],
            Props::Bulk(pairs) => pairs,
        };
        pairs.push((key.into(), value.into()));
        Props::Bulk(pairs)
    }
}

impl<V, K, W> From<(K, W)> for Props<V>
where
    K: Into<String>,
    W: Into<V>,
{
    fn from((key, value): (K, W)) -> Self {
        Props::Single(key.into(), value.into())
    }
}

impl<V, K, W> From<Vec<(K, W)>> for Props<V>
where
    K: Into<String>,
    W: Into<V>,
{
    fn from(pairs: Vec<(K, W)>) -> Self {
        Props::Bulk(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<V, K, W, const N: usize> From<[(K, W); N]> for Props<V>
where
    K: Into<String>,
    W: Into<V>,
{
    fn from(pairs: [(K, W); N]) -> Self {
        Props::Bulk(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falsy_values() {
        assert_eq!(Value::from("").attribute_text(), None);
        assert_eq!(Value::from(false).attribute_text(), None);
        assert_eq!(Value::from(true).attribute_text(), Some(""));
        assert_eq!(Value::from("x").attribute_text(), Some("x"));
    }

    #[test]
    fn test_with_promotes_to_bulk() {
        let props = Props::<Value>::from(("id", "a")).with("title", "b");
        match props {
            Props::Bulk(pairs) => {
                let keys: Vec<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, ["id", "title"]);
            }
            Props::Single(..) => panic!("expected bulk props"),
        }
    }
}
