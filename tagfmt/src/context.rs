//! Values a template is rendered with.
use indexmap::IndexMap;
use std::rc::Rc;

use crate::{Result, RuntimeError, Value, tag};

/// Caller provided values, looked up by template parameter name.
///
/// ```
/// use tagfmt::Context;
///
/// let ctx = Context::new().with("name", "Romaric").with("mood", "curious");
/// assert_eq!(ctx.get("name").and_then(|e| e.as_str()), Some("Romaric"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: IndexMap<Rc<str>, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build context from json object.
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(RuntimeError::Type {
                expected: "object",
                found: Value::from(other).type_name(),
            }
            .into()),
        }
    }

    pub fn with(mut self, name: impl Into<Rc<str>>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<Rc<str>>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (&**k, v))
    }
}

impl<K: Into<Rc<str>>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<Context> for Value {
    fn from(value: Context) -> Self {
        Value::Record(Rc::new(value.values))
    }
}

/// Ambient scope, the fallback for parameters missing in [`Context`].
///
/// By default, contains the template tag and `escape`.
#[derive(Debug, Clone)]
pub struct Globals {
    values: Context,
}

impl Globals {
    /// Default tag name.
    pub const TAG: &str = "html";

    /// Globals without any value.
    pub fn empty() -> Self {
        Self { values: Context::new() }
    }

    /// Globals with [`tag_fn`][tag::tag_fn] under `name`, and [`escape_fn`][tag::escape_fn].
    pub fn with_tag(name: &str) -> Self {
        Self::empty()
            .with("escape", tag::escape_fn())
            .with(name, tag::tag_fn())
    }

    pub fn with(mut self, name: impl Into<Rc<str>>, value: impl Into<Value>) -> Self {
        self.values.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<Rc<str>>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name, value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

impl Default for Globals {
    fn default() -> Self {
        Self::with_tag(Self::TAG)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_json() {
        let json = serde_json::json!({ "name": "Romaric", "age": 30 });
        let ctx = Context::from_json(json).unwrap();
        assert_eq!(ctx.get("age"), Some(&Value::Int(30)));
        assert_eq!(ctx.iter().map(|(k, _)| k).collect::<Vec<_>>(), ["name", "age"]);
    }

    #[test]
    fn from_json_not_object() {
        let err = Context::from_json(serde_json::json!([1])).unwrap_err();
        assert_eq!(err.to_string(), "expected object, found list");
    }

    #[test]
    fn default_globals() {
        let globals = Globals::default();
        assert!(globals.get("html").and_then(Value::as_func).is_some());
        assert!(globals.get("escape").and_then(Value::as_func).is_some());
        assert!(Globals::empty().get("html").is_none());
    }
}
