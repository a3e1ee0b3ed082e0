use crate::Error;
use serde::Serialize;
use serde_json::{to_value, Map, Value};
use std::collections::HashMap;

/// Resolves names to values while an expression is evaluated.
///
/// Implemented by [`Context`], and by [`Binding`] which layers a single
/// loop variable over another `Lookup`.
pub trait Lookup {
    /// Return the value of the given name, if any.
    fn lookup(&self, name: &str) -> Option<&Value>;
}

/// Provides storage for data that templates can be rendered against.
///
/// # Examples
///
/// ```
/// use hashblock::{Context, Lookup};
///
/// let context = Context::new()
///     .with("lat", 34.2)
///     .unwrap()
///     .with("range", 20)
///     .unwrap();
///
/// assert!(context.lookup("lat").is_some());
/// assert!(context.lookup("data").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    data: HashMap<String, Value>,
}

impl Context {
    /// Create a new Context.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Insert the value into the Context.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    pub fn insert<S, T>(&mut self, key: S, value: T) -> Result<(), Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        let serialized = to_value(value)?;
        self.data.insert(key.into(), serialized);

        Ok(())
    }

    /// Insert the value into the Context.
    ///
    /// Returns the Context, so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    pub fn with<S, T>(mut self, key: S, value: T) -> Result<Self, Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Insert an already converted [`Value`] into the Context.
    #[inline]
    pub fn insert_value<S>(&mut self, key: S, value: Value)
    where
        S: Into<String>,
    {
        self.data.insert(key.into(), value);
    }

    /// Insert an already converted [`Value`] into the Context.
    ///
    /// Returns the Context, so additional methods may be chained.
    #[inline]
    pub fn with_value<S>(mut self, key: S, value: Value) -> Self
    where
        S: Into<String>,
    {
        self.insert_value(key, value);
        self
    }

    /// Get the value of the given key, if any.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

impl Lookup for Context {
    #[inline]
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

impl From<Map<String, Value>> for Context {
    fn from(value: Map<String, Value>) -> Self {
        Self {
            data: value.into_iter().collect(),
        }
    }
}

impl TryFrom<Value> for Context {
    type Error = Error;

    /// Create a Context from the fields of a [`Value::Object`].
    ///
    /// Fails with [`Error::Serialize`] for any other kind of `Value`.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self::from(map)),
            other => Err(Error::Serialize(serde::de::Error::custom(format!(
                "a context must be built from an object, found `{other}`"
            )))),
        }
    }
}

/// A single name layered over another [`Lookup`].
///
/// The parent is borrowed rather than copied, and the name shadows any
/// value the parent has under the same name.
///
/// # Examples
///
/// ```
/// use hashblock::{evaluate, Binding, Context};
/// use serde_json::json;
///
/// let context = Context::new().with_value("range", json!(20));
/// let grade = json!("A");
/// let binding = Binding::new(&context, "grade", &grade);
///
/// assert_eq!(evaluate("grade + range", &binding).unwrap(), json!("A20"));
/// ```
pub struct Binding<'a> {
    parent: &'a dyn Lookup,
    name: &'a str,
    value: &'a Value,
}

impl<'a> Binding<'a> {
    /// Create a new [`Binding`] of `name` to `value` over `parent`.
    #[inline]
    pub fn new(parent: &'a dyn Lookup, name: &'a str, value: &'a Value) -> Self {
        Self {
            parent,
            name,
            value,
        }
    }
}

impl Lookup for Binding<'_> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        if name == self.name {
            Some(self.value)
        } else {
            self.parent.lookup(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Binding, Context, Lookup};
    use crate::Error;
    use serde_json::json;

    #[test]
    fn test_insert() {
        let mut context = Context::new();
        context.insert("one", "two").unwrap();

        assert!(context
            .get("one")
            .is_some_and(|t| t.as_str().unwrap() == "two"));
    }

    #[test]
    fn test_insert_fluent() {
        assert!(Context::new()
            .with("three", "four")
            .unwrap()
            .get("three")
            .is_some_and(|t| t.as_str().unwrap() == "four"))
    }

    #[test]
    fn test_from_object() {
        let context = Context::try_from(json!({ "value": "<3", "cond": true })).unwrap();

        assert_eq!(context.lookup("cond"), Some(&json!(true)));
        assert!(matches!(
            Context::try_from(json!([1, 2])),
            Err(Error::Serialize(_))
        ));
    }

    #[test]
    fn test_binding_shadows_parent() {
        let context = Context::new()
            .with_value("item", json!("outer"))
            .with_value("other", json!(1));
        let inner = json!("inner");
        let binding = Binding::new(&context, "item", &inner);

        assert_eq!(binding.lookup("item"), Some(&json!("inner")));
        assert_eq!(binding.lookup("other"), Some(&json!(1)));
        assert_eq!(context.lookup("item"), Some(&json!("outer")));
    }

    #[test]
    fn test_binding_nested() {
        let context = Context::new();
        let first = json!(1);
        let second = json!(2);
        let outer = Binding::new(&context, "a", &first);
        let inner = Binding::new(&outer, "b", &second);

        assert_eq!(inner.lookup("a"), Some(&json!(1)));
        assert_eq!(inner.lookup("b"), Some(&json!(2)));
        assert_eq!(outer.lookup("b"), None);
    }
}
