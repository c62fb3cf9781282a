//! Ordered attribute map for tags.
//!
//! [`Attributes`] wraps an [`IndexMap`] so attributes keep the order they
//! were written in. The empty-string key holds the shorthand tag value of
//! `[name=value]`, which always comes first when present.
//!
//! ## Examples
//!
//! ```rust
//! use bbmark::Attributes;
//!
//! let mut attrs = Attributes::new();
//! attrs.insert("".to_string(), "http://example.com".to_string());
//! attrs.insert("title".to_string(), "Example".to_string());
//!
//! assert_eq!(attrs.tag_value(), Some("http://example.com"));
//! assert_eq!(attrs.get("title"), Some("Example"));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key under which the `[name=value]` shorthand is stored.
pub const TAG_VALUE_KEY: &str = "";

/// An insertion-ordered map of attribute names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    /// Creates an empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Attributes(IndexMap::new())
    }

    /// Inserts an attribute, returning the previous value for that name.
    ///
    /// A repeated name keeps its original position and takes the new value.
    pub fn insert(&mut self, name: String, value: String) -> Option<String> {
        self.0.insert(name, value)
    }

    /// Returns the value of the named attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns the shorthand `[name=value]` value, if any.
    #[must_use]
    pub fn tag_value(&self) -> Option<&str> {
        self.get(TAG_VALUE_KEY)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates over attribute names in source order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, String)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Attributes(IndexMap::from_iter(iter))
    }
}

impl IntoIterator for Attributes {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let attrs: Attributes = [("z", "1"), ("", "v"), ("a", "2")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let names: Vec<_> = attrs.names().collect();
        assert_eq!(names, vec!["z", "", "a"]);
        assert_eq!(attrs.tag_value(), Some("v"));
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut attrs = Attributes::new();
        attrs.insert("a".to_string(), "1".to_string());
        attrs.insert("b".to_string(), "2".to_string());
        assert_eq!(attrs.insert("a".to_string(), "3".to_string()), Some("1".to_string()));
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut attrs = Attributes::new();
        attrs.insert("".to_string(), "red".to_string());
        let json = serde_json::to_string(&attrs).unwrap();
        assert_eq!(json, r#"{"":"red"}"#);
    }
}
