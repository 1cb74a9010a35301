//! Recursive merging of string-keyed maps.
//!
//! [`deep_merge`] combines a `base` map with an `overrides` map. Nested maps
//! present on both sides are merged recursively. For every other key that
//! `base` holds, the value from `base` is kept, replacing whatever
//! `overrides` had. Keys found only in `overrides` pass through untouched.
//!
//! ```
//! use client_utils::deep_merge;
//! use serde_json::json;
//!
//! let base = json!({ "a": { "x": 1 } });
//! let overrides = json!({ "a": { "x": 2, "y": 3 } });
//! let merged = deep_merge(base.as_object().unwrap(), overrides.as_object());
//! assert_eq!(json!(merged.into_owned()), json!({ "a": { "x": 1, "y": 3 } }));
//! ```

use std::borrow::Cow;

use crate::value::{QueryMap, QueryValue};

/// A string-keyed map whose values may themselves be maps.
pub trait MergeMap: Clone {
    type Value: Clone;

    fn entries(&self) -> impl Iterator<Item = (&str, &Self::Value)>;

    fn value(&self, key: &str) -> Option<&Self::Value>;

    /// Stores `value`, keeping the position of an existing key.
    fn set(&mut self, key: &str, value: Self::Value);

    /// Returns the nested map if `value` is one.
    fn as_map(value: &Self::Value) -> Option<&Self>;

    fn into_value(map: Self) -> Self::Value;
}

/// Merges `overrides` into a copy of `base`.
///
/// Nested maps on both sides merge recursively; for any other key in `base`
/// the base value wins. Returns `base` itself when there is nothing to merge.
pub fn deep_merge<'a, M: MergeMap>(base: &'a M, overrides: Option<&M>) -> Cow<'a, M> {
    let Some(overrides) = overrides else {
        return Cow::Borrowed(base);
    };

    let mut output = overrides.clone();
    for (key, base_value) in base.entries() {
        let nested = M::as_map(base_value).zip(overrides.value(key).and_then(M::as_map));
        let merged = match nested {
            Some((base_map, override_map)) => {
                M::into_value(deep_merge(base_map, Some(override_map)).into_owned())
            }
            None => base_value.clone(),
        };
        output.set(key, merged);
    }
    Cow::Owned(output)
}

impl MergeMap for QueryMap {
    type Value = QueryValue;

    fn entries(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn value(&self, key: &str) -> Option<&QueryValue> {
        self.get(key)
    }

    fn set(&mut self, key: &str, value: QueryValue) {
        self.insert(key.to_owned(), value);
    }

    fn as_map(value: &QueryValue) -> Option<&Self> {
        value.as_map()
    }

    fn into_value(map: Self) -> QueryValue {
        QueryValue::Map(map)
    }
}

impl MergeMap for serde_json::Map<String, serde_json::Value> {
    type Value = serde_json::Value;

    fn entries(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn value(&self, key: &str) -> Option<&serde_json::Value> {
        self.get(key)
    }

    fn set(&mut self, key: &str, value: serde_json::Value) {
        self.insert(key.to_owned(), value);
    }

    fn as_map(value: &serde_json::Value) -> Option<&Self> {
        value.as_object()
    }

    fn into_value(map: Self) -> serde_json::Value {
        serde_json::Value::Object(map)
    }
}
