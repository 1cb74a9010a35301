use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An insertion-ordered mapping parsed from a querystring.
///
/// Keys are unique. Overwriting an existing key keeps its position,
/// inserting a new one appends it.
pub type QueryMap = IndexMap<String, QueryValue>;

/// A value in a [`QueryMap`].
///
/// - `Null`: an explicitly absent value, skipped when serializing with
///   [`Config::skip_nulls`](crate::Config::skip_nulls)
/// - `String`: a leaf value
/// - `Sequence`: repeated or indexed keys, e.g. `ids[]=1&ids[]=2`
/// - `Map`: nested keys, e.g. `user[name]=John`
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    #[default]
    Null,
    String(String),
    Sequence(Vec<QueryValue>),
    Map(QueryMap),
}

impl QueryValue {
    pub fn is_null(&self) -> bool {
        matches!(self, QueryValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&QueryMap> {
        match self {
            QueryValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[QueryValue]> {
        match self {
            QueryValue::Sequence(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Null => write!(f, "Null"),
            QueryValue::String(s) => write!(f, "{s:?}"),
            QueryValue::Sequence(s) => f.debug_list().entries(s.iter()).finish(),
            QueryValue::Map(m) => f.debug_map().entries(m.iter()).finish(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::String(s.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::String(s)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(QueryValue::Null, Into::into)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(v: Vec<T>) -> Self {
        QueryValue::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl From<QueryMap> for QueryValue {
    fn from(m: QueryMap) -> Self {
        QueryValue::Map(m)
    }
}
