//! Parsing support for querystrings.

//! ### An overview of the parser
//!
//! Querystrings are parsed in two steps. The `parse` module splits the input
//! into `key=value` pairs, decodes them, and inserts each value into an
//! intermediate tree addressed by the bracketed segments of its key. Keys of
//! that tree are either integers (array positions such as `ids[0]`) or
//! strings (map keys such as `user[name]`).
//!
//! The second step turns the tree into a [`QueryMap`]. Maps whose keys are
//! all array positions are compacted into sequences, so `a[1]=x&a[0]=y`
//! becomes `["y", "x"]`.
//!
//! Parsing never fails. Fragments that cannot be placed in the tree, such as
//! a key used both as a value and as a nested map, are dropped and logged.

mod parse;

pub(crate) use parse::parse;

use crate::value::QueryMap;

/// Parses a querystring from a `&str` with the default [`Config`](crate::Config).
///
/// ```
/// use client_utils::QueryValue;
///
/// let map = client_utils::from_str("?q=cats&tags[]=a&tags[]=b&page");
/// assert_eq!(map["q"], QueryValue::from("cats"));
/// assert_eq!(map["tags"], QueryValue::from(vec!["a", "b"]));
/// assert_eq!(map["page"], QueryValue::from(""));
/// ```
pub fn from_str(input: &str) -> QueryMap {
    crate::Config::default().deserialize_str(input)
}
