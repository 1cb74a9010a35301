use std::io::Write;

use crate::error::Result;
use crate::value::QueryMap;
use crate::{de, ser};

/// Configuration for parsing and serializing querystrings.
///
/// ## Nesting Depth
///
/// The `max_depth` parameter controls how many bracketed segments of a key
/// are expanded into nested maps. Anything deeper is kept as one literal
/// key segment. A `max_depth` of 0 means no nesting at all (flat key-value
/// pairs only).
///
/// Default value: `max_depth = 5`
///
/// ```
/// use client_utils::{Config, QueryValue};
///
/// let config = Config::new().max_depth(0);
/// let map = config.deserialize_str("a[b][c]=1");
/// assert_eq!(map.get("a[b][c]").and_then(QueryValue::as_str), Some("1"));
///
/// let map = Config::new().deserialize_str("a[b][c]=1");
/// let c = map["a"].as_map().unwrap()["b"].as_map().unwrap()["c"].as_str();
/// assert_eq!(c, Some("1"));
/// ```
///
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) max_depth: usize,
    pub(crate) array_limit: usize,
    pub(crate) parameter_limit: usize,
    pub(crate) use_form_encoding: bool,
    pub(crate) array_format: ArrayFormat,
    pub(crate) skip_nulls: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayFormat {
    /// Use the `a[0]=1&a[1]=2` format.
    Indexed,
    /// Use the `a[]=1&a[]=2` format.
    EmptyIndexed,
    /// Use the `a=1&a=2` format.
    Unindexed,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            max_depth: 5,
            array_limit: 20,
            parameter_limit: 1000,
            use_form_encoding: true,
            array_format: ArrayFormat::Indexed,
            skip_nulls: false,
        }
    }

    /// Specifies the maximum number of bracketed key segments that will
    /// be expanded while parsing. Default is 5.
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Specifies the largest index in `a[n]=...` that is still parsed as a
    /// sequence position. Larger indices become plain map keys. Default is 20.
    pub const fn array_limit(mut self, array_limit: usize) -> Self {
        self.array_limit = array_limit;
        self
    }

    /// Specifies how many `&`-separated pairs are read while parsing. The
    /// rest of the input is ignored. Default is 1000.
    pub const fn parameter_limit(mut self, parameter_limit: usize) -> Self {
        self.parameter_limit = parameter_limit;
        self
    }

    /// By default, querystrings are written the way `qs.stringify` writes
    /// them: everything except the RFC 3986 unreserved characters is
    /// percent-encoded, including spaces (`%20`) and the brackets of
    /// nested keys.
    ///
    /// e.g. `{ a: { b: "red car" } }` will be encoded as `a%5Bb%5D=red%20car`
    ///
    /// Set this to `false` for the laxer query encoding defined by
    /// [WHATWG](https://url.spec.whatwg.org/#query-percent-encode-set),
    /// which writes spaces as `+` and leaves the brackets of nested keys
    /// readable: `a[b]=red+car`.
    pub const fn use_form_encoding(mut self, use_form_encoding: bool) -> Self {
        self.use_form_encoding = use_form_encoding;
        self
    }

    /// Specifies how sequences are written during serialization.
    ///
    /// The default is `Indexed`, which results in keys like `a[0]=1&a[1]=2`.
    pub const fn array_format(mut self, array_format: ArrayFormat) -> Self {
        self.array_format = array_format;
        self
    }

    /// When set, `Null` values are left out of the serialized output
    /// instead of being written as `key=`.
    pub const fn skip_nulls(mut self, skip_nulls: bool) -> Self {
        self.skip_nulls = skip_nulls;
        self
    }

    /// Parses a querystring from a `&str` using this `Config`.
    pub fn deserialize_str(self, input: &str) -> QueryMap {
        de::parse(input, self)
    }

    /// Serializes a map to a querystring using this `Config`.
    pub fn serialize_string(self, input: &QueryMap) -> String {
        // initialize the buffer with 128 bytes
        // this is a guess based on what `serde_json` does
        let mut buffer = Vec::with_capacity(128);
        let mut serializer = ser::QsSerializer::new(&mut buffer, self);
        if serializer.serialize_map(input).is_err() {
            // writing into a `Vec` cannot fail
            return String::new();
        }
        match String::from_utf8(buffer) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    /// Serializes a map to a querystring using this `Config`.
    pub fn serialize_to_writer<W: Write>(self, input: &QueryMap, writer: &mut W) -> Result<()> {
        let mut serializer = ser::QsSerializer::new(writer, self);
        serializer.serialize_map(input)
    }
}
