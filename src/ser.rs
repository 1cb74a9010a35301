//! Serialization support for querystrings.

mod encode;

use encode::encode_into;

use crate::config::ArrayFormat;
use crate::error::Result;
use crate::value::{QueryMap, QueryValue};

use std::io::Write;

/// Serializes a map into a querystring with the default [`Config`](crate::Config).
///
/// ```
/// use client_utils::{QueryMap, QueryValue};
///
/// let mut params = QueryMap::new();
/// params.insert("name".into(), "Alice".into());
/// params.insert("tags".into(), vec!["a", "b"].into());
/// params.insert("note".into(), QueryValue::Null);
///
/// assert_eq!(
///     client_utils::to_string(&params),
///     "name=Alice&tags%5B0%5D=a&tags%5B1%5D=b&note="
/// );
/// ```
pub fn to_string(input: &QueryMap) -> String {
    crate::Config::default().serialize_string(input)
}

/// Serializes a map into a generic writer object.
pub fn to_writer<W: Write>(input: &QueryMap, writer: &mut W) -> Result<()> {
    crate::Config::default().serialize_to_writer(input, writer)
}

/// A serializer for the querystring format.
///
/// The serializer maintains a key stack to build nested paths. For example,
/// when serializing `{user: {name: "John"}}`, it pushes `user` onto the
/// stack, then `[name]`, and writes `user[name]=John`.
pub struct QsSerializer<W: Write> {
    writer: W,
    first_kv: bool,
    key: Vec<Vec<u8>>,
    config: crate::Config,
}

impl<W: Write> QsSerializer<W> {
    /// Creates a new `QsSerializer` with the given writer.
    pub fn new(writer: W, config: crate::Config) -> Self {
        Self {
            writer,
            first_kv: true,
            key: Vec::with_capacity(4),
            config,
        }
    }

    pub fn serialize_map(&mut self, map: &QueryMap) -> Result<()> {
        for (key, value) in map {
            self.push_key(key);
            self.serialize_value(value)?;
            self.key.pop();
        }
        Ok(())
    }

    fn serialize_value(&mut self, value: &QueryValue) -> Result<()> {
        match value {
            QueryValue::Null if self.config.skip_nulls => Ok(()),
            QueryValue::Null => self.write_unit(),
            QueryValue::String(s) => self.write_value(s),
            QueryValue::Sequence(seq) => {
                for (idx, item) in seq.iter().enumerate() {
                    match self.config.array_format {
                        // positions past the array limit would parse back as map keys
                        ArrayFormat::Indexed if idx > self.config.array_limit => self.push_key(""),
                        ArrayFormat::Indexed => {
                            let mut buffer = itoa::Buffer::new();
                            self.push_key(buffer.format(idx));
                        }
                        ArrayFormat::EmptyIndexed => self.push_key(""),
                        ArrayFormat::Unindexed => {
                            self.serialize_value(item)?;
                            continue;
                        }
                    }
                    self.serialize_value(item)?;
                    self.key.pop();
                }
                Ok(())
            }
            QueryValue::Map(map) => self.serialize_map(map),
        }
    }

    /// Pushes a new key segment onto the key stack for nested structures.
    ///
    /// - First key "user" becomes: `user`
    /// - Second key "name" becomes: `user[name]`
    /// - Third key "first" becomes: `user[name][first]`
    ///
    /// A nested key that is already bracketed, like the `[g][h]` left over
    /// by a key deeper than `max_depth`, is written without another pair
    /// of brackets so that it parses back to the same segment.
    fn push_key(&mut self, newkey: &str) {
        let first_key_segment = self.key.is_empty();
        let form = self.config.use_form_encoding;

        let mut segment = Vec::with_capacity(newkey.len() + if form { 6 } else { 2 });
        if first_key_segment {
            encode_into(&mut segment, newkey, form);
        } else if newkey.starts_with('[') && newkey.ends_with(']') {
            push_bracketed(&mut segment, newkey, form);
        } else {
            segment.extend_from_slice(if form { b"%5B" } else { b"[" });
            encode_into(&mut segment, newkey, form);
            segment.extend_from_slice(if form { b"%5D" } else { b"]" });
        }
        self.key.push(segment);
    }

    fn write_key_stack(&mut self) -> Result<()> {
        if self.first_kv {
            self.first_kv = false;
        } else {
            self.writer.write_all(b"&")?;
        }
        for segment in &self.key {
            self.writer.write_all(segment)?;
        }
        Ok(())
    }

    fn write_value(&mut self, value: &str) -> Result<()> {
        self.write_key_stack()?;
        self.writer.write_all(b"=")?;
        let mut encoded = Vec::with_capacity(value.len());
        encode_into(&mut encoded, value, self.config.use_form_encoding);
        self.writer.write_all(&encoded)?;
        Ok(())
    }

    fn write_unit(&mut self) -> Result<()> {
        self.write_key_stack()?;
        self.writer.write_all(b"=")?;
        Ok(())
    }
}

/// Encodes a key segment whose brackets are part of the key structure.
/// With the minimal encoding those brackets stay readable.
fn push_bracketed(out: &mut Vec<u8>, segment: &str, form: bool) {
    if form {
        encode_into(out, segment, form);
        return;
    }
    let mut rest = segment;
    while let Some(pos) = rest.find(['[', ']']) {
        encode_into(out, &rest[..pos], form);
        out.push(rest.as_bytes()[pos]);
        rest = &rest[pos + 1..];
    }
    encode_into(out, rest, form);
}
