use std::fmt;

use indexmap::IndexMap;

use crate::Config;
use crate::value::{QueryMap, QueryValue};

mod decode;

type ParsedMap = IndexMap<Key, ParsedValue>;

/// Represents a key in the intermediate tree.
///
/// Keys can be either integers (for array positions) or strings (for object
/// keys). This allows the parser to handle both `items[0]=foo` (integer key)
/// and `user[name]=bar` (string key) notations.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Key {
    Int(usize),
    String(String),
}

impl Key {
    /// Integer segments within the array limit address sequence positions.
    /// Anything else, including zero-padded numbers like `01`, is a string key.
    fn from_segment(segment: &str, array_limit: usize) -> Self {
        let canonical = !segment.is_empty()
            && segment.bytes().all(|b| b.is_ascii_digit())
            && !(segment.len() > 1 && segment.starts_with('0'));
        if canonical {
            if let Ok(index) = segment.parse::<usize>() {
                if index <= array_limit {
                    return Key::Int(index);
                }
            }
        }
        Key::String(segment.to_owned())
    }

    fn is_index(&self) -> bool {
        matches!(self, Key::Int(_))
    }

    fn into_string(self) -> String {
        match self {
            Key::Int(i) => i.to_string(),
            Key::String(s) => s,
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(i) => write!(f, "{i}"),
            Key::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// An intermediate representation of the parsed query string.
///
/// - `Map`: Nested objects like `user[name]=John&user[age]=30`
/// - `Sequence`: Arrays like `ids[]=1&ids[]=2` or repeated keys
/// - `String`: Leaf values containing the decoded data
/// - `Uninitialized`: Used during parsing for placeholder values
#[derive(Debug, PartialEq)]
enum ParsedValue {
    Map(ParsedMap),
    Sequence(Vec<ParsedValue>),
    String(String),
    Uninitialized,
}

impl ParsedValue {
    /// Converts the tree into its public form. Placeholders left behind by
    /// dropped fragments disappear, as do containers that end up empty.
    fn finish(self) -> Option<QueryValue> {
        match self {
            ParsedValue::Uninitialized => None,
            ParsedValue::String(s) => Some(QueryValue::String(s)),
            ParsedValue::Sequence(seq) => finish_sequence(seq),
            ParsedValue::Map(map) if map.keys().all(Key::is_index) => {
                let mut entries: Vec<_> = map.into_iter().collect();
                entries.sort_by(|(a, _), (b, _)| a.cmp(b));
                finish_sequence(entries.into_iter().map(|(_, v)| v).collect())
            }
            ParsedValue::Map(map) => {
                let map: QueryMap = map
                    .into_iter()
                    .filter_map(|(k, v)| Some((k.into_string(), v.finish()?)))
                    .collect();
                (!map.is_empty()).then_some(QueryValue::Map(map))
            }
        }
    }
}

fn finish_sequence(seq: Vec<ParsedValue>) -> Option<QueryValue> {
    let seq: Vec<_> = seq.into_iter().filter_map(ParsedValue::finish).collect();
    (!seq.is_empty()).then_some(QueryValue::Sequence(seq))
}

pub fn parse(encoded_string: &str, config: Config) -> QueryMap {
    let encoded_string = encoded_string.strip_prefix('?').unwrap_or(encoded_string);
    let mut root = ParsedMap::default();

    let mut pairs = encoded_string.split('&');
    for pair in pairs.by_ref().take(config.parameter_limit) {
        if pair.is_empty() {
            continue;
        }
        let (raw_key, raw_value) = split_pair(pair);
        let key = decode::decode(raw_key);
        let value = raw_value.map(decode::decode).unwrap_or_default();

        let segments = split_key(&key, config.max_depth);
        let Some((root_key, rest)) = segments.split_first() else {
            continue;
        };
        if root_key.is_empty() {
            // pairs like `=value` or `[]=value` have nothing to attach to
            continue;
        }

        let node = root
            .entry(Key::String((*root_key).to_owned()))
            .or_insert(ParsedValue::Uninitialized);
        if let Err(reason) = insert(node, rest, value.into_owned(), config) {
            tracing::debug!(key = %key, reason, "dropping querystring fragment");
        }
    }
    if pairs.next().is_some() {
        tracing::debug!(limit = config.parameter_limit, "ignoring pairs past the parameter limit");
    }

    root.into_iter()
        .filter_map(|(k, v)| Some((k.into_string(), v.finish()?)))
        .collect()
}

/// Splits a pair at its first `=`, or right after the first `]=` so that
/// bracketed keys may contain an `=`.
fn split_pair(pair: &str) -> (&str, Option<&str>) {
    let position = match pair.find("]=") {
        Some(p) => Some(p + 1),
        None => pair.find('='),
    };
    match position {
        Some(p) => (&pair[..p], Some(&pair[p + 1..])),
        None => (pair, None),
    }
}

/// Scans a decoded key for bracketed groups `[...]` that contain no other
/// brackets.
struct KeyParser<'k> {
    inner: &'k [u8],
    index: usize,
}

impl<'k> KeyParser<'k> {
    fn new(key: &'k str) -> Self {
        KeyParser {
            inner: key.as_bytes(),
            index: 0,
        }
    }

    /// Returns the byte positions of the next `[` and its matching `]`.
    fn next_group(&mut self) -> Option<(usize, usize)> {
        let mut open = None;
        while let Some(&b) = self.inner.get(self.index) {
            self.index += 1;
            match b {
                b'[' => open = Some(self.index - 1),
                b']' => {
                    if let Some(open) = open {
                        return Some((open, self.index - 1));
                    }
                }
                _ => {}
            }
        }
        None
    }
}

/// Splits a key into its root and bracketed segments.
///
/// - `a` gives `["a"]`
/// - `a[b][]` gives `["a", "b", ""]`
/// - keys without a complete bracket group (`a[b`) are kept whole
/// - groups past `max_depth` are kept as one literal segment, e.g. `"[g][h]"`,
///   which always starts with `[` and ends with `]`
fn split_key(key: &str, max_depth: usize) -> Vec<&str> {
    if max_depth == 0 {
        return vec![key];
    }
    let mut parser = KeyParser::new(key);
    let Some(first) = parser.next_group() else {
        return vec![key];
    };

    let mut segments = Vec::with_capacity(4);
    if first.0 > 0 {
        segments.push(&key[..first.0]);
    }

    let mut depth = 0;
    let mut group = Some(first);
    while let Some((open, close)) = group {
        if depth == max_depth {
            // trailing text after the last group is dropped, like text between groups
            let end = key.rfind(']').unwrap_or(close);
            segments.push(&key[open..=end]);
            break;
        }
        segments.push(&key[open + 1..close]);
        depth += 1;
        group = parser.next_group();
    }
    segments
}

fn insert(
    node: &mut ParsedValue,
    segments: &[&str],
    value: String,
    config: Config,
) -> Result<(), &'static str> {
    let Some((segment, rest)) = segments.split_first() else {
        return insert_leaf(node, value);
    };

    if segment.is_empty() {
        // `[]` appends a new element
        let mut element = ParsedValue::Uninitialized;
        insert(&mut element, rest, value, config)?;
        return push_element(node, element);
    }

    let map = expect_map(node)?;
    let child = map
        .entry(Key::from_segment(segment, config.array_limit))
        .or_insert(ParsedValue::Uninitialized);
    insert(child, rest, value, config)
}

fn insert_leaf(node: &mut ParsedValue, value: String) -> Result<(), &'static str> {
    match node {
        ParsedValue::Uninitialized => *node = ParsedValue::String(value),
        ParsedValue::Sequence(seq) => seq.push(ParsedValue::String(value)),
        ParsedValue::String(_) => {
            // repeated keys collect into a sequence
            let existing = std::mem::replace(node, ParsedValue::Uninitialized);
            *node = ParsedValue::Sequence(vec![existing, ParsedValue::String(value)]);
        }
        ParsedValue::Map(_) => {
            return Err("the same key is used for both a value and a nested map");
        }
    }
    Ok(())
}

fn push_element(node: &mut ParsedValue, element: ParsedValue) -> Result<(), &'static str> {
    match node {
        ParsedValue::Uninitialized => *node = ParsedValue::Sequence(vec![element]),
        ParsedValue::Sequence(seq) => seq.push(element),
        ParsedValue::String(_) => {
            let existing = std::mem::replace(node, ParsedValue::Uninitialized);
            *node = ParsedValue::Sequence(vec![existing, element]);
        }
        ParsedValue::Map(map) => {
            if !map.keys().all(Key::is_index) {
                return Err("the same key is used for both a nested map and a sequence");
            }
            let next = map
                .keys()
                .filter_map(|k| match k {
                    Key::Int(i) => Some(*i + 1),
                    Key::String(_) => None,
                })
                .max()
                .unwrap_or(0);
            map.insert(Key::Int(next), element);
        }
    }
    Ok(())
}

fn expect_map(node: &mut ParsedValue) -> Result<&mut ParsedMap, &'static str> {
    match node {
        ParsedValue::Uninitialized => *node = ParsedValue::Map(ParsedMap::default()),
        ParsedValue::Sequence(seq) => {
            // mixing `a[]` with `a[x]` turns the positions into keys
            let seq = std::mem::take(seq);
            *node = ParsedValue::Map(
                seq.into_iter()
                    .enumerate()
                    .map(|(i, v)| (Key::Int(i), v))
                    .collect(),
            );
        }
        ParsedValue::String(_) | ParsedValue::Map(_) => {}
    }
    match node {
        ParsedValue::Map(map) => Ok(map),
        _ => Err("the same key is used for both a value and a nested map"),
    }
}
