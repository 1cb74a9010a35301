use client_utils::{ArrayFormat, Config, QueryMap, QueryValue};

/// macro for testing that serializing and parsing back yields the same map
macro_rules! roundtrip_test {
    (
        $data:expr
    ) => {
        let data: QueryMap = $data;

        for form_encoding in [false, true] {
            let config = Config::new().use_form_encoding(form_encoding);
            let serialized = config.serialize_string(&data);
            let parsed = config.deserialize_str(&serialized);
            pretty_assertions::assert_eq!(data, parsed, "serialized as {serialized}");
        }
    };
}

fn map<const N: usize>(entries: [(&str, QueryValue); N]) -> QueryMap {
    entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
}

#[test]
fn flat_strings() {
    roundtrip_test!(map([("a", "1".into()), ("b", "two".into())]));
}

#[test]
fn empty_string_value() {
    roundtrip_test!(map([("flag", "".into())]));
}

#[test]
fn sequences() {
    roundtrip_test!(map([
        ("single", vec!["only"].into()),
        ("many", vec!["a", "b", "c"].into()),
    ]));
}

#[test]
fn nested_maps() {
    roundtrip_test!(map([(
        "user",
        QueryValue::Map(map([
            ("name", "Ada".into()),
            (
                "address",
                QueryValue::Map(map([("city", "London".into()), ("zip", "N1".into())]))
            ),
        ]))
    )]));
}

#[test]
fn reserved_characters() {
    roundtrip_test!(map([
        ("q", "a&b=c+d e%f#g".into()),
        ("brackets", "[x] y[]".into()),
        ("unicode", "café ☕".into()),
        ("key with spaces", "v".into()),
    ]));
}

#[test]
fn special_characters_in_nested_keys() {
    roundtrip_test!(map([(
        "filter",
        QueryValue::Map(map([("a=b", "1".into()), ("c&d", "2".into())]))
    )]));
}

#[test]
fn sequences_longer_than_the_array_limit() {
    let ids: Vec<String> = (0..30).map(|i| format!("v{i}")).collect();
    roundtrip_test!(map([("ids", ids.into()), ("page", "2".into())]));
}

#[test]
fn sequences_of_maps_within_the_array_limit() {
    roundtrip_test!(map([(
        "rows",
        QueryValue::Sequence(vec![
            QueryValue::Map(map([("x", "1".into()), ("y", "2".into())])),
            QueryValue::Map(map([("x", "3".into())])),
        ])
    )]));
}

#[test]
fn keys_deeper_than_max_depth() {
    let data = client_utils::from_str("a[b][c][d][e][f][g][h]=1&q=x");
    roundtrip_test!(data);
}

#[test]
fn bracketed_top_level_keys_become_nested() {
    // keys are decoded before they are split, so brackets in a plain key
    // read back as nesting
    let data = map([("a[b]", "1".into())]);
    let serialized = client_utils::to_string(&data);
    assert_eq!(serialized, "a%5Bb%5D=1");
    assert_eq!(
        client_utils::from_str(&serialized),
        map([("a", QueryValue::Map(map([("b", "1".into())])))])
    );
}

#[test]
fn empty_indexed_sequences() {
    let data = map([("tags", vec!["x", "y"].into()), ("page", "1".into())]);
    let config = Config::new()
        .array_format(ArrayFormat::EmptyIndexed)
        .use_form_encoding(false);
    let serialized = config.serialize_string(&data);
    assert_eq!(serialized, "tags[]=x&tags[]=y&page=1");
    assert_eq!(config.deserialize_str(&serialized), data);
}

#[test]
fn unindexed_sequences() {
    let data = map([("tags", vec!["x", "y"].into())]);
    let config = Config::new().array_format(ArrayFormat::Unindexed);
    let serialized = config.serialize_string(&data);
    assert_eq!(serialized, "tags=x&tags=y");
    assert_eq!(config.deserialize_str(&serialized), data);
}

#[test]
fn parse_then_serialize_is_stable() {
    let inputs = [
        "a=1&b[c]=2&b[d][]=3&b[d][]=4",
        "search=red+car&page=2",
        "x[0]=a&x[1]=b",
        "a[b][c][d][e][f][g]=1",
        "a[b][c][d][e][f][g][h]junk=1",
    ];
    for input in inputs {
        let once = client_utils::to_string(&client_utils::from_str(input));
        let twice = client_utils::to_string(&client_utils::from_str(&once));
        assert_eq!(once, twice);
    }
}
