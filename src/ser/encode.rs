use percent_encoding::AsciiSet;

/// As defined in https://url.spec.whatwg.org/#query-percent-encode-set
///
/// The set of characters that need to be encoded in a _query_ string
/// are:
/// - CONTROL characters
/// - SPACE (but we'll separately encode it as `+`)
/// - U+0022 ("), U+0023 (#), U+003C (<), and U+003E (>).
///
/// NOTE: the querystring-specific characters are added here because
/// this set is only applied to individual keys and values, where they
/// must not be mistaken for structure.
const MINIMAL_QS_SET: &AsciiSet = &percent_encoding::CONTROLS
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    // `+` is used to represent a space in query strings
    .add(b'+')
    // denote nested keys
    .add(b'[')
    .add(b']')
    // key, value separator
    .add(b'=')
    // denote key-value pairs
    .add(b'&')
    // decoded before anything else
    .add(b'%');

/// Everything except the RFC 3986 unreserved characters: ASCII
/// alphanumerics, `-`, `.`, `_` and `~`. This is what `qs` encodes by default.
const UNRESERVED_SET: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Appends `input` to `out`, percent-encoded for use in a querystring.
///
/// With form encoding (the default) spaces are percent-encoded as `%20`.
/// With the minimal query encoding they are written as `+`.
pub fn encode_into(out: &mut Vec<u8>, input: &str, use_form_encoding: bool) {
    if input
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
    {
        // nothing to encode in the common case
        out.extend_from_slice(input.as_bytes());
        return;
    }

    let set = if use_form_encoding {
        UNRESERVED_SET
    } else {
        MINIMAL_QS_SET
    };
    for chunk in percent_encoding::utf8_percent_encode(input, set) {
        if use_form_encoding {
            out.extend_from_slice(chunk.as_bytes());
        } else {
            out.extend(chunk.bytes().map(|b| if b == b' ' { b'+' } else { b }));
        }
    }
}
