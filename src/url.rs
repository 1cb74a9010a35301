//! Rewriting the querystring of the current page.
//!
//! Both helpers take the current path and querystring as arguments and
//! return the URL to navigate to.

use crate::Config;
use crate::utils::join_path;
use crate::value::QueryValue;

impl Config {
    /// Sets `key` to `value` in `query_string` and returns the new URL.
    ///
    /// A `None` value removes the key, since nulls are skipped on output.
    pub fn build_query_url(
        self,
        current_path: &str,
        query_string: &str,
        key: &str,
        value: Option<&str>,
    ) -> String {
        let mut params = self.deserialize_str(query_string);
        params.insert(key.to_owned(), QueryValue::from(value));
        let query = self.skip_nulls(true).serialize_string(&params);
        join_path(current_path, &query)
    }

    /// Removes `keys_to_remove`, and any entry left with a null value, from
    /// `query_string` and returns the new URL.
    ///
    /// The result always contains a `?`, even when no query is left.
    pub fn remove_query_keys<K: AsRef<str>>(
        self,
        current_path: &str,
        query_string: &str,
        keys_to_remove: &[K],
    ) -> String {
        let mut params = self.deserialize_str(query_string);
        for key in keys_to_remove {
            params.shift_remove(key.as_ref());
        }
        params.retain(|_, value| !value.is_null());
        join_path(current_path, &self.serialize_string(&params))
    }
}

/// Sets one key of the querystring with the default [`Config`].
///
/// ```
/// use client_utils::build_query_url;
///
/// assert_eq!(
///     build_query_url("/search", "", "type", Some("square")),
///     "/search?type=square"
/// );
/// assert_eq!(
///     build_query_url("/search", "q=cat&page=2", "page", None),
///     "/search?q=cat"
/// );
/// assert_eq!(build_query_url("/search", "q=cat", "q", None), "/search?");
/// ```
pub fn build_query_url(
    current_path: &str,
    query_string: &str,
    key: &str,
    value: Option<&str>,
) -> String {
    Config::default().build_query_url(current_path, query_string, key, value)
}

/// Removes keys from the querystring with the default [`Config`].
///
/// ```
/// use client_utils::remove_query_keys;
///
/// assert_eq!(
///     remove_query_keys("/", "q=cat&page=2&type=fill", &["page", "type"]),
///     "/?q=cat"
/// );
/// ```
pub fn remove_query_keys<K: AsRef<str>>(
    current_path: &str,
    query_string: &str,
    keys_to_remove: &[K],
) -> String {
    Config::default().remove_query_keys(current_path, query_string, keys_to_remove)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn overwrites_in_place() {
        assert_eq!(
            build_query_url("/", "a=1&b=2&c=3", "b", Some("x")),
            "/?a=1&b=x&c=3"
        );
    }

    #[test]
    fn appends_new_keys() {
        assert_eq!(
            build_query_url("/", "a=1", "query", Some("red car")),
            "/?a=1&query=red%20car"
        );
        assert_eq!(
            Config::new()
                .use_form_encoding(false)
                .build_query_url("/", "a=1", "query", Some("red car")),
            "/?a=1&query=red+car"
        );
    }

    #[test]
    fn removing_the_last_key_keeps_the_question_mark() {
        assert_eq!(build_query_url("/search", "q=cat", "q", None), "/search?");
        assert_eq!(remove_query_keys("/search", "q=cat", &["q"]), "/search?");
    }

    #[test]
    fn removal_keeps_nested_values() {
        assert_eq!(
            remove_query_keys("/", "f[type]=fill&f[size]=1&page=3", &["page"]),
            "/?f%5Btype%5D=fill&f%5Bsize%5D=1"
        );
    }

    #[test]
    fn removal_ignores_unknown_keys() {
        let keys: Vec<String> = vec!["missing".into()];
        assert_eq!(remove_query_keys("/", "a=1", &keys), "/?a=1");
    }
}
