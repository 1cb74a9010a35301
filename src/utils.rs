/// Joins a path and a serialized querystring. The `?` is kept even when
/// there is no query left, as `qs`-based routers do.
pub fn join_path(current_path: &str, query: &str) -> String {
    let mut url = String::with_capacity(current_path.len() + 1 + query.len());
    url.push_str(current_path);
    url.push('?');
    url.push_str(query);
    url
}
