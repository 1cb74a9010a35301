//! Fire-and-forget file downloads.

use std::path::{Path, PathBuf};

use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Downloads `url` into the current directory. See [`download_to`].
pub fn download(url: &str, filename: &str) -> Result<JoinHandle<()>> {
    download_to(".", url, filename)
}

/// Fetches `url` in the background and saves it in `dir`.
///
/// A non-empty `filename` is saved as `<filename>.png`, with its first space
/// replaced by `_`. Otherwise the last segment of the URL path is used.
///
/// Only a missing URL is reported to the caller. Failures while fetching or
/// writing happen after this function has returned, so they are logged and
/// the task ends. The returned handle may be awaited or dropped.
///
/// # Panics
///
/// Panics when called outside of a tokio runtime.
pub fn download_to(
    dir: impl Into<PathBuf>,
    url: &str,
    filename: &str,
) -> Result<JoinHandle<()>> {
    if url.is_empty() {
        return Err(Error::MissingUrl);
    }

    let target = dir.into().join(file_name(url, filename));
    let url = url.to_owned();
    Ok(tokio::spawn(async move {
        if let Err(error) = fetch_and_save(&url, &target).await {
            tracing::warn!(%url, %error, "download failed");
        }
    }))
}

async fn fetch_and_save(url: &str, target: &Path) -> Result<()> {
    let response = reqwest::get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;
    tokio::fs::write(target, &bytes).await?;
    tracing::debug!(%url, target = %target.display(), len = bytes.len(), "download saved");
    Ok(())
}

/// Picks the name the download is saved under inside the target directory.
/// Only the last path component of `filename` is used, so the file never
/// lands outside that directory.
fn file_name(url: &str, filename: &str) -> String {
    let requested = filename.replacen(' ', "_", 1);
    if let Some(name) = requested.rsplit(['/', '\\']).next().filter(|n| is_plain_name(n)) {
        return format!("{name}.png");
    }
    url.split(['?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('/')
        .find(|segment| is_plain_name(segment) && !segment.contains([':', '\\']))
        .unwrap_or("download")
        .to_owned()
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".."
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_url_fails_immediately() {
        // no runtime is needed to reject the input
        let err = download("", "cat").unwrap_err();
        assert!(matches!(err, Error::MissingUrl));
        assert_eq!(
            err.to_string(),
            "Resource URL not provided! You need to provide one"
        );
    }

    #[test]
    fn names_files() {
        assert_eq!(file_name("https://x.io/a.jpg", "my cat pic"), "my_cat pic.png");
        assert_eq!(file_name("https://x.io/img/a.jpg?w=10#top", ""), "a.jpg");
        assert_eq!(file_name("https://x.io/", ""), "x.io");
        assert_eq!(file_name("https://", ""), "download");
    }

    #[test]
    fn file_names_stay_inside_the_directory() {
        let url = "https://x.io/img/a.jpg";
        assert_eq!(file_name(url, "../../x"), "x.png");
        assert_eq!(file_name(url, "/etc/x"), "x.png");
        assert_eq!(file_name(url, "..\\..\\x"), "x.png");
        assert_eq!(file_name(url, ".."), "a.jpg");
        assert_eq!(file_name(url, "dir/"), "a.jpg");
        assert_eq!(file_name("https://x.io/img/..", ""), "img");

        let target = Path::new("out").join(file_name(url, "../../etc/passwd"));
        assert_eq!(target, Path::new("out/passwd.png"));
    }
}
