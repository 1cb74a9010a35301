//! Client-side helpers for a web application's views.
//!
//! The centerpiece is a querystring codec compatible with the defaults of
//! [qs](https://github.com/ljharb/qs): querystrings are parsed into an
//! insertion-ordered [`QueryMap`] with support for _nested_ bracket keys,
//! and written back out the same way. On top of it sit the two URL helpers
//! that views use to rewrite the current page's query:
//!
//! ```
//! use client_utils::{build_query_url, remove_query_keys};
//!
//! let url = build_query_url("/search", "q=cat", "type", Some("square"));
//! assert_eq!(url, "/search?q=cat&type=square");
//!
//! let url = remove_query_keys("/search", "q=cat&type=square", &["type"]);
//! assert_eq!(url, "/search?q=cat");
//! ```
//!
//! The remaining modules are small and independent:
//!
//! - [`deep_merge`] recursively merges two string-keyed maps
//! - [`debounce()`] collapses bursts of calls into one delayed call
//! - [`image_size`], [`shimmer`] and [`data_url`] help render images
//! - [`download()`] fetches and saves a file in the background
//! - [`handle_error`] normalizes a caught failure into an [`Error`]
//!
//! ## Querystring syntax
//!
//! ```
//! use client_utils::QueryValue;
//!
//! let params = client_utils::from_str("user[name]=Acme&ids[]=1&ids[]=2&page=3");
//! assert_eq!(params["user"].as_map().unwrap()["name"], QueryValue::from("Acme"));
//! assert_eq!(params["ids"], QueryValue::from(vec!["1", "2"]));
//!
//! assert_eq!(
//!     client_utils::to_string(&params),
//!     "user%5Bname%5D=Acme&ids%5B0%5D=1&ids%5B1%5D=2&page=3"
//! );
//! ```

mod config;
mod de;
mod debounce;
mod download;
mod error;
mod image;
mod merge;
mod ser;
mod url;
mod utils;
mod value;

pub use config::{ArrayFormat, Config};
#[doc(inline)]
pub use de::from_str;
pub use debounce::{Debouncer, debounce};
pub use download::{download, download_to};
pub use error::{Caught, Error, Result, handle_error};
pub use image::{
    AspectRatio, AspectRatioOptions, DEFAULT_IMAGE_SIZE, Dimension, ImageInfo, data_url,
    image_size, placeholder_data_url, shimmer,
};
pub use merge::{MergeMap, deep_merge};
#[doc(inline)]
pub use ser::{QsSerializer, to_string, to_writer};
pub use url::{build_query_url, remove_query_keys};
pub use value::{QueryMap, QueryValue};
