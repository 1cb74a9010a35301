//! Image dimensions and loading placeholders.

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::merge::deep_merge;

/// Size used when neither the aspect-ratio table nor the image knows better.
pub const DEFAULT_IMAGE_SIZE: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

/// What is known about an image before it is rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
}

impl ImageInfo {
    fn dimension(&self, dimension: Dimension) -> Option<u32> {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectRatio {
    pub aspect_ratio: String,
    pub label: String,
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    fn new(aspect_ratio: &str, label: &str, width: u32, height: u32) -> Self {
        Self {
            aspect_ratio: aspect_ratio.to_owned(),
            label: label.to_owned(),
            width,
            height,
        }
    }

    fn dimension(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }
}

/// The aspect ratios offered for `"fill"` images, keyed by ratio (`"3:4"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AspectRatioOptions(IndexMap<String, AspectRatio>);

impl Default for AspectRatioOptions {
    fn default() -> Self {
        Self(IndexMap::from_iter([
            ("1:1".to_owned(), AspectRatio::new("1:1", "Square (1:1)", 1000, 1000)),
            (
                "3:4".to_owned(),
                AspectRatio::new("3:4", "Standard Portrait (3:4)", 1000, 1334),
            ),
            (
                "9:16".to_owned(),
                AspectRatio::new("9:16", "Phone Portrait (9:16)", 1000, 1778),
            ),
        ]))
    }
}

static DEFAULT_OPTIONS: LazyLock<AspectRatioOptions> = LazyLock::new(AspectRatioOptions::default);

impl AspectRatioOptions {
    /// Loads a table from JSON. Entries are merged over the default table,
    /// so a partial entry such as `{"1:1": {"width": 512}}` keeps the
    /// remaining default fields.
    ///
    /// ```
    /// use client_utils::{AspectRatioOptions, Dimension, ImageInfo};
    ///
    /// let options = AspectRatioOptions::from_json(r#"{ "1:1": { "width": 512 } }"#).unwrap();
    /// let square = ImageInfo { aspect_ratio: Some("1:1".into()), ..Default::default() };
    /// assert_eq!(options.image_size("fill", &square, Dimension::Width), 512);
    /// assert_eq!(options.image_size("fill", &square, Dimension::Height), 1000);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let custom: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let defaults = match serde_json::to_value(Self::default())? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        let merged = deep_merge(&custom, Some(&defaults)).into_owned();
        Ok(serde_json::from_value(serde_json::Value::Object(merged))?)
    }

    pub fn get(&self, aspect_ratio: &str) -> Option<&AspectRatio> {
        self.0.get(aspect_ratio)
    }

    /// Looks up the size to render an image at.
    ///
    /// `"fill"` images take their size from this table. Every other kind
    /// uses the image's own dimension. Missing and zero sizes fall back to
    /// [`DEFAULT_IMAGE_SIZE`].
    pub fn image_size(&self, kind: &str, image: &ImageInfo, dimension: Dimension) -> u32 {
        let size = if kind == "fill" {
            image
                .aspect_ratio
                .as_deref()
                .and_then(|ratio| self.get(ratio))
                .map(|options| options.dimension(dimension))
        } else {
            image.dimension(dimension)
        };
        size.filter(|&s| s != 0).unwrap_or(DEFAULT_IMAGE_SIZE)
    }
}

/// [`AspectRatioOptions::image_size`] against the default table.
pub fn image_size(kind: &str, image: &ImageInfo, dimension: Dimension) -> u32 {
    DEFAULT_OPTIONS.image_size(kind, image, dimension)
}

/// An animated gradient shown while an image is still being transformed.
pub fn shimmer(w: u32, h: u32) -> String {
    format!(
        r##"
<svg width="{w}" height="{h}" version="1.1" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
  <defs>
    <linearGradient id="g">
      <stop stop-color="#7986AC" offset="20%" />
      <stop stop-color="#68769e" offset="50%" />
      <stop stop-color="#7986AC" offset="70%" />
    </linearGradient>
  </defs>
  <rect width="{w}" height="{h}" fill="#7986AC" />
  <rect id="r" width="{w}" height="{h}" fill="url(#g)" />
  <animate xlink:href="#r" attributeName="x" from="-{w}" to="{w}" dur="1s" repeatCount="indefinite"  />
</svg>"##
    )
}

/// The [`shimmer`] placeholder as a base64 `data:` URL.
pub fn placeholder_data_url(w: u32, h: u32) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(shimmer(w, h)))
}

/// The default 1000x1000 placeholder.
pub fn data_url() -> &'static str {
    static DATA_URL: LazyLock<String> =
        LazyLock::new(|| placeholder_data_url(DEFAULT_IMAGE_SIZE, DEFAULT_IMAGE_SIZE));
    &DATA_URL
}

#[cfg(test)]
mod test {
    use super::*;

    fn with_ratio(ratio: &str) -> ImageInfo {
        ImageInfo {
            aspect_ratio: Some(ratio.to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn fill_uses_the_table() {
        assert_eq!(image_size("fill", &with_ratio("1:1"), Dimension::Width), 1000);
        assert_eq!(image_size("fill", &with_ratio("3:4"), Dimension::Height), 1334);
        assert_eq!(image_size("fill", &with_ratio("9:16"), Dimension::Height), 1778);
    }

    #[test]
    fn unknown_ratio_falls_back() {
        assert_eq!(image_size("fill", &with_ratio("2:1"), Dimension::Width), 1000);
        assert_eq!(image_size("fill", &ImageInfo::default(), Dimension::Height), 1000);
    }

    #[test]
    fn other_kinds_use_the_image() {
        let image = ImageInfo {
            width: Some(640),
            height: Some(0),
            aspect_ratio: Some("9:16".into()),
        };
        assert_eq!(image_size("restore", &image, Dimension::Width), 640);
        assert_eq!(image_size("restore", &image, Dimension::Height), 1000);
    }

    #[test]
    fn image_info_from_json() {
        let image: ImageInfo = serde_json::from_str(r#"{"width":300,"aspectRatio":"3:4"}"#).unwrap();
        assert_eq!(image.width, Some(300));
        assert_eq!(image.aspect_ratio.as_deref(), Some("3:4"));
    }

    #[test]
    fn custom_table_adds_ratios() {
        let options = AspectRatioOptions::from_json(
            r#"{ "4:3": { "aspectRatio": "4:3", "label": "Landscape", "width": 1334, "height": 1000 } }"#,
        )
        .unwrap();
        assert_eq!(options.image_size("fill", &with_ratio("4:3"), Dimension::Width), 1334);
        assert_eq!(options.get("1:1").map(|r| r.label.as_str()), Some("Square (1:1)"));
    }

    #[test]
    fn table_must_be_an_object() {
        assert!(AspectRatioOptions::from_json("[1, 2]").is_err());
    }

    #[test]
    fn placeholder() {
        let svg = shimmer(20, 10);
        assert!(svg.contains(r#"<svg width="20" height="10""#));
        assert!(svg.contains(r#"from="-20" to="20""#));

        let url = placeholder_data_url(20, 10);
        let encoded = url.strip_prefix("data:image/svg+xml;base64,").unwrap();
        assert_eq!(STANDARD.decode(encoded).unwrap(), svg.into_bytes());
        assert!(data_url().starts_with("data:image/svg+xml;base64,"));
    }
}
