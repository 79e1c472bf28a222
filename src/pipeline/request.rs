use serde::{Deserialize, Serialize};

use crate::assets::rescale::ResizeFilter;
use crate::foundation::error::{PixmapError, PixmapResult};

/// Sizing and format request handed to the loader together with a coded image.
///
/// On the wire `request_width`/`request_height` use `-1` for "unspecified";
/// `max_width`/`max_height` use `0` for "no clamp". Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRequest {
    #[serde(deserialize_with = "de_dimension", serialize_with = "ser_dimension")]
    pub request_width: Option<u32>,
    #[serde(deserialize_with = "de_dimension", serialize_with = "ser_dimension")]
    pub request_height: Option<u32>,
    pub want_thumbnail: bool,
    pub max_width: u32,
    pub max_height: u32,
    pub margin: u32,
    /// Non-zero means the caller will round corners, so the result needs alpha.
    pub corner_radius: u32,
    pub disallow_rgb24: bool,
    pub mono_allowed: bool,
}

impl ImageRequest {
    /// Parse a request from JSON.
    pub fn from_json(s: &str) -> PixmapResult<Self> {
        serde_json::from_str(s).map_err(|e| PixmapError::serde(format!("parse image request: {e}")))
    }

    pub fn to_json(&self) -> PixmapResult<String> {
        serde_json::to_string(self)
            .map_err(|e| PixmapError::serde(format!("serialize image request: {e}")))
    }

    pub fn with_size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.request_width = width;
        self.request_height = height;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }
}

fn de_dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<i64>::deserialize(deserializer)? {
        None | Some(-1) => Ok(None),
        Some(v) => u32::try_from(v).map(Some).map_err(|_| {
            serde::de::Error::custom(format!("dimension must be -1 or 0..={}, got {v}", u32::MAX))
        }),
    }
}

fn ser_dimension<S>(v: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match v {
        Some(v) => serializer.serialize_i64(i64::from(*v)),
        None => serializer.serialize_i64(-1),
    }
}

/// Loader-wide tuning, fixed when the loader is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOpts {
    /// Short edge of a thumbnail.
    pub thumbnail_edge: u32,
    /// Sources at or below this size on both edges are never thumbnailed or clamped.
    pub small_source_limit: u32,
    pub filter: ResizeFilter,
}

impl Default for LoaderOpts {
    fn default() -> Self {
        Self {
            thumbnail_edge: 160,
            small_source_limit: 64,
            filter: ResizeFilter::default(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/request.rs"]
mod tests;
