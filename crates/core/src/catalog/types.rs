//! Types for remote photo catalog responses.

use serde::{Deserialize, Serialize};

/// A photo as returned by the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Photo {
    /// Catalog-wide unique identifier.
    pub id: u64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Canonical web page for the photo.
    pub url: String,
    /// Attribution.
    pub photographer: String,
    /// Image variant URLs.
    pub src: PhotoSrc,
}

/// Image variant URLs at the four cached resolutions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhotoSrc {
    pub original: String,
    pub large: String,
    pub medium: String,
    pub small: String,
}

/// One page of search results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PhotoPage {
    /// Photos on this page, in remote order.
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// URL of the next page, absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
}

impl PhotoPage {
    /// Whether the remote reported a further page.
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }
}
