//! Testing utilities and mock implementations.
//!
//! Lets the repository and the HTTP server be exercised without a real
//! Pexels account.
//!
//! # Example
//!
//! ```rust,ignore
//! use photocache_core::testing::{fixtures, MockPhotoCatalog};
//!
//! let catalog = MockPhotoCatalog::new();
//! catalog.set_page("nature", 1, fixtures::photo_page(1, 15, true)).await;
//! catalog.set_offline(true).await;
//! ```

mod mock_catalog;

pub use mock_catalog::{MockPhotoCatalog, RecordedCatalogCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{Photo, PhotoPage, PhotoSrc};

    /// Create a test photo with reasonable defaults.
    pub fn photo(id: u64) -> Photo {
        let base = format!("https://images.pexels.com/photos/{id}/pexels-photo-{id}.jpeg");
        Photo {
            id,
            width: 4000,
            height: 3000,
            url: format!("https://www.pexels.com/photo/{}/", id),
            photographer: format!("Photographer {}", id),
            src: PhotoSrc {
                original: base.clone(),
                large: format!("{}?h=650&w=940", base),
                medium: format!("{}?h=350", base),
                small: format!("{}?h=130", base),
            },
        }
    }

    /// Create a page of `count` photos with consecutive ids from `start_id`.
    pub fn photo_page(start_id: u64, count: u64, has_more: bool) -> PhotoPage {
        PhotoPage {
            photos: (start_id..start_id + count).map(photo).collect(),
            next_page: has_more.then(|| "https://api.pexels.com/v1/search?page=next".to_string()),
        }
    }
}
