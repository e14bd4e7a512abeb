//! Cache-first photo repository.
//!
//! [`PhotoRepository`] is the single entry point callers use. It serves
//! search pages and details from the local store when it can, refetches
//! from the remote catalog on a miss or an explicit refresh, and falls back
//! to stale cached pages when the remote is unreachable.
//!
//! Favorite flags survive every refetch. Only [`PhotoRepository::set_favorite`],
//! [`PhotoRepository::toggle_favorite`] and [`PhotoRepository::purge_everything`]
//! can clear one.

mod config;
mod error;
mod photos;
mod snapshots;
mod types;

pub use config::RepositoryConfig;
pub use error::{ErrorKind, RepositoryError};
pub use photos::PhotoRepository;
pub use types::SearchResult;
