pub mod catalog;
pub mod config;
pub mod metrics;
pub mod query;
pub mod repository;
pub mod store;
pub mod testing;

pub use catalog::{
    CatalogError, PexelsClient, PexelsConfig, Photo, PhotoCatalog, PhotoPage, PhotoSrc,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheConfig, Config, ConfigError,
    SanitizedConfig,
};
pub use query::normalize_query;
pub use repository::{
    ErrorKind, PhotoRepository, RepositoryConfig, RepositoryError, SearchResult,
};
pub use store::{
    CachedPhoto, ChangeNotifier, PhotoStore, RecentQuery, RecentQueryStore, SqlitePhotoStore,
    SqliteRecentQueryStore, StoreError,
};
