use std::sync::Arc;

use photocache_core::{Config, PhotoRepository, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    repository: Arc<PhotoRepository>,
}

impl AppState {
    pub fn new(config: Config, repository: Arc<PhotoRepository>) -> Self {
        Self { config, repository }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn repository(&self) -> &PhotoRepository {
        self.repository.as_ref()
    }
}
