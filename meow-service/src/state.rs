//! Application state shared across handlers

use std::sync::Arc;

use crate::{cats::CatsService, config::Config, repository::CatRepository};

/// Application state shared across handlers
///
/// Generic over the repository so tests can run the full router against
/// [`crate::repository::MemoryCatRepository`].
pub struct AppState<R> {
    config: Arc<Config>,
    cats: Arc<CatsService<R>>,
}

// Manual impl: `R` itself need not be `Clone`
impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            cats: Arc::clone(&self.cats),
        }
    }
}

impl<R: CatRepository> AppState<R> {
    pub fn new(config: Config, repository: R) -> Self {
        Self {
            config: Arc::new(config),
            cats: Arc::new(CatsService::new(repository)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cats(&self) -> &CatsService<R> {
        &self.cats
    }
}
