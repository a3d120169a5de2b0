//! # meow-service
//!
//! A REST service for cat records: paginated, filtered and sorted listing,
//! creation, partial update and deletion, backed by PostgreSQL.
//!
//! Request payloads are checked against explicit schemas in [`validation`]
//! before any handler runs. Datastore failures are classified into
//! [`repository::StoreError`] inside the repository and turned into a stable
//! JSON error envelope by [`filter`].
//!
//! ```rust,ignore
//! use meow_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     let app = build_router(AppState::new(config.clone(), MemoryCatRepository::new()));
//!     Server::new(config).serve(app).await
//! }
//! ```

pub mod app;
pub mod cats;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod observability;
pub mod repository;
pub mod responses;
pub mod server;
pub mod state;
pub mod validation;

pub mod prelude {
    pub use crate::app::build_router;
    pub use crate::cats::{Cat, CatChanges, CatsService, NewCat};
    pub use crate::config::{Config, DatabaseConfig, StorageBackend};
    pub use crate::error::{Error, Result};
    pub use crate::filter::ApiError;
    pub use crate::repository::{
        CatRepository, MemoryCatRepository, PgCatRepository, StoreError, StoreResult,
    };
    pub use crate::server::Server;
    pub use crate::state::AppState;
}
