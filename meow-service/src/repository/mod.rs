//! Data access for cat records
//!
//! - [`CatRepository`]: the trait the service layer is written against
//! - [`PgCatRepository`]: PostgreSQL through a shared `sqlx` pool
//! - [`MemoryCatRepository`]: in-process store for tests and local runs
//! - [`StoreError`]: the closed error set every implementation reports

mod error;
mod memory;
mod pagination;
mod postgres;
mod traits;

pub use error::StoreError;
pub use memory::MemoryCatRepository;
pub use pagination::{CatFilter, CatOrder, Pagination, SortField, SortOrder};
pub use postgres::PgCatRepository;
pub use traits::{CatRepository, StoreResult};
