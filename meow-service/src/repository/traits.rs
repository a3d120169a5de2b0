//! Repository trait definition
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) for async methods
//! without requiring `async_trait`.

use std::future::Future;

use super::error::StoreError;
use super::pagination::{CatFilter, CatOrder, Pagination};
use crate::cats::model::{Cat, CatChanges, NewCat};

/// Result type for repository operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Data access for the `cats` relation
///
/// Implementations must report every failure as a [`StoreError`]; driver
/// errors never cross this boundary.
pub trait CatRepository: Send + Sync + 'static {
    /// Name reported by the readiness probe
    const BACKEND: &'static str;

    /// Count cats matching `filter`
    fn count(&self, filter: &CatFilter) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Fetch one page of cats matching `filter`, sorted by `order`
    fn find_all(
        &self,
        filter: &CatFilter,
        order: CatOrder,
        pagination: Pagination,
    ) -> impl Future<Output = StoreResult<Vec<Cat>>> + Send;

    /// Insert a cat, assigning its id and timestamps
    fn create(&self, cat: NewCat) -> impl Future<Output = StoreResult<Cat>> + Send;

    /// Apply `changes` to the cat with `id` and refresh `updated_at`
    ///
    /// Returns [`StoreError::NotFound`] if no cat has that id.
    fn update(&self, id: &str, changes: CatChanges)
        -> impl Future<Output = StoreResult<Cat>> + Send;

    /// Remove the cat with `id`, returning the removed record
    ///
    /// Returns [`StoreError::NotFound`] if no cat has that id.
    fn delete(&self, id: &str) -> impl Future<Output = StoreResult<Cat>> + Send;

    /// Check that the datastore is reachable
    fn ping(&self) -> impl Future<Output = StoreResult<()>> + Send;
}
