//! In-process cat store
//!
//! Orders, filters and paginates exactly as the PostgreSQL queries do, so
//! handler tests against it describe the production behavior.

use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::StoreError;
use super::pagination::{CatFilter, CatOrder, Pagination, SortField, SortOrder};
use super::traits::{CatRepository, StoreResult};
use crate::cats::model::{Cat, CatChanges, NewCat};
use crate::ids::CatId;

/// Cat store backed by a `HashMap` behind a `tokio` `RwLock`
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatRepository {
    cats: Arc<RwLock<HashMap<String, Cat>>>,
    unique_name: bool,
}

impl MemoryCatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce a unique constraint on `name`, as a unique index would
    #[must_use]
    pub fn with_unique_name(mut self) -> Self {
        self.unique_name = true;
        self
    }

    fn check_unique(&self, cats: &HashMap<String, Cat>, name: &str, except: Option<&str>) -> StoreResult<()> {
        if !self.unique_name {
            return Ok(());
        }
        let taken = cats
            .values()
            .any(|cat| cat.name == name && Some(cat.id.as_str()) != except);
        if taken {
            return Err(StoreError::unique_violation("name"));
        }
        Ok(())
    }
}

fn compare(a: &Cat, b: &Cat, order: CatOrder) -> Ordering {
    let directed = |ordering: Ordering| match order.direction {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    };

    let primary = match order.field {
        SortField::Name => directed(a.name.cmp(&b.name)),
        SortField::CreatedAt => directed(a.created_at.cmp(&b.created_at)),
        // Nulls last regardless of direction
        SortField::Age => match (a.age, b.age) {
            (Some(x), Some(y)) => directed(x.cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    };

    primary.then_with(|| a.id.cmp(&b.id))
}

impl CatRepository for MemoryCatRepository {
    const BACKEND: &'static str = "memory";

    async fn count(&self, filter: &CatFilter) -> StoreResult<u64> {
        let cats = self.cats.read().await;
        let count = cats.values().filter(|cat| filter.matches(&cat.breed)).count();
        Ok(count as u64)
    }

    async fn find_all(
        &self,
        filter: &CatFilter,
        order: CatOrder,
        pagination: Pagination,
    ) -> StoreResult<Vec<Cat>> {
        let cats = self.cats.read().await;
        let mut matching: Vec<&Cat> = cats
            .values()
            .filter(|cat| filter.matches(&cat.breed))
            .collect();
        matching.sort_by(|a, b| compare(a, b, order));

        let offset = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn create(&self, cat: NewCat) -> StoreResult<Cat> {
        let mut cats = self.cats.write().await;
        self.check_unique(&cats, &cat.name, None)?;

        let now = Utc::now();
        let record = Cat {
            id: CatId::new().into(),
            name: cat.name,
            age: cat.age,
            breed: cat.breed,
            image_url: cat.image_url,
            created_at: now,
            updated_at: now,
        };
        cats.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, changes: CatChanges) -> StoreResult<Cat> {
        let mut cats = self.cats.write().await;
        if !cats.contains_key(id) {
            return Err(StoreError::NotFound);
        }
        if let Some(name) = changes.name.as_deref() {
            self.check_unique(&cats, name, Some(id))?;
        }

        let cat = cats.get_mut(id).ok_or(StoreError::NotFound)?;
        changes.apply_to(cat);
        cat.updated_at = Utc::now();
        Ok(cat.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<Cat> {
        self.cats
            .write()
            .await
            .remove(id)
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
