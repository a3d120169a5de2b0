//! Cats business operations over a [`CatRepository`]

use tracing::instrument;

use super::dto::ListCatsQuery;
use super::model::{Cat, CatChanges, NewCat};
use crate::repository::{CatRepository, StoreResult};
use crate::responses::Page;

#[derive(Debug)]
pub struct CatsService<R> {
    repository: R,
}

impl<R: CatRepository> CatsService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// One page of cats plus the full count under the same filter
    #[instrument(skip(self), fields(backend = R::BACKEND))]
    pub async fn find_all(&self, query: ListCatsQuery) -> StoreResult<Page<Cat>> {
        let filter = query.filter();
        let total = self.repository.count(&filter).await?;
        let data = self
            .repository
            .find_all(&filter, query.order(), query.pagination())
            .await?;

        tracing::debug!(total, returned = data.len(), "Listed cats");

        Ok(Page {
            data,
            total,
            page: query.page,
            limit: query.limit,
        })
    }

    #[instrument(skip(self, cat), fields(backend = R::BACKEND, name = %cat.name))]
    pub async fn create(&self, cat: NewCat) -> StoreResult<Cat> {
        let cat = self.repository.create(cat).await?;
        tracing::info!(id = %cat.id, "Created cat");
        Ok(cat)
    }

    #[instrument(skip(self, changes), fields(backend = R::BACKEND))]
    pub async fn update(&self, id: &str, changes: CatChanges) -> StoreResult<Cat> {
        let cat = self.repository.update(id, changes).await?;
        tracing::info!("Updated cat");
        Ok(cat)
    }

    #[instrument(skip(self), fields(backend = R::BACKEND))]
    pub async fn delete(&self, id: &str) -> StoreResult<Cat> {
        let cat = self.repository.delete(id).await?;
        tracing::info!("Deleted cat");
        Ok(cat)
    }
}
