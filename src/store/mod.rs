pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::filter::{FilterSet, Queryable};
use crate::paging::Paging;

pub use memory::MemoryRepository;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("commit failed: {0}")]
    CommitFailed(String),
}

/// A storable entity: queryable for filtering/sorting, plus id assignment
/// on insert.
pub trait Entity: Queryable + Clone + Send + Sync + 'static {
    fn assign_id(&mut self, id: i32);
}

/// The data-store collaborator. One repository per aggregate; the adapter
/// behind it decides how composed filters are evaluated.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Filtered fetch in stable id order.
    async fn get_all(&self, filter: &FilterSet) -> Result<Vec<T>, StoreError>;

    async fn get_by_id(&self, id: i32) -> Result<Option<T>, StoreError>;

    /// Existence check without materializing rows.
    async fn any(&self, filter: &FilterSet) -> Result<bool, StoreError>;

    /// Filtered-and-paginated fetch: one page of items plus the total match
    /// count before pagination.
    async fn get_paged(
        &self,
        filter: &FilterSet,
        paging: &Paging,
    ) -> Result<(Vec<T>, usize), StoreError>;

    /// Inserts the entity, assigning and returning its id.
    async fn add(&self, entity: T) -> Result<i32, StoreError>;

    async fn update(&self, entity: T) -> Result<(), StoreError>;

    async fn remove(&self, id: i32) -> Result<(), StoreError>;

    /// Commit. False means nothing was persisted and the caller should
    /// surface a persistence failure.
    async fn save_changes(&self) -> Result<bool, StoreError>;
}
