use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{Entity, Repository, StoreError};
use crate::filter::order;
use crate::filter::FilterSet;
use crate::paging::Paging;

/// In-memory store adapter. Evaluates composed filter objects directly
/// against the rows and implements the paged query executor: filter, sort,
/// count, then slice. Rows are keyed in a BTreeMap so unfiltered iteration
/// is already in stable id order.
pub struct MemoryRepository<T: Entity> {
    rows: RwLock<BTreeMap<i32, T>>,
    next_id: AtomicI32,
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI32::new(1),
        }
    }

    /// Builds a repository pre-populated with entities that already carry
    /// ids; the id sequence continues past the highest seeded id.
    pub fn seeded(entities: Vec<T>) -> Self {
        let mut rows = BTreeMap::new();
        let mut max_id = 0;
        for entity in entities {
            max_id = max_id.max(entity.entity_id());
            rows.insert(entity.entity_id(), entity);
        }
        Self {
            rows: RwLock::new(rows),
            next_id: AtomicI32::new(max_id + 1),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<i32, T>> {
        self.rows.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<i32, T>> {
        self.rows.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn filtered(&self, filter: &FilterSet) -> Vec<T> {
        self.read()
            .values()
            .filter(|e| filter.matches(*e))
            .cloned()
            .collect()
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn get_all(&self, filter: &FilterSet) -> Result<Vec<T>, StoreError> {
        Ok(self.filtered(filter))
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<T>, StoreError> {
        Ok(self.read().get(&id).cloned())
    }

    async fn any(&self, filter: &FilterSet) -> Result<bool, StoreError> {
        Ok(self.read().values().any(|e| filter.matches(e)))
    }

    async fn get_paged(
        &self,
        filter: &FilterSet,
        paging: &Paging,
    ) -> Result<(Vec<T>, usize), StoreError> {
        let mut items = self.filtered(filter);
        order::sort_slice(&mut items, paging.sort_by.as_deref(), paging.direction);

        // total before slicing, so callers can derive page counts
        let total = items.len();
        let page: Vec<T> = items
            .into_iter()
            .skip(paging.offset())
            .take(paging.page_size as usize)
            .collect();

        Ok((page, total))
    }

    async fn add(&self, mut entity: T) -> Result<i32, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        entity.assign_id(id);
        self.write().insert(id, entity);
        Ok(id)
    }

    async fn update(&self, entity: T) -> Result<(), StoreError> {
        let mut rows = self.write();
        let id = entity.entity_id();
        if !rows.contains_key(&id) {
            return Err(StoreError::NotFound(format!("id {}", id)));
        }
        rows.insert(id, entity);
        Ok(())
    }

    async fn remove(&self, id: i32) -> Result<(), StoreError> {
        if self.write().remove(&id).is_none() {
            return Err(StoreError::NotFound(format!("id {}", id)));
        }
        Ok(())
    }

    async fn save_changes(&self) -> Result<bool, StoreError> {
        // in-memory writes are immediate; the commit always succeeds
        Ok(true)
    }
}
