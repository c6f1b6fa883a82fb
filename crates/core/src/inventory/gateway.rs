use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::DogStore;
use crate::dog::{DogInsert, DogRecord};
use crate::error::CoreError;
use crate::roles::{require_admin, Role};
use crate::types::DogId;

/// How long a cached listing is served before the store is read again.
pub const DEFAULT_LIST_CACHE_TTL: Duration = Duration::from_secs(30);

/// Cached full listing plus a generation counter bumped by every mutation.
///
/// A list that read the store before a mutation committed may only fill the
/// cache if no mutation happened in between, so a successful mutation is
/// never followed by a stale read. Writes made by other processes become
/// visible once the entry expires.
#[derive(Debug, Default)]
struct ListCache {
    generation: u64,
    records: Option<(Instant, Arc<Vec<DogRecord>>)>,
}

/// Role-checked access to the dog inventory.
///
/// Reads are public. Mutations require [`Role::Admin`]; the role check runs
/// before validation and before the store is touched, so a refused call has
/// no side effect. Concurrent writers follow last-write-wins.
pub struct InventoryGateway {
    store: Arc<dyn DogStore>,
    cache: RwLock<ListCache>,
    cache_ttl: Duration,
}

impl InventoryGateway {
    pub fn new(store: Arc<dyn DogStore>) -> Self {
        Self::with_cache_ttl(store, DEFAULT_LIST_CACHE_TTL)
    }

    /// Gateway whose listing cache expires after `cache_ttl`. A zero TTL
    /// disables caching.
    pub fn with_cache_ttl(store: Arc<dyn DogStore>, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache: RwLock::new(ListCache::default()),
            cache_ttl,
        }
    }

    /// Every record in persistence order (newest first).
    pub async fn list(&self) -> Result<Vec<DogRecord>, CoreError> {
        let generation = {
            let cache = self.cache.read().await;
            if let Some((filled_at, records)) = &cache.records {
                if filled_at.elapsed() < self.cache_ttl {
                    return Ok(records.as_ref().clone());
                }
            }
            cache.generation
        };

        let records = self.store.list().await?;

        let mut cache = self.cache.write().await;
        if cache.generation == generation {
            cache.records = Some((Instant::now(), Arc::new(records.clone())));
        }
        Ok(records)
    }

    /// The featured subset of [`Self::list`].
    pub async fn list_featured(&self) -> Result<Vec<DogRecord>, CoreError> {
        let mut records = self.list().await?;
        records.retain(|dog| dog.is_featured);
        Ok(records)
    }

    pub async fn get(&self, id: DogId) -> Result<DogRecord, CoreError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| CoreError::dog_not_found(id))
    }

    /// Validate and insert a new record with a fresh id.
    pub async fn create(&self, role: Role, input: &DogInsert) -> Result<DogRecord, CoreError> {
        require_admin(role)?;
        let fields = input.validate()?;

        let record = self.store.insert(DogId::now_v7(), fields).await?;
        self.invalidate().await;

        tracing::info!(dog_id = %record.id, name = %record.name, "Dog created");
        Ok(record)
    }

    /// Replace every editable field of an existing record.
    pub async fn update(
        &self,
        role: Role,
        id: DogId,
        input: &DogInsert,
    ) -> Result<DogRecord, CoreError> {
        require_admin(role)?;
        let fields = input.validate()?;

        let record = self
            .store
            .update(id, fields)
            .await?
            .ok_or_else(|| CoreError::dog_not_found(id))?;
        self.invalidate().await;

        tracing::info!(dog_id = %id, "Dog updated");
        Ok(record)
    }

    /// Permanently remove a record. Deleting an absent id is `NotFound`.
    pub async fn delete(&self, role: Role, id: DogId) -> Result<(), CoreError> {
        require_admin(role)?;

        if !self.store.delete(id).await? {
            return Err(CoreError::dog_not_found(id));
        }
        self.invalidate().await;

        tracing::info!(dog_id = %id, "Dog deleted");
        Ok(())
    }

    /// Whether the backing store answers.
    pub async fn store_healthy(&self) -> bool {
        self.store.ping().await.is_ok()
    }

    async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        cache.generation += 1;
        cache.records = None;
    }
}
