//! Dog inventory: persistence seam, role-checked gateway and an in-memory
//! store.
//!
//! - [`DogStore`] -- CRUD contract implemented by the Postgres store in
//!   `teckel-db` and by [`MemoryDogStore`].
//! - [`InventoryGateway`] -- the only entry point for callers; checks the
//!   admin role before any mutation and keeps the list view fresh.

mod gateway;
mod memory;

pub use gateway::{InventoryGateway, DEFAULT_LIST_CACHE_TTL};
pub use memory::MemoryDogStore;

use async_trait::async_trait;

use crate::dog::{DogFields, DogRecord};
use crate::error::CoreError;
use crate::types::DogId;

/// Persistence contract for dog records.
///
/// Writes must be atomic per record: `update` replaces every editable field in
/// one step and never revives a record removed by a concurrent `delete`.
#[async_trait]
pub trait DogStore: Send + Sync {
    /// All records, newest first.
    async fn list(&self) -> Result<Vec<DogRecord>, CoreError>;

    async fn get(&self, id: DogId) -> Result<Option<DogRecord>, CoreError>;

    /// Persist a new record under `id`.
    async fn insert(&self, id: DogId, fields: DogFields) -> Result<DogRecord, CoreError>;

    /// Replace all editable fields. `None` if no record has that id.
    async fn update(&self, id: DogId, fields: DogFields) -> Result<Option<DogRecord>, CoreError>;

    /// Remove a record. `true` if one was removed.
    async fn delete(&self, id: DogId) -> Result<bool, CoreError>;

    /// Cheap reachability probe for health checks.
    async fn ping(&self) -> Result<(), CoreError>;
}
