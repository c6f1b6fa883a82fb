use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use super::DogStore;
use crate::dog::{DogFields, DogRecord};
use crate::error::CoreError;
use crate::types::DogId;

/// Process-local [`DogStore`], used when no database is configured.
///
/// Every write happens under one lock, so updates and deletes of the same
/// record are serialized and a deleted record cannot come back.
#[derive(Debug, Default)]
pub struct MemoryDogStore {
    records: RwLock<IndexMap<DogId, DogRecord>>,
}

impl MemoryDogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DogStore for MemoryDogStore {
    async fn list(&self) -> Result<Vec<DogRecord>, CoreError> {
        let records = self.records.read().await;
        Ok(records.values().rev().cloned().collect())
    }

    async fn get(&self, id: DogId) -> Result<Option<DogRecord>, CoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn insert(&self, id: DogId, fields: DogFields) -> Result<DogRecord, CoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&id) {
            return Err(CoreError::Internal(format!("duplicate dog id {id}")));
        }
        let record = fields.into_record(id, chrono::Utc::now());
        records.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: DogId, fields: DogFields) -> Result<Option<DogRecord>, CoreError> {
        let mut records = self.records.write().await;
        Ok(records.get_mut(&id).map(|record| {
            fields.apply_to(record, chrono::Utc::now());
            record.clone()
        }))
    }

    async fn delete(&self, id: DogId) -> Result<bool, CoreError> {
        Ok(self.records.write().await.shift_remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dog::{DogStatus, Gender, Size};

    fn fields(name: &str) -> DogFields {
        DogFields {
            name: name.to_string(),
            breed: "Teckel".to_string(),
            age_months: 2,
            price: 900.0,
            description_en: None,
            description_fr: None,
            gender: Gender::Male,
            size: Size::Small,
            status: DogStatus::Available,
            image_url: None,
            is_featured: false,
        }
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let store = MemoryDogStore::new();
        let first = store.insert(DogId::now_v7(), fields("First")).await.unwrap();
        let second = store.insert(DogId::now_v7(), fields("Second")).await.unwrap();
        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec![second.name, first.name]);
    }

    #[tokio::test]
    async fn update_after_delete_does_not_resurrect() {
        let store = MemoryDogStore::new();
        let id = DogId::now_v7();
        store.insert(id, fields("Oscar")).await.unwrap();
        assert!(store.delete(id).await.unwrap());
        assert!(store.update(id, fields("Oscar")).await.unwrap().is_none());
        assert!(store.get(id).await.unwrap().is_none());
        assert!(!store.delete(id).await.unwrap());
    }
}
