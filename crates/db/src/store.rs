use async_trait::async_trait;
use teckel_core::dog::{DogFields, DogRecord};
use teckel_core::error::CoreError;
use teckel_core::inventory::DogStore;
use teckel_core::types::DogId;

use crate::repositories::DogRepo;
use crate::DbPool;

/// PostgreSQL error code for a violated `CHECK` constraint.
const CHECK_VIOLATION: &str = "23514";

/// [`DogStore`] backed by the `dogs` table.
///
/// Each write is one SQL statement, so Postgres row locks serialize concurrent
/// writers to the same record (last write wins, no field merging).
#[derive(Clone)]
pub struct PgDogStore {
    pool: DbPool,
}

impl PgDogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error onto the domain taxonomy, logging the detail.
fn classify(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::RowNotFound => CoreError::NotFound {
            entity: "Dog",
            id: "unknown".to_string(),
        },
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(CHECK_VIOLATION) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            CoreError::Validation(format!("Value violates constraint {constraint}"))
        }
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            tracing::error!(error = %err, "Database unreachable");
            CoreError::Transport(format!("database unreachable: {err}"))
        }
        _ => {
            tracing::error!(error = %err, "Database error");
            CoreError::Internal(format!("database error: {err}"))
        }
    }
}

#[async_trait]
impl DogStore for PgDogStore {
    async fn list(&self) -> Result<Vec<DogRecord>, CoreError> {
        DogRepo::list(&self.pool)
            .await
            .map_err(classify)?
            .into_iter()
            .map(DogRecord::try_from)
            .collect()
    }

    async fn get(&self, id: DogId) -> Result<Option<DogRecord>, CoreError> {
        DogRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify)?
            .map(DogRecord::try_from)
            .transpose()
    }

    async fn insert(&self, id: DogId, fields: DogFields) -> Result<DogRecord, CoreError> {
        DogRepo::create(&self.pool, id, &fields)
            .await
            .map_err(classify)?
            .try_into()
    }

    async fn update(&self, id: DogId, fields: DogFields) -> Result<Option<DogRecord>, CoreError> {
        DogRepo::update(&self.pool, id, &fields)
            .await
            .map_err(classify)?
            .map(DogRecord::try_from)
            .transpose()
    }

    async fn delete(&self, id: DogId) -> Result<bool, CoreError> {
        DogRepo::hard_delete(&self.pool, id).await.map_err(classify)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(classify)
    }
}
