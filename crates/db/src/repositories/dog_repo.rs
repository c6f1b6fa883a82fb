//! Repository for the `dogs` table.

use sqlx::PgPool;
use teckel_core::dog::DogFields;
use teckel_core::types::DogId;

use crate::models::dog::DogRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, breed, age_months, price, description_en, description_fr, \
     gender, size, status, image_url, is_featured, created_at, updated_at";

/// Provides CRUD operations for dog listings.
pub struct DogRepo;

impl DogRepo {
    /// Insert a new dog under `id`, returning the created row.
    pub async fn create(pool: &PgPool, id: DogId, input: &DogFields) -> Result<DogRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO dogs (id, name, breed, age_months, price, description_en, description_fr,
                               gender, size, status, image_url, is_featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DogRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.breed)
            .bind(input.age_months)
            .bind(input.price)
            .bind(&input.description_en)
            .bind(&input.description_fr)
            .bind(input.gender.as_str())
            .bind(input.size.as_str())
            .bind(input.status.as_str())
            .bind(&input.image_url)
            .bind(input.is_featured)
            .fetch_one(pool)
            .await
    }

    /// Find a dog by id.
    pub async fn find_by_id(pool: &PgPool, id: DogId) -> Result<Option<DogRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dogs WHERE id = $1");
        sqlx::query_as::<_, DogRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all dogs, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<DogRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dogs ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, DogRow>(&query).fetch_all(pool).await
    }

    /// Replace every editable column in a single statement.
    ///
    /// Returns `None` if no row with the given `id` exists (including one
    /// deleted concurrently).
    pub async fn update(
        pool: &PgPool,
        id: DogId,
        input: &DogFields,
    ) -> Result<Option<DogRow>, sqlx::Error> {
        let query = format!(
            "UPDATE dogs SET
                name = $2,
                breed = $3,
                age_months = $4,
                price = $5,
                description_en = $6,
                description_fr = $7,
                gender = $8,
                size = $9,
                status = $10,
                image_url = $11,
                is_featured = $12,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DogRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.breed)
            .bind(input.age_months)
            .bind(input.price)
            .bind(&input.description_en)
            .bind(&input.description_fr)
            .bind(input.gender.as_str())
            .bind(input.size.as_str())
            .bind(input.status.as_str())
            .bind(&input.image_url)
            .bind(input.is_featured)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a dog by id. Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DogId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dogs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
