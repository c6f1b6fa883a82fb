//! Dog row model.

use sqlx::FromRow;
use teckel_core::dog::{DogRecord, DogStatus, Gender, Size};
use teckel_core::error::CoreError;
use teckel_core::types::{DogId, Timestamp};

/// A row from the `dogs` table. Enum columns are stored as `TEXT`.
#[derive(Debug, Clone, FromRow)]
pub struct DogRow {
    pub id: DogId,
    pub name: String,
    pub breed: String,
    pub age_months: i32,
    pub price: f64,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub gender: String,
    pub size: String,
    pub status: String,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<DogRow> for DogRecord {
    type Error = CoreError;

    fn try_from(row: DogRow) -> Result<Self, Self::Error> {
        Ok(DogRecord {
            id: row.id,
            name: row.name,
            breed: row.breed,
            age_months: row.age_months,
            price: row.price,
            description_en: row.description_en,
            description_fr: row.description_fr,
            gender: Gender::from_name(&row.gender)?,
            size: Size::from_name(&row.size)?,
            status: DogStatus::from_name(&row.status)?,
            image_url: row.image_url,
            is_featured: row.is_featured,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
