//! Dog inventory record, editable field set and the enums it carries.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DogId, Timestamp};
use crate::validation::{
    age_months_in_range, coerce_age_months, coerce_price, optional_text, price_in_range,
    require_text, validate_image_url,
};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Define a closed, lowercase text enum stored as `TEXT` in the database.
macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every accepted value, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Database / wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }

            /// Parse from the database / wire representation.
            pub fn from_name(name: &str) -> Result<Self, CoreError> {
                match name {
                    $( $text => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{}'. Must be one of: {:?}",
                        stringify!($name),
                        other,
                        [$( $text ),+]
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_text_enum! {
    Gender {
        Male => "male",
        Female => "female",
    }
}

define_text_enum! {
    Size {
        Small => "small",
        Medium => "medium",
        Large => "large",
    }
}

define_text_enum! {
    /// Adoptability of a listing. Any authorized update may set any value.
    DogStatus {
        Available => "available",
        Reserved => "reserved",
        Sold => "sold",
    }
}

impl Default for DogStatus {
    fn default() -> Self {
        DogStatus::Available
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A persisted dog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DogRecord {
    pub id: DogId,
    pub name: String,
    pub breed: String,
    pub age_months: i32,
    pub price: f64,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub gender: Gender,
    pub size: Size,
    pub status: DogStatus,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A numeric form field that may arrive as a JSON number or as the raw text
/// of an `<input type="number">`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormNumber {
    Number(f64),
    Text(String),
}

impl From<i32> for FormNumber {
    fn from(value: i32) -> Self {
        FormNumber::Number(f64::from(value))
    }
}

impl From<f64> for FormNumber {
    fn from(value: f64) -> Self {
        FormNumber::Number(value)
    }
}

impl From<&str> for FormNumber {
    fn from(value: &str) -> Self {
        FormNumber::Text(value.to_string())
    }
}

impl FormNumber {
    fn to_age_months(&self) -> Result<i32, CoreError> {
        match self {
            FormNumber::Number(n) if n.is_finite() => age_months_in_range(n.trunc() as i64),
            FormNumber::Number(_) => Err(CoreError::Validation(
                "age_months must be a number".to_string(),
            )),
            FormNumber::Text(s) => coerce_age_months(s),
        }
    }

    fn to_price(&self) -> Result<f64, CoreError> {
        match self {
            FormNumber::Number(n) => price_in_range(*n),
            FormNumber::Text(s) => coerce_price(s),
        }
    }
}

/// Editable fields submitted by the admin console for create and update.
///
/// `status` and `is_featured` fall back to `available` / `false` when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DogInsert {
    pub name: String,
    pub breed: String,
    pub age_months: FormNumber,
    pub price: FormNumber,
    #[serde(default)]
    pub description_en: Option<String>,
    #[serde(default)]
    pub description_fr: Option<String>,
    pub gender: Gender,
    pub size: Size,
    #[serde(default)]
    pub status: Option<DogStatus>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_featured: Option<bool>,
}

/// Validated, normalised dog fields ready to hand to a store.
#[derive(Debug, Clone, PartialEq)]
pub struct DogFields {
    pub name: String,
    pub breed: String,
    pub age_months: i32,
    pub price: f64,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub gender: Gender,
    pub size: Size,
    pub status: DogStatus,
    pub image_url: Option<String>,
    pub is_featured: bool,
}

impl DogInsert {
    /// Check every field, stopping at the first violated constraint.
    ///
    /// Fields are checked in form order: name, breed, age, price, image URL.
    pub fn validate(&self) -> Result<DogFields, CoreError> {
        let name = require_text("name", &self.name)?;
        let breed = require_text("breed", &self.breed)?;
        let age_months = self.age_months.to_age_months()?;
        let price = self.price.to_price()?;
        let image_url = validate_image_url(self.image_url.as_deref())?;

        Ok(DogFields {
            name,
            breed,
            age_months,
            price,
            description_en: optional_text(self.description_en.as_deref()),
            description_fr: optional_text(self.description_fr.as_deref()),
            gender: self.gender,
            size: self.size,
            status: self.status.unwrap_or_default(),
            image_url,
            is_featured: self.is_featured.unwrap_or(false),
        })
    }
}

impl DogFields {
    /// Materialise a brand-new record with a fresh id.
    pub fn into_record(self, id: DogId, now: Timestamp) -> DogRecord {
        DogRecord {
            id,
            name: self.name,
            breed: self.breed,
            age_months: self.age_months,
            price: self.price,
            description_en: self.description_en,
            description_fr: self.description_fr,
            gender: self.gender,
            size: self.size,
            status: self.status,
            image_url: self.image_url,
            is_featured: self.is_featured,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every editable field of `record`, keeping id and creation time.
    pub fn apply_to(self, record: &mut DogRecord, now: Timestamp) {
        record.name = self.name;
        record.breed = self.breed;
        record.age_months = self.age_months;
        record.price = self.price;
        record.description_en = self.description_en;
        record.description_fr = self.description_fr;
        record.gender = self.gender;
        record.size = self.size;
        record.status = self.status;
        record.image_url = self.image_url;
        record.is_featured = self.is_featured;
        record.updated_at = now;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
