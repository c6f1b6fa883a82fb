//! Domain core for the Royal Teckel Home backend.
//!
//! Pure validation rules, domain types and the async seams (inventory store,
//! object storage) shared by the database, cloud, relay and API crates.

pub mod contact;
pub mod dog;
pub mod error;
pub mod image;
pub mod inventory;
pub mod roles;
pub mod storage;
pub mod types;
pub mod validation;
