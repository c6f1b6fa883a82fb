//! Database row structs.

pub mod dog;
