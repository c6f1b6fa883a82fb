/// Dog records are keyed by UUID v7: opaque to clients, roughly time-ordered.
pub type DogId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
