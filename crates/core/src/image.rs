//! Image asset pipeline: stage locally, publish on confirmation.
//!
//! Staging validates the upload and derives a preview handle without any
//! network I/O. Publishing is the only step that talks to object storage, and
//! a failed publish leaves the slot exactly as it was.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::storage::{ObjectStorage, StorageError, UploadOptions};
use crate::types::Timestamp;
use crate::validation::{validate_image, ImageErrorKind, MIME_JPEG, MIME_PNG};

/// Length of the content-derived preview handle.
const PREVIEW_HANDLE_LEN: usize = 16;

/// Longest file extension carried over from the original file name.
const MAX_EXTENSION_LEN: usize = 5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A file picked by the admin, before validation.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Run the type and size checks.
    pub fn validate(&self) -> Result<(), ImageErrorKind> {
        validate_image(&self.content_type, self.size_bytes())
    }
}

/// A validated image held locally until the admin confirms publication.
#[derive(Debug, Clone, Serialize)]
pub struct StagedImage {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    /// Content-derived handle used to fetch the local preview.
    pub preview: String,
    pub staged_at: Timestamp,
    #[serde(skip)]
    pub bytes: Arc<Vec<u8>>,
}

impl StagedImage {
    fn from_upload(upload: ImageUpload, now: Timestamp) -> Self {
        let digest = format!("{:x}", Sha256::digest(&upload.bytes));
        Self {
            size_bytes: upload.size_bytes(),
            preview: digest[..PREVIEW_HANDLE_LEN].to_string(),
            file_name: upload.file_name,
            content_type: upload.content_type,
            staged_at: now,
            bytes: Arc::new(upload.bytes),
        }
    }
}

/// Image field state of one dog form.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImageSlot {
    pub staged: Option<StagedImage>,
    pub image_url: Option<String>,
    pub error: Option<ImageErrorKind>,
}

/// Why a publish did not produce a URL.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("No image is staged")]
    NothingStaged,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<PublishError> for CoreError {
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::NothingStaged => CoreError::Validation(err.to_string()),
            PublishError::Storage(e) => e.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Slot operations
// ---------------------------------------------------------------------------

impl ImageSlot {
    /// Slot for a form opened on a record that may already have a picture.
    pub fn with_url(image_url: Option<String>) -> Self {
        Self {
            staged: None,
            image_url,
            error: None,
        }
    }

    /// Validate and stage `upload`, replacing any previously staged image.
    ///
    /// On failure the staged image and URL are left untouched and only the
    /// error is recorded.
    pub fn stage(
        &mut self,
        upload: ImageUpload,
        now: Timestamp,
    ) -> Result<&StagedImage, ImageErrorKind> {
        if let Err(kind) = upload.validate() {
            self.error = Some(kind);
            return Err(kind);
        }
        self.error = None;
        Ok(self.staged.insert(StagedImage::from_upload(upload, now)))
    }

    /// Drop the staged image and the confirmed URL.
    pub fn remove(&mut self) {
        self.staged = None;
        self.image_url = None;
        self.error = None;
    }

    /// Record a successful publish of the image identified by `preview`.
    ///
    /// Returns `false` (and changes nothing) if that image is no longer the
    /// staged one, e.g. the admin picked another file meanwhile.
    pub fn confirm_published(&mut self, preview: &str, url: String) -> bool {
        match &self.staged {
            Some(staged) if staged.preview == preview => {
                self.staged = None;
                self.image_url = Some(url);
                true
            }
            _ => false,
        }
    }

    /// Publish the staged image and store the resulting URL in the slot.
    pub async fn publish(
        &mut self,
        storage: &dyn ObjectStorage,
        bucket: &str,
        now: Timestamp,
    ) -> Result<String, PublishError> {
        let staged = self.staged.as_ref().ok_or(PublishError::NothingStaged)?;
        let url = publish(staged, storage, bucket, now).await?;
        let preview = staged.preview.clone();
        self.confirm_published(&preview, url.clone());
        Ok(url)
    }
}

// ---------------------------------------------------------------------------
// Publishing
// ---------------------------------------------------------------------------

/// Object key for a published picture: `<unix-millis>-<8 hex>.<ext>`.
///
/// The extension comes from the original file name when it has a sane one,
/// otherwise from the MIME type.
pub fn object_key(file_name: &str, content_type: &str, now: Timestamp) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| extension_for(content_type).to_string());
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}.{ext}", now.timestamp_millis(), &nonce[..8])
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        MIME_JPEG => "jpg",
        MIME_PNG => "png",
        _ => "bin",
    }
}

/// Upload a staged image with upsert semantics and return its public URL.
pub async fn publish(
    staged: &StagedImage,
    storage: &dyn ObjectStorage,
    bucket: &str,
    now: Timestamp,
) -> Result<String, StorageError> {
    let key = object_key(&staged.file_name, &staged.content_type, now);
    let options = UploadOptions::upsert(&staged.content_type);
    storage
        .upload(bucket, &key, staged.bytes.as_ref().clone(), &options)
        .await?;
    let url = storage.public_url(bucket, &key);
    tracing::info!(%key, size_bytes = staged.size_bytes, "Published dog image");
    Ok(url)
}

// ---------------------------------------------------------------------------
// Server-side staging area
// ---------------------------------------------------------------------------

/// One [`ImageSlot`] per admin, kept in memory.
///
/// The map lock is never held across the upload itself: publish snapshots the
/// staged image, uploads, then commits only if the same image is still staged.
#[derive(Debug, Default)]
pub struct ImageStaging {
    slots: Mutex<HashMap<String, ImageSlot>>,
}

impl ImageStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh slot for `owner`, seeded with the record's current URL.
    pub async fn open(&self, owner: &str, image_url: Option<String>) -> ImageSlot {
        let slot = ImageSlot::with_url(image_url);
        self.slots
            .lock()
            .await
            .insert(owner.to_string(), slot.clone());
        slot
    }

    /// Current slot state for `owner` (empty if none was opened).
    pub async fn slot(&self, owner: &str) -> ImageSlot {
        self.slots
            .lock()
            .await
            .get(owner)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn stage(
        &self,
        owner: &str,
        upload: ImageUpload,
        now: Timestamp,
    ) -> Result<StagedImage, ImageErrorKind> {
        let mut slots = self.slots.lock().await;
        let slot = slots.entry(owner.to_string()).or_default();
        slot.stage(upload, now).cloned()
    }

    /// The staged image of `owner`, if any.
    pub async fn staged(&self, owner: &str) -> Option<StagedImage> {
        self.slots
            .lock()
            .await
            .get(owner)
            .and_then(|slot| slot.staged.clone())
    }

    /// Record an upload that was refused before it could be staged, such as
    /// one cut off by the request body limit. The staged image is kept.
    pub async fn reject(&self, owner: &str, kind: ImageErrorKind) {
        let mut slots = self.slots.lock().await;
        slots.entry(owner.to_string()).or_default().error = Some(kind);
    }

    /// Forget the slot of `owner` entirely. Later reads see an empty slot.
    pub async fn remove(&self, owner: &str) {
        self.slots.lock().await.remove(owner);
    }

    /// Publish the staged image of `owner` and return its public URL.
    pub async fn publish(
        &self,
        owner: &str,
        storage: &dyn ObjectStorage,
        bucket: &str,
        now: Timestamp,
    ) -> Result<String, PublishError> {
        let staged = self.staged(owner).await.ok_or(PublishError::NothingStaged)?;
        let url = publish(&staged, storage, bucket, now).await?;

        let mut slots = self.slots.lock().await;
        let committed = slots
            .get_mut(owner)
            .is_some_and(|slot| slot.confirm_published(&staged.preview, url.clone()));
        if !committed {
            tracing::warn!(owner, "Staged image changed during publish, URL not recorded");
        }
        Ok(url)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
