//! In-memory batch state with server-reconciled collections
//!
//! A [`BatchStore`] owns the currently-rendered batch and its two
//! collections (images, tasting notes). Every mutation goes to the
//! server first; the local collection is patched with the server's
//! returned record by identity, never by position, and never before the
//! server confirms. A failed call leaves local state untouched.

use async_trait::async_trait;
use brinelog_common::api::{NewBatchImage, NewTastingNote, TastingNotePatch};
use brinelog_common::models::{Batch, BatchImage, Identified, TastingNote};
use brinelog_common::{Error, Result};
use std::sync::Arc;

/// Confirmation gate for destructive operations
///
/// The UI shell implements this with a real dialog; a declined
/// confirmation turns the operation into a silent no-op and no network
/// call is issued.
pub trait ConfirmPolicy: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything. For headless use and tests.
pub struct AlwaysConfirm;

impl ConfirmPolicy for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Seam over the batch sub-resource endpoints
#[async_trait]
pub trait BatchBackend: Send + Sync {
    async fn create_image(&self, batch_id: &str, image: &NewBatchImage) -> Result<BatchImage>;
    async fn delete_image(&self, image_id: i64) -> Result<()>;
    async fn create_note(&self, batch_id: &str, note: &NewTastingNote) -> Result<TastingNote>;
    async fn update_note(&self, note_id: i64, patch: &TastingNotePatch) -> Result<TastingNote>;
    async fn delete_note(&self, note_id: i64) -> Result<()>;
    async fn clear_note_image(&self, note_id: i64) -> Result<TastingNote>;
}

/// Replace the record with the same identity in place, or append.
/// Order of untouched entries is preserved.
fn apply_record<T: Identified>(collection: &mut Vec<T>, record: T) {
    match collection.iter_mut().find(|e| e.ident() == record.ident()) {
        Some(slot) => *slot = record,
        None => collection.push(record),
    }
}

/// Remove by identity; absent is a no-op. Returns whether anything left.
fn remove_record<T: Identified>(collection: &mut Vec<T>, id: T::Id) -> bool {
    let before = collection.len();
    collection.retain(|e| e.ident() != id);
    collection.len() != before
}

/// Store for one rendered batch and its owned collections
pub struct BatchStore {
    backend: Arc<dyn BatchBackend>,
    confirm: Arc<dyn ConfirmPolicy>,
    batch: Batch,
}

impl BatchStore {
    pub fn new(backend: Arc<dyn BatchBackend>, confirm: Arc<dyn ConfirmPolicy>, batch: Batch) -> Self {
        Self {
            backend,
            confirm,
            batch,
        }
    }

    /// Current batch snapshot
    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    /// Replace the whole snapshot (e.g. after a PATCH on the batch itself)
    pub fn replace_batch(&mut self, batch: Batch) {
        self.batch = batch;
    }

    /// Create an image record for an already-uploaded URL, then append
    /// the server-returned record.
    pub async fn add_image(&mut self, image_url: &str) -> Result<&Batch> {
        let payload = NewBatchImage {
            image_url: image_url.to_string(),
        };
        let record = self
            .backend
            .create_image(&self.batch.id, &payload)
            .await
            .map_err(log_failure("attach image"))?;
        apply_record(&mut self.batch.images, record);
        Ok(&self.batch)
    }

    /// Confirm, delete server-side, then drop the local record
    ///
    /// Returns false when the user declined (no call issued). Deleting
    /// an identity the server no longer has is non-fatal: the local
    /// record is dropped and the operation reports success.
    pub async fn remove_image(&mut self, image_id: i64) -> Result<bool> {
        if !self.confirm.confirm("Delete this image?") {
            return Ok(false);
        }
        match self.backend.delete_image(image_id).await {
            Ok(()) => {}
            Err(Error::NotFound(_)) => {
                tracing::debug!(image_id, "image already deleted server-side");
            }
            Err(e) => return Err(log_failure("delete image")(e)),
        }
        remove_record(&mut self.batch.images, image_id);
        Ok(true)
    }

    /// Create a tasting note, then append the server-returned record
    pub async fn add_note(&mut self, note: &NewTastingNote) -> Result<&TastingNote> {
        let record = self
            .backend
            .create_note(&self.batch.id, note)
            .await
            .map_err(log_failure("add tasting note"))?;
        let id = record.id;
        apply_record(&mut self.batch.tasting_notes, record);
        Ok(self.note_by_id(id))
    }

    /// Patch a tasting note, replacing the local record in place by
    /// identity; untouched notes keep their order.
    pub async fn update_note(&mut self, note_id: i64, patch: &TastingNotePatch) -> Result<&TastingNote> {
        let record = self
            .backend
            .update_note(note_id, patch)
            .await
            .map_err(log_failure("update tasting note"))?;
        let id = record.id;
        apply_record(&mut self.batch.tasting_notes, record);
        Ok(self.note_by_id(id))
    }

    /// Confirm, delete server-side, then drop the local record.
    /// Same idempotence as [`remove_image`](BatchStore::remove_image).
    pub async fn remove_note(&mut self, note_id: i64) -> Result<bool> {
        if !self.confirm.confirm("Delete this tasting note?") {
            return Ok(false);
        }
        match self.backend.delete_note(note_id).await {
            Ok(()) => {}
            Err(Error::NotFound(_)) => {
                tracing::debug!(note_id, "note already deleted server-side");
            }
            Err(e) => return Err(log_failure("delete tasting note")(e)),
        }
        remove_record(&mut self.batch.tasting_notes, note_id);
        Ok(true)
    }

    /// Detach a note's image server-side and apply the returned note
    pub async fn clear_note_image(&mut self, note_id: i64) -> Result<&TastingNote> {
        let record = self
            .backend
            .clear_note_image(note_id)
            .await
            .map_err(log_failure("clear note image"))?;
        let id = record.id;
        apply_record(&mut self.batch.tasting_notes, record);
        Ok(self.note_by_id(id))
    }

    fn note_by_id(&self, id: i64) -> &TastingNote {
        self.batch
            .tasting_notes
            .iter()
            .find(|n| n.id == id)
            .expect("record was just applied")
    }
}

fn log_failure(operation: &'static str) -> impl Fn(Error) -> Error {
    move |e| {
        tracing::error!("{} failed: {}", operation, e);
        e
    }
}
