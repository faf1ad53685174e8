//! Tasting note edit form
//!
//! One reusable editing surface for both creating and updating a note.
//! Create mode clears the transient fields after a successful submit so
//! the next review can be typed straight away; edit mode leaves the
//! fields alone and reports the outcome so the caller can dismiss the
//! form.

use brinelog_common::api::{NewTastingNote, TastingNotePatch};
use brinelog_common::models::TastingNote;
use brinelog_common::Result;

use crate::search::MAX_STARS;
use crate::store::BatchStore;

/// Placeholder reviewer name in create mode
pub const DEFAULT_REVIEWER: &str = "Maker";

/// What a submit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new note was created; transient fields were cleared
    Created,
    /// An existing note was patched; fields kept, caller dismisses
    Updated,
    /// A submit was already in flight; nothing was sent
    Ignored,
}

/// Create-or-edit state machine for a single tasting note
#[derive(Debug, Clone)]
pub struct NoteEditForm {
    note_id: Option<i64>,
    seed: Option<TastingNote>,
    pub reviewer_name: String,
    pub rating: u8,
    pub note: String,
    pub image_url: Option<String>,
    submitting: bool,
}

impl NoteEditForm {
    /// Idle/Create state: no identity, defaults in every field
    pub fn new_entry() -> Self {
        Self {
            note_id: None,
            seed: None,
            reviewer_name: DEFAULT_REVIEWER.to_string(),
            rating: 0,
            note: String::new(),
            image_url: None,
            submitting: false,
        }
    }

    /// Editing state, seeded from an existing note
    pub fn edit(existing: &TastingNote) -> Self {
        Self {
            note_id: Some(existing.id),
            seed: Some(existing.clone()),
            reviewer_name: existing.reviewer_name.clone(),
            rating: existing.rating,
            note: existing.note.clone(),
            image_url: existing.image_url.clone(),
            submitting: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.note_id.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Star input: sets the rating directly (no toggle), clamped to 0..=5
    pub fn set_rating(&mut self, stars: u8) {
        self.rating = stars.min(MAX_STARS);
    }

    /// Submit through the store owning the rendered batch
    ///
    /// Ignored while a submit is in flight (the UI disables the button;
    /// this is the matching guard).
    pub async fn submit(&mut self, store: &mut BatchStore) -> Result<SubmitOutcome> {
        if self.submitting {
            return Ok(SubmitOutcome::Ignored);
        }
        self.submitting = true;
        let outcome = self.submit_inner(store).await;
        self.submitting = false;
        outcome
    }

    async fn submit_inner(&mut self, store: &mut BatchStore) -> Result<SubmitOutcome> {
        match self.note_id {
            None => {
                let payload = NewTastingNote {
                    reviewer_name: self.reviewer_name.clone(),
                    rating: self.rating,
                    note: self.note.clone(),
                    image_url: self.image_url.clone(),
                };
                store.add_note(&payload).await?;
                // Ready for the next review; the reviewer keeps typing
                // under the same name.
                self.note.clear();
                self.rating = 0;
                self.image_url = None;
                Ok(SubmitOutcome::Created)
            }
            Some(note_id) => {
                let patch = TastingNotePatch {
                    reviewer_name: Some(self.reviewer_name.clone()),
                    rating: Some(self.rating),
                    note: Some(self.note.clone()),
                    image_url: self.image_url.clone(),
                };
                store.update_note(note_id, &patch).await?;
                Ok(SubmitOutcome::Updated)
            }
        }
    }

    /// Discard local edits, restoring the seeded snapshot. No network
    /// call. Meaningful in edit mode only; a create form resets to
    /// defaults.
    pub fn cancel(&mut self) {
        match self.seed.take() {
            Some(seed) => {
                *self = Self::edit(&seed);
            }
            None => {
                *self = Self::new_entry();
            }
        }
    }
}
