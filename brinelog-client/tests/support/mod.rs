//! Shared fakes for client scenario tests
#![allow(dead_code)]

use async_trait::async_trait;
use brinelog_client::search::{BatchIndex, SearchFilter};
use brinelog_client::store::{BatchBackend, ConfirmPolicy};
use brinelog_common::api::{NewBatchImage, NewTastingNote, TastingNotePatch};
use brinelog_common::models::{Batch, BatchImage, TastingNote};
use brinelog_common::{Error, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Install a test log subscriber; repeated calls are fine
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

pub fn sample_batch(id: &str) -> Batch {
    Batch {
        id: id.to_string(),
        recipe_id: 1,
        made_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        fridge_date: None,
        notes: None,
        created_at: NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
        images: Vec::new(),
        tasting_notes: Vec::new(),
        average_rating: None,
    }
}

pub fn rated_batch(id: &str, average_rating: f64) -> Batch {
    Batch {
        average_rating: Some(average_rating),
        ..sample_batch(id)
    }
}

pub fn sample_note(id: i64, batch_id: &str, reviewer: &str, rating: u8, text: &str) -> TastingNote {
    TastingNote {
        id,
        batch_id: batch_id.to_string(),
        reviewer_name: reviewer.to_string(),
        rating,
        note: text.to_string(),
        image_url: None,
        created_at: NaiveDate::from_ymd_opt(2024, 1, 22)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap(),
    }
}

/// Confirmation stub that declines everything
pub struct NeverConfirm;

impl ConfirmPolicy for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

/// In-memory stand-in for the batch sub-resource endpoints
///
/// Keeps its own arena of notes and images, logs every call, and can be
/// primed to fail the next call.
#[derive(Default)]
pub struct FakeBackend {
    pub notes: Mutex<Vec<TastingNote>>,
    pub images: Mutex<Vec<BatchImage>>,
    next_id: Mutex<i64>,
    pub calls: Mutex<Vec<String>>,
    fail_next: Mutex<Option<Error>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            next_id: Mutex::new(1),
            ..Default::default()
        }
    }

    pub fn fail_next(&self, error: Error) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn take_failure(&self) -> Option<Error> {
        self.fail_next.lock().unwrap().take()
    }

    fn allocate_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        let id = *next;
        *next += 1;
        id
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl BatchBackend for FakeBackend {
    async fn create_image(&self, batch_id: &str, image: &NewBatchImage) -> Result<BatchImage> {
        self.log(format!("create_image:{}", batch_id));
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        let record = BatchImage {
            id: self.allocate_id(),
            batch_id: batch_id.to_string(),
            image_url: image.image_url.clone(),
        };
        self.images.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn delete_image(&self, image_id: i64) -> Result<()> {
        self.log(format!("delete_image:{}", image_id));
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        let mut images = self.images.lock().unwrap();
        let before = images.len();
        images.retain(|i| i.id != image_id);
        if images.len() == before {
            return Err(Error::NotFound("Image not found".to_string()));
        }
        Ok(())
    }

    async fn create_note(&self, batch_id: &str, note: &NewTastingNote) -> Result<TastingNote> {
        self.log(format!("create_note:{}", batch_id));
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        let record = TastingNote {
            id: self.allocate_id(),
            batch_id: batch_id.to_string(),
            reviewer_name: note.reviewer_name.clone(),
            rating: note.rating,
            note: note.note.clone(),
            image_url: note.image_url.clone(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 22)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
        };
        self.notes.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_note(&self, note_id: i64, patch: &TastingNotePatch) -> Result<TastingNote> {
        self.log(format!("update_note:{}", note_id));
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        let mut notes = self.notes.lock().unwrap();
        let note = notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or_else(|| Error::NotFound("Note not found".to_string()))?;
        if let Some(reviewer_name) = &patch.reviewer_name {
            note.reviewer_name = reviewer_name.clone();
        }
        if let Some(rating) = patch.rating {
            note.rating = rating;
        }
        if let Some(text) = &patch.note {
            note.note = text.clone();
        }
        if let Some(image_url) = &patch.image_url {
            note.image_url = Some(image_url.clone());
        }
        Ok(note.clone())
    }

    async fn delete_note(&self, note_id: i64) -> Result<()> {
        self.log(format!("delete_note:{}", note_id));
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|n| n.id != note_id);
        if notes.len() == before {
            return Err(Error::NotFound("Note not found".to_string()));
        }
        Ok(())
    }

    async fn clear_note_image(&self, note_id: i64) -> Result<TastingNote> {
        self.log(format!("clear_note_image:{}", note_id));
        if let Some(e) = self.take_failure() {
            return Err(e);
        }
        let mut notes = self.notes.lock().unwrap();
        let note = notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or_else(|| Error::NotFound("Note not found".to_string()))?;
        note.image_url = None;
        Ok(note.clone())
    }
}

/// In-memory batch index with per-query artificial latency
///
/// Filters its corpus the way the backend does: when a rating bound is
/// set, batches without any rating are excluded; the text query matches
/// against the batch id.
#[derive(Default)]
pub struct FakeIndex {
    pub corpus: Vec<Batch>,
    pub calls: Mutex<Vec<SearchFilter>>,
    pub delays: HashMap<String, Duration>,
}

impl FakeIndex {
    pub fn with_corpus(corpus: Vec<Batch>) -> Self {
        Self {
            corpus,
            ..Default::default()
        }
    }

    pub fn delay_query(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn recorded_calls(&self) -> Vec<SearchFilter> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BatchIndex for FakeIndex {
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Batch>> {
        self.calls.lock().unwrap().push(filter.clone());
        if let Some(delay) = self.delays.get(&filter.query) {
            tokio::time::sleep(*delay).await;
        }
        let results = self
            .corpus
            .iter()
            .filter(|b| filter.query.is_empty() || b.id.contains(&filter.query))
            .filter(|b| {
                if filter.min_rating == 0 && filter.max_rating == 0 {
                    return true;
                }
                match b.average_rating {
                    None => false,
                    Some(avg) => {
                        (filter.min_rating == 0 || avg >= f64::from(filter.min_rating))
                            && (filter.max_rating == 0 || avg <= f64::from(filter.max_rating))
                    }
                }
            })
            .cloned()
            .collect();
        Ok(results)
    }
}
