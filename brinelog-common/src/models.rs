//! Domain models mirroring the backend wire format
//!
//! The backend is the source of truth for every record; these types only
//! describe what it returns. Timestamps arrive without a timezone suffix
//! (server-side UTC), hence `NaiveDateTime`.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A fermentation recipe. Owns zero or more batches server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    /// Free text, newline-separated
    pub ingredients: String,
    /// Free text, newline-separated
    pub instructions: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One production run of a recipe
///
/// Batch ids are server-generated strings in `YYMMDD` / `YYMMDD-N` form,
/// derived from `made_date`. Deleting a batch cascade-deletes its images
/// and tasting notes server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: String,
    pub recipe_id: i64,
    pub made_date: NaiveDate,
    /// When the batch went into the fridge. Expected ≥ `made_date` when
    /// present; the backend owns that rule, the client passes it through.
    pub fridge_date: Option<NaiveDate>,
    /// Free-text production notes
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    /// Ordered; insertion order is preserved by the server
    #[serde(default)]
    pub images: Vec<BatchImage>,
    /// Ordered; insertion order is preserved by the server
    #[serde(default)]
    pub tasting_notes: Vec<TastingNote>,
    /// Server-computed mean of this batch's note ratings, rounded to one
    /// decimal. None when the batch has no notes.
    #[serde(default)]
    pub average_rating: Option<f64>,
}

/// A single reviewer's rating and comment on a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TastingNote {
    pub id: i64,
    pub batch_id: String,
    pub reviewer_name: String,
    /// Integer stars in 0..=5; 0 means unset
    pub rating: u8,
    pub note: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
}

/// A photo attached to a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchImage {
    pub id: i64,
    pub batch_id: String,
    pub image_url: String,
}

/// Aggregate counters plus activity-calendar data from `GET /stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_recipes: i64,
    pub total_batches: i64,
    pub average_rating: f64,
    #[serde(default)]
    pub activity: Vec<ActivityDay>,
}

/// One day of batch-logging activity, pre-bucketed server-side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDay {
    /// ISO date
    pub date: NaiveDate,
    pub count: i64,
    /// Heat level in 0..=4 for calendar rendering
    pub level: u8,
}

/// Entities that live in an identity-keyed collection
///
/// Local collection merges replace records by id, never by position.
pub trait Identified {
    type Id: PartialEq + Copy;

    fn ident(&self) -> Self::Id;
}

impl Identified for TastingNote {
    type Id = i64;

    fn ident(&self) -> i64 {
        self.id
    }
}

impl Identified for BatchImage {
    type Id = i64;

    fn ident(&self) -> i64 {
        self.id
    }
}
