//! API request payload types
//!
//! Create payloads carry every required field; patch payloads serialize
//! only the fields that are set, so an untouched field is left alone by
//! the server (`exclude_unset` semantics on the backend side).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body for `POST /recipes/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    pub ingredients: String,
    pub instructions: String,
}

/// Body for `PATCH /recipes/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Body for `POST /batches/`
///
/// `fridge_date` is sent explicitly (including `null`) so the server can
/// distinguish "no fridge date" from "unchanged". No client-side check
/// that it is ≥ `made_date`; the backend owns that rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBatch {
    pub recipe_id: i64,
    pub made_date: NaiveDate,
    pub fridge_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Body for `PATCH /batches/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub made_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fridge_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

/// Body for `POST /batches/{id}/tasting-notes/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTastingNote {
    pub reviewer_name: String,
    pub rating: u8,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body for `PATCH /tasting-notes/{id}`
///
/// Clearing an image is its own endpoint (`DELETE /tasting-notes/{id}/image`),
/// so `image_url` here only ever sets a new URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TastingNotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body for `POST /batches/{id}/images/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBatchImage {
    pub image_url: String,
}

/// Response of `GET /signature?upload_preset=...`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSignature {
    /// SHA-1 hex digest over the sorted upload params plus the API secret
    pub signature: String,
    /// Unix epoch seconds the signature was minted for
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_skips_unset_fields() {
        let patch = TastingNotePatch {
            rating: Some(5),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"rating":5}"#);
    }

    #[test]
    fn batch_patch_can_null_fridge_date() {
        let patch = BatchPatch {
            fridge_date: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"fridge_date":null}"#);
    }

    #[test]
    fn new_note_omits_absent_image() {
        let body = NewTastingNote {
            reviewer_name: "Sam".to_string(),
            rating: 4,
            note: "Great crunch".to_string(),
            image_url: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("image_url"));
    }
}
