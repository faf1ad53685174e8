//! Typed endpoint facade over [`ResourceClient`]
//!
//! One method per backend endpoint. Also implements the [`BatchIndex`]
//! and [`BatchBackend`] seams so the search engine and batch store run
//! against the real backend in production and against fakes in tests.

use async_trait::async_trait;
use brinelog_common::api::{
    BatchPatch, NewBatch, NewBatchImage, NewRecipe, NewTastingNote, RecipePatch, TastingNotePatch,
};
use brinelog_common::models::{Batch, BatchImage, Recipe, StatsSummary, TastingNote};
use brinelog_common::Result;
use std::sync::Arc;

use crate::search::{BatchIndex, SearchFilter};
use crate::store::{BatchBackend, BatchStore, ConfirmPolicy};
use crate::transport::ResourceClient;

/// Typed view of the backend REST API
#[derive(Clone)]
pub struct Api {
    transport: Arc<ResourceClient>,
}

impl Api {
    pub fn new(transport: Arc<ResourceClient>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<ResourceClient> {
        &self.transport
    }

    // ---- recipes ----

    pub async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        self.transport.get("/recipes/", &[]).await
    }

    pub async fn recipe(&self, recipe_id: i64) -> Result<Recipe> {
        self.transport
            .get(&format!("/recipes/{}", recipe_id), &[])
            .await
    }

    pub async fn create_recipe(&self, recipe: &NewRecipe) -> Result<Recipe> {
        self.transport.post("/recipes/", recipe).await
    }

    pub async fn update_recipe(&self, recipe_id: i64, patch: &RecipePatch) -> Result<Recipe> {
        self.transport
            .patch(&format!("/recipes/{}", recipe_id), patch)
            .await
    }

    // ---- batches ----

    pub async fn batches_for_recipe(&self, recipe_id: i64) -> Result<Vec<Batch>> {
        self.transport
            .get(&format!("/recipes/{}/batches", recipe_id), &[])
            .await
    }

    pub async fn batch(&self, batch_id: &str) -> Result<Batch> {
        self.transport
            .get(&format!("/batches/{}", batch_id), &[])
            .await
    }

    pub async fn create_batch(&self, batch: &NewBatch) -> Result<Batch> {
        self.transport.post("/batches/", batch).await
    }

    pub async fn update_batch(&self, batch_id: &str, patch: &BatchPatch) -> Result<Batch> {
        self.transport
            .patch(&format!("/batches/{}", batch_id), patch)
            .await
    }

    /// Confirm-gated batch deletion (cascades server-side to the
    /// batch's images and notes). Declined → silent no-op.
    pub async fn delete_batch(&self, batch_id: &str, confirm: &dyn ConfirmPolicy) -> Result<bool> {
        if !confirm.confirm("Delete this batch and all its notes and photos?") {
            return Ok(false);
        }
        self.transport
            .delete(&format!("/batches/{}", batch_id))
            .await?;
        Ok(true)
    }

    /// Filtered batch search (`GET /batches/`); unset filter fields are
    /// omitted from the query string
    pub async fn search_batches(&self, filter: &SearchFilter) -> Result<Vec<Batch>> {
        self.transport.get("/batches/", &filter.to_query()).await
    }

    /// Fetch a batch and wrap it in a store for collection editing
    pub async fn open_batch(
        &self,
        batch_id: &str,
        confirm: Arc<dyn ConfirmPolicy>,
    ) -> Result<BatchStore> {
        let batch = self.batch(batch_id).await?;
        Ok(BatchStore::new(Arc::new(self.clone()), confirm, batch))
    }

    // ---- stats ----

    pub async fn stats(&self) -> Result<StatsSummary> {
        self.transport.get("/stats", &[]).await
    }
}

#[async_trait]
impl BatchIndex for Api {
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Batch>> {
        self.search_batches(filter).await
    }
}

#[async_trait]
impl BatchBackend for Api {
    async fn create_image(&self, batch_id: &str, image: &NewBatchImage) -> Result<BatchImage> {
        self.transport
            .post(&format!("/batches/{}/images/", batch_id), image)
            .await
    }

    async fn delete_image(&self, image_id: i64) -> Result<()> {
        self.transport
            .delete(&format!("/batch-images/{}", image_id))
            .await
    }

    async fn create_note(&self, batch_id: &str, note: &NewTastingNote) -> Result<TastingNote> {
        self.transport
            .post(&format!("/batches/{}/tasting-notes/", batch_id), note)
            .await
    }

    async fn update_note(&self, note_id: i64, patch: &TastingNotePatch) -> Result<TastingNote> {
        self.transport
            .patch(&format!("/tasting-notes/{}", note_id), patch)
            .await
    }

    async fn delete_note(&self, note_id: i64) -> Result<()> {
        self.transport
            .delete(&format!("/tasting-notes/{}", note_id))
            .await
    }

    async fn clear_note_image(&self, note_id: i64) -> Result<TastingNote> {
        self.transport
            .delete_json(&format!("/tasting-notes/{}/image", note_id))
            .await
    }
}
