//! # Brinelog Common Library
//!
//! Shared code for the brinelog client crates including:
//! - Domain models (recipes, batches, tasting notes, images)
//! - API request payload types
//! - Event types (ClientEvent enum) and the EventBus
//! - Error taxonomy
//! - Configuration loading

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod models;

pub use error::{Error, Result};
