//! # Brinelog Client
//!
//! Client-side logic for the fermentation batch tracker: typed transport
//! to the backend REST API, the signed-upload protocol for publishing
//! photos, the debounced rating-range batch search, and the nested
//! collection store that keeps a batch's tasting notes and images in sync
//! with the server.
//!
//! Rendering, navigation, and the login surface are external
//! collaborators; they consume these state machines and subscribe to the
//! [`EventBus`](brinelog_common::events::EventBus) for the
//! authorization-required signal.

pub mod api;
pub mod credentials;
pub mod debounce;
pub mod forms;
pub mod search;
pub mod store;
pub mod transport;
pub mod upload;

pub use api::Api;
pub use credentials::CredentialStore;
pub use forms::{NoteEditForm, SubmitOutcome};
pub use search::{BatchIndex, BatchSearchEngine, SearchFilter};
pub use store::{AlwaysConfirm, BatchBackend, BatchStore, ConfirmPolicy};
pub use transport::ResourceClient;
pub use upload::{SignedUploadCoordinator, UploadControl};
