//! Core traits and decision functions of the catalog

pub mod auth;
pub mod blob;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod policy;
pub mod scope;
pub mod search;
pub mod service;
pub mod store;

pub use auth::{AuthContext, AuthProvider, NoAuthProvider, Principal, StaticTokenAuthProvider};
pub use blob::{BlobStore, InMemoryBlobStore, LocalBlobStore};
pub use entity::Entity;
pub use error::{ShelfError, ShelfResult, StorageError, ValidationError};
pub use extractors::{Payload, ResourceId};
pub use policy::{Decision, ResourceKind, Target, Verb};
pub use search::SearchQuery;
pub use service::LibraryStore;
pub use store::{BookFilter, RecordFilter, ReviewFilter};
