//! # shelf
//!
//! A library catalog service: books, per-reader reading records, reviews and
//! self-service user profiles, served over a REST API.
//!
//! ## Layers
//!
//! - **Policy** ([`core::policy`]): one pure function decides every
//!   `(principal, resource, verb, target)` combination.
//! - **Scope** ([`core::scope`]): narrows collections to what a principal may
//!   see and stamps ownership on new records and reviews.
//! - **Search** ([`core::search`]): token based free-text matching over book
//!   titles and review bodies.
//! - **Gateway** ([`gateway`]): per-resource operations composed from the
//!   above on top of a [`LibraryStore`](core::service::LibraryStore).
//! - **Server** ([`server`]): axum handlers and the routing table.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shelf::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_config(LibraryConfig::default_config())
//!     .with_store(InMemoryLibraryStore::new())
//!     .build()
//!     .await?;
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod gateway;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthContext, AuthProvider, NoAuthProvider, Principal, StaticTokenAuthProvider},
        blob::{BlobStore, InMemoryBlobStore, LocalBlobStore},
        entity::Entity,
        error::{ShelfError, ShelfResult, StorageError, ValidationError},
        policy::{Decision, ResourceKind, Target, Verb},
        search::SearchQuery,
        service::LibraryStore,
        store::{BookFilter, RecordFilter, ReviewFilter},
    };

    // === Entities ===
    pub use crate::entities::{
        Book, BookDetail, BookInput, BookPatch, BookRecord, BookRecordInput, BookRecordPatch,
        BookRecordView, BookReview, BookReviewInput, BookReviewPatch, BookReviewView,
        BookSummary, ProfileInput, ReadingState, User, UserView,
    };

    // === Configuration & server ===
    pub use crate::config::LibraryConfig;
    pub use crate::server::{AppState, ServerBuilder};
    pub use crate::storage::InMemoryLibraryStore;

    // === Re-exports ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
