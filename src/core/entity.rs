//! Entity trait shared by every stored record

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for all entities kept by the store.
///
/// All entities have:
/// - id: Unique identifier (the primary key used for every ownership comparison)
/// - created_at: Creation timestamp
/// - updated_at: Last modification timestamp
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "books", "book_records")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "book", "book_record")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;

    /// Path of the detail endpoint for this instance
    fn detail_path(&self) -> String {
        format!("/{}/{}", Self::resource_name(), self.id())
    }
}
