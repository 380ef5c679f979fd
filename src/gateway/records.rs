//! Reading record operations
//!
//! Records are private to their reader. Every lookup goes through
//! [`scope::find_record`], so another reader's record is simply not found.

use uuid::Uuid;

use super::{record_view, require_principal};
use crate::core::auth::AuthContext;
use crate::core::error::ShelfResult;
use crate::core::extractors::Payload;
use crate::core::policy::{self, ResourceKind, Target, Verb};
use crate::core::scope;
use crate::core::service::LibraryStore;
use crate::entities::{BookRecordInput, BookRecordPatch, BookRecordView};

pub async fn list(store: &dyn LibraryStore, ctx: &AuthContext) -> ShelfResult<Vec<BookRecordView>> {
    let principal = policy::authorize(ctx, ResourceKind::BookRecord, Verb::List, Target::None)?;

    let records = store.list_records(&scope::records(principal)).await?;
    let mut views = Vec::with_capacity(records.len());
    for record in &records {
        views.push(record_view(store, record).await?);
    }
    Ok(views)
}

pub async fn get(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    id: Uuid,
) -> ShelfResult<BookRecordView> {
    let principal = require_principal(ctx)?;
    let record = scope::find_record(store, principal, id).await?;
    policy::authorize(ctx, ResourceKind::BookRecord, Verb::Get, Target::Record(&record))?;
    record_view(store, &record).await
}

/// Create a record owned by the caller
pub async fn create(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    input: impl Into<Payload<BookRecordInput>>,
) -> ShelfResult<BookRecordView> {
    let principal = policy::authorize(ctx, ResourceKind::BookRecord, Verb::Create, Target::None)?;
    let input = input.into().into_valid()?;

    let record = store
        .create_record(scope::stamp_record(principal, input))
        .await?;
    tracing::info!(
        record_id = %record.id,
        book_id = %record.book_id,
        user_id = %principal.user_id,
        "book record created"
    );
    record_view(store, &record).await
}

pub async fn update(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    id: Uuid,
    input: impl Into<Payload<BookRecordInput>>,
) -> ShelfResult<BookRecordView> {
    let principal = require_principal(ctx)?;
    let mut record = scope::find_record(store, principal, id).await?;
    policy::authorize(ctx, ResourceKind::BookRecord, Verb::Update, Target::Record(&record))?;
    let input = input.into().into_valid()?;

    record.replace(input);
    let record = store.update_record(record).await?;
    record_view(store, &record).await
}

pub async fn patch(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    id: Uuid,
    patch: impl Into<Payload<BookRecordPatch>>,
) -> ShelfResult<BookRecordView> {
    let principal = require_principal(ctx)?;
    let mut record = scope::find_record(store, principal, id).await?;
    policy::authorize(ctx, ResourceKind::BookRecord, Verb::Update, Target::Record(&record))?;
    let patch = patch.into().into_valid()?;

    record.apply(patch);
    let record = store.update_record(record).await?;
    record_view(store, &record).await
}

pub async fn delete(store: &dyn LibraryStore, ctx: &AuthContext, id: Uuid) -> ShelfResult<()> {
    let principal = require_principal(ctx)?;
    let record = scope::find_record(store, principal, id).await?;
    policy::authorize(ctx, ResourceKind::BookRecord, Verb::Delete, Target::Record(&record))?;

    store.delete_record(&record.id).await?;
    tracing::info!(record_id = %id, user_id = %principal.user_id, "book record deleted");
    Ok(())
}
