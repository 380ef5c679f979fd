//! Self-service user profile operations
//!
//! A profile is reachable only by its owner. The policy check runs on the
//! path id alone, before any lookup, so probing someone else's id tells the
//! caller nothing about whether that user exists.

use axum::body::Bytes;
use axum::http::{HeaderMap, header};
use uuid::Uuid;

use crate::core::auth::AuthContext;
use crate::core::blob::BlobStore;
use crate::core::entity::Entity;
use crate::core::error::{ShelfError, ShelfResult, ValidationError};
use crate::core::extractors::Payload;
use crate::core::policy::{self, ResourceKind, Target, Verb};
use crate::core::service::LibraryStore;
use crate::entities::{ProfileInput, User, UserView};

/// A raw file body with the name the client gave it
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub data: Bytes,
}

impl PhotoUpload {
    pub const DEFAULT_FILE_NAME: &'static str = "upload";

    /// Build an upload from a request. The name comes from
    /// `Content-Disposition: attachment; filename=...`.
    pub fn from_parts(headers: &HeaderMap, data: Bytes) -> Self {
        let file_name = headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_file_name)
            .unwrap_or_else(|| Self::DEFAULT_FILE_NAME.to_string());
        Self { file_name, data }
    }
}

fn disposition_file_name(value: &str) -> Option<String> {
    value.split(';').skip(1).find_map(|param| {
        let (key, raw) = param.trim().split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let name = raw.trim().trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}

pub async fn get_profile(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    id: Uuid,
) -> ShelfResult<UserView> {
    policy::authorize(ctx, ResourceKind::UserProfile, Verb::Get, Target::Profile(id))?;
    let user = load(store, id).await?;
    Ok(UserView::from(&user))
}

pub async fn update_profile(
    store: &dyn LibraryStore,
    ctx: &AuthContext,
    id: Uuid,
    input: impl Into<Payload<ProfileInput>>,
) -> ShelfResult<UserView> {
    policy::authorize(ctx, ResourceKind::UserProfile, Verb::Update, Target::Profile(id))?;
    let input = input.into().into_valid()?;

    let mut user = load(store, id).await?;
    user.apply(input);
    let user = store.update_user(user).await?;
    Ok(UserView::from(&user))
}

/// Store `upload` as the caller's profile photo.
///
/// The blob is written first and the profile updated afterwards. If the
/// profile update fails the new blob is removed again; once it succeeds the
/// previous photo, if any, is removed.
pub async fn attach_photo(
    store: &dyn LibraryStore,
    blobs: &dyn BlobStore,
    ctx: &AuthContext,
    id: Uuid,
    upload: PhotoUpload,
) -> ShelfResult<UserView> {
    policy::authorize(ctx, ResourceKind::UserProfile, Verb::Update, Target::Profile(id))?;
    if upload.data.is_empty() {
        return Err(ValidationError::MissingFile.into());
    }

    let mut user = load(store, id).await?;
    let previous = user.photo.take();

    let key = blobs.save(&upload.file_name, upload.data).await?;
    user.set_photo(key.clone());

    match store.update_user(user).await {
        Ok(user) => {
            tracing::info!(user_id = %id, photo = %key, "profile photo attached");
            if let Some(old) = previous.filter(|old| *old != key) {
                if let Err(err) = blobs.delete(&old).await {
                    tracing::warn!(user_id = %id, photo = %old, error = %err, "failed to remove previous photo");
                }
            }
            Ok(UserView::from(&user))
        }
        Err(err) => {
            if let Err(cleanup) = blobs.delete(&key).await {
                tracing::warn!(user_id = %id, photo = %key, error = %cleanup, "failed to remove orphaned photo");
            }
            Err(err)
        }
    }
}

async fn load(store: &dyn LibraryStore, id: Uuid) -> ShelfResult<User> {
    store
        .get_user(&id)
        .await?
        .ok_or_else(|| ShelfError::not_found(User::resource_name_singular(), id))
}
