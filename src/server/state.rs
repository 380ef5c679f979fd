//! Shared application state and the per-request principal extractor

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::sync::Arc;

use crate::core::auth::{AuthContext, AuthProvider, Principal};
use crate::core::blob::BlobStore;
use crate::core::error::ShelfError;
use crate::core::service::LibraryStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LibraryStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub blobs: Arc<dyn BlobStore>,
}

impl AppState {
    /// Resolve the request credentials and reload the user behind them.
    ///
    /// A credential that maps to a user no longer in the store is anonymous.
    pub async fn authenticate(&self, parts: &Parts) -> Result<AuthContext, ShelfError> {
        let Some(user_id) = self.auth.resolve(&parts.headers).await? else {
            return Ok(AuthContext::Anonymous);
        };

        match self.store.get_user(&user_id).await? {
            Some(user) => Ok(AuthContext::Authenticated(Principal::from(&user))),
            None => {
                tracing::debug!(user_id = %user_id, "credentials map to an unknown user");
                Ok(AuthContext::Anonymous)
            }
        }
    }
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ShelfError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state.authenticate(parts).await
    }
}
