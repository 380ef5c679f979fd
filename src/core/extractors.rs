//! Axum extractors for request payloads and path identifiers
//!
//! A malformed body or id is reported in the same `{"code", "message",
//! "details"}` shape as any other validation failure.

use std::convert::Infallible;

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use super::error::{ShelfError, ValidationError};

/// JSON request body whose rejection is held back
///
/// Extraction never fails. A malformed body or a `#[validate(...)]` rule
/// violation is kept and only raised by [`Payload::into_valid`], which the
/// gateway calls after the caller has been authorized. An anonymous or
/// denied caller therefore sees 401/403 whatever the body looks like.
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create(ctx: &AuthContext, input: impl Into<Payload<BookInput>>) -> ShelfResult<()> {
///     policy::authorize(ctx, ResourceKind::Book, Verb::Create, Target::None)?;
///     let input = input.into().into_valid()?;
///     // input passed the `#[validate(...)]` rules
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Payload<T>(Result<T, ValidationError>);

impl<T: Validate> Payload<T> {
    /// The deserialized body, checked against its field rules
    pub fn into_valid(self) -> Result<T, ValidationError> {
        let payload = self.0?;
        payload.validate()?;
        Ok(payload)
    }
}

impl<T> From<T> for Payload<T> {
    fn from(payload: T) -> Self {
        Payload(Ok(payload))
    }
}

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Json::<T>::from_request(req, state)
            .await
            .map(|Json(payload)| payload)
            .map_err(|rejection| ValidationError::InvalidJson {
                message: rejection.body_text(),
            });
        Ok(Payload(body))
    }
}

/// Parse a path segment as a resource id
pub fn parse_id(raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw).map_err(|_| ValidationError::InvalidId {
        value: raw.to_string(),
    })
}

/// The single `{id}` segment of a detail route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub Uuid);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ShelfError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ShelfError::Internal(rejection.body_text()))?;
        Ok(ResourceId(parse_id(&raw)?))
    }
}
