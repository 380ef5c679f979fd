//! Authentication context for incoming requests
//!
//! Credential issuance is owned by an external collaborator. This module only
//! resolves a request to a user id through an [`AuthProvider`] and carries the
//! resulting [`Principal`] through the gateway.

use anyhow::Result;
use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::User;

/// The authenticated identity behind a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl Principal {
    /// Identity comparison is by primary key only
    pub fn is(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// Authorization context extracted from a request
#[derive(Debug, Clone)]
pub enum AuthContext {
    Authenticated(Principal),

    /// No valid credentials
    Anonymous,
}

impl AuthContext {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            AuthContext::Authenticated(principal) => Some(principal),
            AuthContext::Anonymous => None,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.principal().map(|p| p.user_id)
    }

    pub fn is_admin(&self) -> bool {
        self.principal().is_some_and(|p| p.is_admin)
    }
}

/// Trait for auth providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve the request credentials to a user id, `None` when anonymous
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Uuid>>;
}

/// Default no-auth provider: every request is anonymous
pub struct NoAuthProvider;

#[async_trait]
impl AuthProvider for NoAuthProvider {
    async fn resolve(&self, _headers: &HeaderMap) -> Result<Option<Uuid>> {
        Ok(None)
    }
}

/// Maps opaque API tokens to user ids.
///
/// Accepts `Authorization: Token <key>` as well as `Authorization: Bearer <key>`.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthProvider {
    tokens: HashMap<String, Uuid>,
}

impl StaticTokenAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, user_id: Uuid) -> Self {
        self.insert(token, user_id);
        self
    }

    pub fn insert(&mut self, token: impl Into<String>, user_id: Uuid) {
        self.tokens.insert(token.into(), user_id);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Extract the key from `Token <key>` or `Bearer <key>`
pub fn parse_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, key) = value.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer") {
        let key = key.trim();
        (!key.is_empty()).then_some(key)
    } else {
        None
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuthProvider {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Uuid>> {
        Ok(parse_token(headers).and_then(|key| self.tokens.get(key).copied()))
    }
}
