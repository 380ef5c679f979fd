//! ServerBuilder for fluent API to build HTTP servers

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::router::build_router;
use super::state::AppState;
use crate::config::LibraryConfig;
use crate::core::auth::{AuthProvider, StaticTokenAuthProvider};
use crate::core::blob::{BlobStore, LocalBlobStore};
use crate::core::service::LibraryStore;
use crate::entities::User;
use crate::storage::InMemoryLibraryStore;

/// Builder for the catalog server
///
/// Every collaborator has a default: an in-memory store, a blob store under
/// `media.root`, and a token provider fed by the configured accounts.
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(LibraryConfig::from_yaml_file("shelf.yaml")?)
///     .serve("127.0.0.1:8000")
///     .await?;
/// ```
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<LibraryConfig>,
    store: Option<Arc<dyn LibraryStore>>,
    auth: Option<Arc<dyn AuthProvider>>,
    blobs: Option<Arc<dyn BlobStore>>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LibraryConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_store(mut self, store: impl LibraryStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Replace token authentication. Configured accounts are still seeded,
    /// their tokens are not used.
    pub fn with_auth_provider(mut self, provider: impl AuthProvider + 'static) -> Self {
        self.auth = Some(Arc::new(provider));
        self
    }

    pub fn with_blob_store(mut self, blobs: impl BlobStore + 'static) -> Self {
        self.blobs = Some(Arc::new(blobs));
        self
    }

    /// Seed the configured accounts and assemble the shared state
    pub async fn build_state(self) -> Result<AppState> {
        let config = self.config.unwrap_or_default();
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryLibraryStore::new()));

        let mut tokens = StaticTokenAuthProvider::new();
        for account in &config.accounts {
            let user = store
                .create_user(User::new(
                    account.username.clone(),
                    account.email.clone(),
                    account.is_admin,
                ))
                .await?;
            tokens.insert(account.token.clone(), user.id);
            tracing::debug!(
                username = %user.username,
                is_admin = user.is_admin,
                "seeded account"
            );
        }

        let auth = match self.auth {
            Some(provider) => provider,
            None => Arc::new(tokens),
        };
        let blobs = self
            .blobs
            .unwrap_or_else(|| Arc::new(LocalBlobStore::new(config.media.root.clone())));

        tracing::info!(accounts = config.accounts.len(), "server state ready");
        Ok(AppState { store, auth, blobs })
    }

    /// Build the router. The routing table is fixed from here on.
    pub async fn build(self) -> Result<Router> {
        Ok(build_router(self.build_state().await?))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build().await?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::NoAuthProvider;
    use crate::core::blob::InMemoryBlobStore;
    use axum::http::{HeaderMap, HeaderValue, header};

    fn token(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Token {value}")).unwrap(),
        );
        headers
    }

    #[test]
    fn test_build_state_seeds_accounts_and_tokens() {
        let store = InMemoryLibraryStore::new();
        let state = tokio_test::block_on(
            ServerBuilder::new()
                .with_config(LibraryConfig::default_config())
                .with_store(store.clone())
                .with_blob_store(InMemoryBlobStore::new())
                .build_state(),
        )
        .expect("state should build");

        let admin_id = tokio_test::block_on(state.auth.resolve(&token("admin-token")))
            .unwrap()
            .expect("admin token resolves");
        let admin = tokio_test::block_on(store.get_user(&admin_id))
            .unwrap()
            .expect("admin seeded");
        assert_eq!(admin.username, "admin");
        assert!(admin.is_admin);

        let unknown = tokio_test::block_on(state.auth.resolve(&token("nope"))).unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn test_custom_auth_provider_wins() {
        let state = ServerBuilder::new()
            .with_config(LibraryConfig::default_config())
            .with_auth_provider(NoAuthProvider)
            .with_blob_store(InMemoryBlobStore::new())
            .build_state()
            .await
            .unwrap();
        let resolved = state.auth.resolve(&token("admin-token")).await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_seed_fails() {
        let store = InMemoryLibraryStore::new();
        store
            .create_user(User::new("admin", "other@example.com", false))
            .await
            .unwrap();
        let result = ServerBuilder::new()
            .with_config(LibraryConfig::default_config())
            .with_store(store)
            .build_state()
            .await;
        assert!(result.is_err());
    }
}
