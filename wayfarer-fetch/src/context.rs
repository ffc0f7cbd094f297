//! Fetch context shared by all adapters.
//!
//! The context bundles the HTTP transport, the credential store, and the
//! token manager. Adapters receive it by reference and never own any of
//! the pieces.

use std::sync::Arc;

use crate::credentials::CredentialStore;
use crate::token::TokenManager;
use crate::transport::{HttpClient, TransportSettings};

/// Shared context for fetch operations.
#[derive(Debug, Clone)]
pub struct FetchContext {
    /// The HTTP transport with its retry policy.
    pub http: HttpClient,
    /// Provider credentials and tuning values.
    pub credentials: Arc<CredentialStore>,
    /// Bearer token cache for OAuth providers.
    pub tokens: Arc<TokenManager>,
}

impl FetchContext {
    /// Creates a context from its parts.
    pub fn new(http: HttpClient, credentials: CredentialStore, tokens: TokenManager) -> Self {
        Self {
            http,
            credentials: Arc::new(credentials),
            tokens: Arc::new(tokens),
        }
    }

    /// Creates a context with default transport settings (TLS verification
    /// on unless the store's diagnostic flag is set) and no token
    /// endpoints registered.
    pub fn with_credentials(credentials: CredentialStore) -> Self {
        let settings = TransportSettings {
            allow_insecure_tls: credentials.allow_insecure_tls(),
            ..TransportSettings::default()
        };
        Self::new(
            HttpClient::with_settings(&settings),
            credentials,
            TokenManager::new(),
        )
    }

    /// Context for unit tests: default transport, given credentials,
    /// empty token manager.
    pub fn for_tests(credentials: CredentialStore) -> Self {
        Self::with_credentials(credentials)
    }
}
