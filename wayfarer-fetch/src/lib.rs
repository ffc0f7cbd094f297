// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Wayfarer Fetch
//!
//! Resilient acquisition machinery for Wayfarer: the HTTP transport with
//! its uniform retry/backoff policy, the credential store, the
//! single-flight token manager, the adapter trait, and the fallback chain
//! that tries adapters in priority order.
//!
//! ## Key Types
//!
//! - [`HttpClient`] / [`RetryPolicy`] - transport with retries, jittered
//!   backoff, `Retry-After` handling, and a total wall-clock budget
//! - [`CredentialStore`] - env-sourced provider credentials, read once
//! - [`TokenManager`] / [`AuthToken`] - client-credentials tokens with
//!   single-flight refresh
//! - [`Adapter`] - one provider serving one capability
//! - [`FallbackChain`] - adapters in priority order with an attempt trail
//! - [`FetchError`] / [`AuthError`] - the typed failure taxonomy

pub mod adapter;
pub mod chain;
pub mod context;
pub mod credentials;
pub mod error;
pub mod token;
pub mod transport;

pub use adapter::Adapter;
pub use chain::{ChainAttempt, ChainOutcome, ChainResult, FallbackChain};
pub use context::FetchContext;
pub use credentials::CredentialStore;
pub use error::{AuthError, FetchError};
pub use token::{AuthToken, TokenEndpoint, TokenManager};
pub use transport::{retry_after_secs, HttpClient, RetryPolicy, TransportSettings};
