//! Fallback chains: ordered adapters for one capability.
//!
//! A chain executes its adapters in priority order until one succeeds.
//! Provider-local failures (not configured, auth, rate limit, upstream, no
//! results, parse) advance the chain; only full exhaustion surfaces to the
//! caller, as a typed error carrying the attempt trail.

use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use wayfarer_core::{Capability, ProviderId};

use crate::adapter::Adapter;
use crate::context::FetchContext;
use crate::error::FetchError;

// ============================================================================
// Chain Attempt
// ============================================================================

/// Record of a single adapter attempt.
#[derive(Debug, Clone)]
pub struct ChainAttempt {
    /// The adapter id that was attempted.
    pub adapter_id: String,
    /// The provider behind the adapter.
    pub provider: ProviderId,
    /// Whether the attempt succeeded.
    pub success: bool,
    /// Error tag and description if the attempt failed.
    pub error: Option<String>,
    /// How long the attempt took.
    pub duration: Duration,
}

impl ChainAttempt {
    fn success(adapter_id: &str, provider: ProviderId, duration: Duration) -> Self {
        Self {
            adapter_id: adapter_id.to_string(),
            provider,
            success: true,
            error: None,
            duration,
        }
    }

    fn failure(
        adapter_id: &str,
        provider: ProviderId,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            adapter_id: adapter_id.to_string(),
            provider,
            success: false,
            error: Some(error.into()),
            duration,
        }
    }
}

// ============================================================================
// Chain Outcome
// ============================================================================

/// The value produced by a successful chain execution, with provenance.
#[derive(Debug, Clone)]
pub struct ChainResult<T> {
    /// The normalized value.
    pub value: T,
    /// The adapter that produced it.
    pub adapter_id: String,
    /// The provider that produced it.
    pub provider: ProviderId,
}

/// The outcome of one chain execution.
#[derive(Debug)]
pub struct ChainOutcome<T> {
    /// The result (success or final error).
    pub result: Result<ChainResult<T>, FetchError>,
    /// All attempts made, in order.
    pub attempts: Vec<ChainAttempt>,
    /// Total duration across attempts.
    pub duration: Duration,
}

impl<T> ChainOutcome<T> {
    /// Returns true if the chain produced a value.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The provider that succeeded, if any.
    pub fn successful_provider(&self) -> Option<ProviderId> {
        self.result.as_ref().ok().map(|r| r.provider)
    }

    /// True when the value came from an adapter other than the first,
    /// i.e. at least one preferred adapter was passed over.
    pub fn used_fallback(&self) -> bool {
        self.is_success() && self.attempts.iter().take_while(|a| !a.success).count() > 0
    }

    /// All recorded errors, for diagnostics.
    pub fn errors(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref())
            .collect()
    }
}

// ============================================================================
// Fallback Chain
// ============================================================================

/// Ordered adapters for one capability, tried in sequence.
pub struct FallbackChain<P, T> {
    capability: Capability,
    adapters: Vec<Box<dyn Adapter<P, T>>>,
}

impl<P: Sync, T> FallbackChain<P, T> {
    /// Creates a chain over adapters already in priority order.
    pub fn new(capability: Capability, adapters: Vec<Box<dyn Adapter<P, T>>>) -> Self {
        Self {
            capability,
            adapters,
        }
    }

    /// The capability this chain serves.
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// The number of adapters in the chain.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Returns true if the chain has no adapters.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Executes the chain, trying adapters in order until one succeeds.
    ///
    /// Unconfigured adapters are skipped (recorded as attempts, not
    /// errors raised to the caller). Exhaustion yields
    /// [`FetchError::Exhausted`] so callers can tell "all providers
    /// failed" apart from a valid empty result.
    #[instrument(skip(self, ctx, params), fields(capability = %self.capability, adapters = self.adapters.len()))]
    pub async fn execute(&self, ctx: &FetchContext, params: &P) -> ChainOutcome<T> {
        let start = Instant::now();
        let mut attempts = Vec::new();

        if self.adapters.is_empty() {
            return ChainOutcome {
                result: Err(FetchError::NotConfigured(format!(
                    "No adapters registered for {}",
                    self.capability
                ))),
                attempts,
                duration: start.elapsed(),
            };
        }

        for adapter in &self.adapters {
            let adapter_id = adapter.id();
            let provider = adapter.provider();

            if !adapter.is_configured(ctx).await {
                debug!(adapter = %adapter_id, "Adapter not configured, skipping");
                attempts.push(ChainAttempt::failure(
                    adapter_id,
                    provider,
                    "not_configured",
                    Duration::ZERO,
                ));
                continue;
            }

            let attempt_start = Instant::now();
            debug!(adapter = %adapter_id, "Executing adapter");

            match adapter.fetch(ctx, params).await {
                Ok(value) => {
                    let duration = attempt_start.elapsed();
                    info!(adapter = %adapter_id, duration = ?duration, "Adapter succeeded");
                    attempts.push(ChainAttempt::success(adapter_id, provider, duration));

                    return ChainOutcome {
                        result: Ok(ChainResult {
                            value,
                            adapter_id: adapter_id.to_string(),
                            provider,
                        }),
                        attempts,
                        duration: start.elapsed(),
                    };
                }
                Err(error) => {
                    let duration = attempt_start.elapsed();
                    warn!(
                        adapter = %adapter_id,
                        error = %error,
                        tag = error.tag(),
                        duration = ?duration,
                        "Adapter failed"
                    );
                    attempts.push(ChainAttempt::failure(
                        adapter_id,
                        provider,
                        format!("{}: {error}", error.tag()),
                        duration,
                    ));

                    if !adapter.should_fallback(&error) {
                        debug!(adapter = %adapter_id, "Adapter indicates no fallback");
                        return ChainOutcome {
                            result: Err(error),
                            attempts,
                            duration: start.elapsed(),
                        };
                    }
                }
            }
        }

        warn!(capability = %self.capability, "All adapters failed");
        ChainOutcome {
            result: Err(FetchError::Exhausted {
                capability: self.capability,
            }),
            attempts,
            duration: start.elapsed(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
