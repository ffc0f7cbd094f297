//! Provider adapter trait.
//!
//! An adapter is one method of obtaining a capability's data from one
//! external provider. Capabilities with more than one adapter arrange them
//! in a [`FallbackChain`](crate::chain::FallbackChain) tried in priority
//! order. Normalization into the shared data model happens inside the
//! adapter; provider-specific response shapes never cross this boundary.

use async_trait::async_trait;
use wayfarer_core::{Capability, ProviderId};

use crate::context::FetchContext;
use crate::error::FetchError;

/// A provider adapter for one capability.
///
/// `P` is the capability's parameter type, `T` its normalized output.
///
/// ## Implementing an Adapter
///
/// ```ignore
/// struct NominatimGeocoder { base_url: String }
///
/// #[async_trait]
/// impl Adapter<GeocodeQuery, Location> for NominatimGeocoder {
///     fn id(&self) -> &str {
///         "geocoding.nominatim"
///     }
///
///     fn provider(&self) -> ProviderId {
///         ProviderId::Nominatim
///     }
///
///     fn capability(&self) -> Capability {
///         Capability::Geocoding
///     }
///
///     async fn fetch(
///         &self,
///         ctx: &FetchContext,
///         params: &GeocodeQuery,
///     ) -> Result<Location, FetchError> {
///         // Call the provider and normalize the response.
///     }
/// }
/// ```
#[async_trait]
pub trait Adapter<P, T>: Send + Sync {
    /// Unique identifier, `{capability}.{provider}`.
    fn id(&self) -> &str;

    /// The provider this adapter talks to.
    fn provider(&self) -> ProviderId;

    /// The capability this adapter serves.
    fn capability(&self) -> Capability;

    /// Quick, network-free check that this adapter can run at all
    /// (credentials present, required configuration set).
    async fn is_configured(&self, _ctx: &FetchContext) -> bool {
        true
    }

    /// Fetches and normalizes data from the provider.
    async fn fetch(&self, ctx: &FetchContext, params: &P) -> Result<T, FetchError>;

    /// Whether the chain should advance to the next adapter after this
    /// error. Default: always. A parse failure on a premium adapter must
    /// not block trip planning when a fallback exists, so even `Parse`
    /// advances the chain.
    fn should_fallback(&self, _error: &FetchError) -> bool {
        true
    }
}
