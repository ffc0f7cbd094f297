//! Amadeus adapters: realtime hotel pricing and flight offers.
//!
//! Both adapters authenticate with a bearer token obtained through the
//! client-credentials exchange managed by
//! [`TokenManager`](wayfarer_fetch::TokenManager). The exchange endpoint
//! must be registered before the adapters run; unregistered providers fail
//! fast with a missing-credentials error and no network traffic.

pub mod flights;
pub mod hotels;

pub use flights::AmadeusFlights;
pub use hotels::AmadeusHotels;

use reqwest::StatusCode;
use wayfarer_core::ProviderId;
use wayfarer_fetch::{AuthError, CredentialStore, FetchError, TokenEndpoint, TokenManager};

/// Amadeus self-service API host (test environment).
pub const AMADEUS_BASE_URL: &str = "https://test.api.amadeus.com";

/// Path of the client-credentials exchange below the API host.
const TOKEN_PATH: &str = "/v1/security/oauth2/token";

/// Registers the Amadeus token endpoint when credentials are configured.
///
/// Returns true when the endpoint was registered.
pub fn register_token_endpoint(
    tokens: &mut TokenManager,
    credentials: &CredentialStore,
    base_url: &str,
) -> bool {
    let Some((client_id, client_secret)) = credentials.amadeus_pair() else {
        return false;
    };
    tokens.register(
        ProviderId::Amadeus,
        TokenEndpoint {
            url: format!("{base_url}{TOKEN_PATH}"),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        },
    );
    true
}

/// Maps a non-success Amadeus response status to the fetch taxonomy.
fn status_error(status: StatusCode, what: &str) -> FetchError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        AuthError::Rejected {
            provider: ProviderId::Amadeus,
            detail: format!("HTTP {}", status.as_u16()),
        }
        .into()
    } else {
        FetchError::Upstream {
            status: Some(status.as_u16()),
            message: format!("Amadeus {what} returned HTTP {status}"),
        }
    }
}

/// Parses a decimal price string from the Amadeus payload.
fn parse_price(raw: &str) -> Result<f64, FetchError> {
    raw.parse()
        .map_err(|_| FetchError::Parse(format!("Non-numeric price {raw:?}")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_requires_both_credentials() {
        let mut tokens = TokenManager::new();
        let registered = register_token_endpoint(
            &mut tokens,
            &CredentialStore::empty(),
            AMADEUS_BASE_URL,
        );
        assert!(!registered);
        assert!(!tokens.is_registered(ProviderId::Amadeus));

        let store = CredentialStore::empty().with_amadeus("id", "secret");
        assert!(register_token_endpoint(&mut tokens, &store, AMADEUS_BASE_URL));
        assert!(tokens.is_registered(ProviderId::Amadeus));
    }

    #[test]
    fn test_auth_statuses_map_to_rejected() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "hotel list"),
            FetchError::AuthFailed(AuthError::Rejected { .. })
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "hotel list"),
            FetchError::Upstream {
                status: Some(400),
                ..
            }
        ));
    }

    #[test]
    fn test_price_parsing() {
        assert!((parse_price("184.50").unwrap() - 184.5).abs() < 1e-9);
        assert!(parse_price("abc").is_err());
    }
}
