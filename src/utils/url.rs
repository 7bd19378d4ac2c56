//! URL utilities for consistent endpoint construction.

/// Join a base URL and an endpoint path without producing double slashes,
/// whatever mix of trailing and leading slashes the inputs carry.
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
