//! URL normalization and sanitization utilities.
//!
//! Ensures consistent URL representation by normalizing hostnames, removing
//! fragments, and handling default ports. Normalized URLs are what the
//! owner+URL uniqueness constraint compares, so two spellings of the same
//! destination deduplicate to one record.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Normalizes a URL to a canonical form.
///
/// # Normalization Rules
///
/// 1. **Protocol**: Only HTTP and HTTPS are allowed
/// 2. **Hostname**: Converted to lowercase
/// 3. **Default ports**: Removed (80 for HTTP, 443 for HTTPS)
/// 4. **Fragments**: Removed (e.g., `#section`)
/// 5. **Query parameters**: Preserved as-is
/// 6. **Path**: Preserved with case sensitivity
///
/// # Security
///
/// Rejects potentially dangerous protocols like `javascript:`, `data:`, `file:`.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for malformed URLs.
/// Returns [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url =
        Url::parse(input).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    if let Some(host) = url.host_str() {
        let host_lowercase = host.to_ascii_lowercase();
        url.set_host(Some(&host_lowercase)).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to set normalized host".to_string())
        })?;
    }

    url.set_fragment(None);

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to strip default port".to_string())
        })?;
    }

    Ok(url.to_string())
}
