//! Referrer hostname extraction for the top-referrers analytics.

use url::Url;

/// Extracts the hostname from a raw `Referer` header value.
///
/// Returns `None` for empty or unparseable values and for URLs without a
/// host. Entries without a usable referrer are excluded from the
/// top-referrers ranking rather than counted under an "unknown" bucket.
pub fn referrer_host(referer: &str) -> Option<String> {
    let trimmed = referer.trim();
    if trimmed.is_empty() {
        return None;
    }

    let url = Url::parse(trimmed).ok()?;
    url.host_str().map(|h| h.to_ascii_lowercase())
}
