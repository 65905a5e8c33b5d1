//! Target domain validation
//!
//! The relay is not an open proxy: it only forwards to hosts inside the
//! Datadog production domain families. Matching is a suffix check on the
//! parsed host, never a substring search over the whole URL, so a path or
//! query component containing an allowed domain grants nothing.

use url::Url;

/// Host suffixes for the commercial, European, and government-cloud
/// domain families.
const ALLOWED_SUFFIXES: [&str; 3] = [".datadoghq.com", ".datadoghq.eu", ".ddog-gov.com"];

/// Returns true when `target` parses as a URL whose host belongs to an
/// allowed domain family. Malformed input is rejected, not an error:
/// abuse probes are expected traffic.
pub fn is_allowed(target: &str) -> bool {
    match Url::parse(target) {
        Ok(url) => host_allowed(&url),
        Err(_) => false,
    }
}

/// Suffix check on an already parsed URL. Hosts compare case-insensitively.
pub(crate) fn host_allowed(url: &Url) -> bool {
    match url.host_str() {
        Some(host) => {
            let host = host.to_ascii_lowercase();
            ALLOWED_SUFFIXES.iter().any(|suffix| host.ends_with(suffix))
        }
        None => false,
    }
}
