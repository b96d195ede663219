//! Scheme classification: which URIs the browser renders itself, and which
//! carry an equivalent web representation.

use url::Url;

use crate::types::Classification;

/// Schemes the rendering engine handles without external handoff.
///
/// `http`/`https` are deliberately absent: a web URL can still resolve to an
/// installed application (app links on web domains) and must go through the
/// normal policy path.
const INTERNAL_SCHEMES: &[&str] = &[
    "about",
    "blob",
    "data",
    "file",
    "javascript",
    "view-source",
    "ws",
    "wss",
];

/// Query parameter some app-specific schemes use to carry an equivalent
/// web URL.
const FALLBACK_QUERY_PARAM: &str = "browser_fallback_url";

/// Key inside an `intent:` fragment declaring the fallback web URL.
const INTENT_FALLBACK_KEY: &str = "S.browser_fallback_url=";

/// Whether the rendering engine handles this scheme itself. Such targets are
/// never offered to external applications.
pub fn is_internal_scheme(scheme: &str) -> bool {
    let scheme = scheme.to_ascii_lowercase();
    INTERNAL_SCHEMES.contains(&scheme.as_str())
}

/// Classify a URI: extract its scheme and its web-renderable fallback, if
/// one exists.
///
/// A web fallback is the URI itself for `http`/`https`, the declared
/// `S.browser_fallback_url` for Android-style `intent:` URIs, or a
/// `browser_fallback_url` query parameter on custom app schemes. Malformed
/// URIs classify as "no scheme, no fallback" rather than failing.
pub fn classify(uri: &str) -> Classification {
    let Ok(parsed) = Url::parse(uri) else {
        return Classification::default();
    };

    let scheme = parsed.scheme().to_ascii_lowercase();
    let web_fallback = match scheme.as_str() {
        "http" | "https" => Some(uri.to_string()),
        "intent" => intent_fallback(&parsed),
        _ => query_fallback(&parsed),
    };

    Classification {
        scheme: Some(scheme),
        web_fallback,
    }
}

/// Extract the fallback URL from an `intent:` URI fragment.
///
/// Android intent URIs carry their extras between `#Intent;` and `;end`,
/// as `;`-separated `key=value` fields with percent-encoded values.
fn intent_fallback(parsed: &Url) -> Option<String> {
    let fragment = parsed.fragment()?;
    let body = fragment.strip_prefix("Intent;")?;
    for field in body.split(';') {
        if field == "end" {
            break;
        }
        if let Some(encoded) = field.strip_prefix(INTENT_FALLBACK_KEY) {
            return decoded_web_url(encoded);
        }
    }
    None
}

/// A `browser_fallback_url` query parameter on a custom scheme.
fn query_fallback(parsed: &Url) -> Option<String> {
    parsed
        .query_pairs()
        .find(|(key, _)| key == FALLBACK_QUERY_PARAM)
        .and_then(|(_, value)| web_url(&value))
}

/// Percent-decode a declared fallback and keep it only if it is a web URL.
fn decoded_web_url(encoded: &str) -> Option<String> {
    let decoded = urlencoding::decode(encoded).ok()?;
    web_url(&decoded)
}

/// Keep a declared fallback only if it parses as http(s); anything else
/// (javascript:, nested intents, garbage) is not a renderable fallback.
fn web_url(candidate: &str) -> Option<String> {
    match Url::parse(candidate) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(candidate.to_string()),
        _ => None,
    }
}
