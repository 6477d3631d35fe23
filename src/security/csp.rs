//! Content-Security-Policy assembly for HTML documents.
//!
//! The policy is fixed except for `frame-ancestors`, which follows the
//! `features.protection.iframe` setting at request time.

/// Hashes of the inline bootstrap scripts shipped with the index page.
///
/// Each entry must match its inline script byte for byte. Editing any of those
/// scripts invalidates the hash and the browser will refuse to run it.
pub const INLINE_SCRIPT_HASHES: [&str; 5] = [
    "'sha256-JNAde5CZQqXtYRLUk8CGgyJXo6C7Zs1lXPPClLM1YM4='",
    "'sha256-9/gQeQaAmVkFStl6tfCbHXn8mr6PgtxlH+hEp685lzY='",
    "'sha256-ER9LZCe8unYk8AJJ2qopE+rFh7OUv8QG5q3h6jZeoSk='",
    // animated 404 page
    "'sha256-a4rv66tC4bqKBcGxkR+KAqedm+64tAs13VGNGmN3B6g='",
    "'sha256-H+2cw33TxgqSZEshY66vGwg6/W03IB9JKTmFV36CKz0='",
];

/// External origin serving map tiles for the image viewer.
pub const MAP_TILE_ORIGIN: &str = "https://maps.wikimedia.org";

/// Who may embed the application in a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameAncestors {
    /// No framing at all; also emits `X-Frame-Options: DENY`.
    Deny,
    /// Verbatim source list for `frame-ancestors`.
    Allow(String),
}

impl FrameAncestors {
    /// Interpret the `features.protection.iframe` value.
    ///
    /// Values that cannot be spliced into the header safely fail closed.
    pub fn from_config(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return Self::Deny;
        }
        if !crate::config::validation::is_source_list(value) {
            tracing::warn!(
                iframe = %value.escape_debug(),
                "Ignoring unusable iframe origin list, framing denied"
            );
            return Self::Deny;
        }
        Self::Allow(value.to_string())
    }

    pub fn denies_framing(&self) -> bool {
        matches!(self, Self::Deny)
    }
}

/// Build the full policy string.
pub fn content_security_policy(ancestors: &FrameAncestors) -> String {
    let mut csp = String::with_capacity(768);
    csp.push_str("default-src 'none'; ");
    csp.push_str("style-src 'self' 'unsafe-inline'; ");
    csp.push_str("font-src 'self' data:; ");
    csp.push_str("manifest-src 'self'; ");
    csp.push_str("script-src 'self'");
    for hash in INLINE_SCRIPT_HASHES {
        csp.push(' ');
        csp.push_str(hash);
    }
    csp.push_str("; ");
    csp.push_str("img-src 'self' blob: data: ");
    csp.push_str(MAP_TILE_ORIGIN);
    csp.push_str("; ");
    csp.push_str("connect-src 'self'; ");
    csp.push_str("object-src 'self'; ");
    csp.push_str("media-src 'self' blob:; ");
    csp.push_str("worker-src 'self' blob:; ");
    csp.push_str("form-action 'self'; base-uri 'self'; ");
    csp.push_str("frame-src 'self'; ");
    match ancestors {
        FrameAncestors::Deny => csp.push_str("frame-ancestors 'none';"),
        FrameAncestors::Allow(origins) => {
            csp.push_str("frame-ancestors ");
            csp.push_str(origins);
            csp.push(';');
        }
    }
    csp
}
