//! MIME type lookup for static assets.

/// Fallback for unknown or missing extensions.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Maps a file extension (without the dot) to a MIME type.
pub trait MimeLookup: Send + Sync + std::fmt::Debug {
    fn mime_type(&self, extension: &str) -> &str;
}

/// Built-in table covering the asset types a web frontend ships.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMimeTable;

const TABLE: &[(&str, &str)] = &[
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("eot", "application/vnd.ms-fontobject"),
    ("gif", "image/gif"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("ico", "image/x-icon"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("mjs", "application/javascript"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("ogg", "audio/ogg"),
    ("otf", "font/otf"),
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("ttf", "font/ttf"),
    ("txt", "text/plain"),
    ("wasm", "application/wasm"),
    ("webm", "video/webm"),
    ("webmanifest", "application/manifest+json"),
    ("webp", "image/webp"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("xml", "application/xml"),
    ("zip", "application/zip"),
];

impl MimeLookup for StaticMimeTable {
    fn mime_type(&self, extension: &str) -> &str {
        TABLE
            .iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
            .map(|(_, mime)| *mime)
            .unwrap_or(DEFAULT_MIME_TYPE)
    }
}
