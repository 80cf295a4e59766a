//! Utility modules.

/// Log sanitization so TXT payloads and credentials stay out of debug logs.
pub mod log_sanitizer;
