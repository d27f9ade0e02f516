//! Utility modules.

/// Log sanitization utilities to keep large or personal payloads out of logs.
pub mod log_sanitizer;
