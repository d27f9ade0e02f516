//! 日志脱敏
//!
//! Response bodies and submitted field values can be large or carry personal
//! data (names, phone numbers, e-mail addresses); only a bounded prefix is
//! ever written to the log.

/// Longest body preview written to the log, in characters.
const PREVIEW_CHARS: usize = 200;

/// Leading characters kept when masking a field value.
const MASK_KEEP: usize = 2;

/// Shorten a response body for logging.
///
/// Bodies up to [`PREVIEW_CHARS`] characters come back unchanged; longer ones
/// are cut on a character boundary and tagged with the number of bytes dropped.
pub fn truncate_for_log(body: &str) -> String {
    match body.char_indices().nth(PREVIEW_CHARS) {
        None => body.to_string(),
        Some((cut, _)) => format!("{}... (+{} bytes)", &body[..cut], body.len() - cut),
    }
}

/// Mask a submitted field value, keeping only the first characters.
///
/// `"ada@example.com"` becomes `"ad*** (15 chars)"`; empty values stay empty.
pub fn mask_value(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let count = value.chars().count();
    let head: String = value.chars().take(MASK_KEEP).collect();
    format!("{head}*** ({count} chars)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_unchanged() {
        let body = "{\"FORM_TYPE\":\"ticket\"}";
        assert_eq!(truncate_for_log(body), body);
    }

    #[test]
    fn long_body_reports_dropped_bytes() {
        let body = "x".repeat(PREVIEW_CHARS + 44);
        let preview = truncate_for_log(&body);
        assert!(preview.starts_with(&"x".repeat(PREVIEW_CHARS)));
        assert!(preview.ends_with("... (+44 bytes)"));
    }

    #[test]
    fn cyrillic_body_cut_on_char_boundary() {
        let body = "ж".repeat(PREVIEW_CHARS + 1);
        let preview = truncate_for_log(&body);
        assert!(preview.starts_with(&"ж".repeat(PREVIEW_CHARS)));
        assert!(preview.ends_with("(+2 bytes)"));
    }

    #[test]
    fn mask_keeps_prefix_and_length() {
        assert_eq!(mask_value("ada@example.com"), "ad*** (15 chars)");
        assert_eq!(mask_value("Я"), "Я*** (1 chars)");
        assert_eq!(mask_value(""), "");
    }
}
