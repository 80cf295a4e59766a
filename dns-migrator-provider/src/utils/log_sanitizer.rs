//! Log sanitization utilities
//!
//! Request bodies carry long TXT values (DKIM keys, SPF policies) and the
//! signing code carries access keys; neither should land in logs verbatim.

/// Maximum number of bytes of a payload included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a credential left visible.
const VISIBLE_KEY_PREFIX: usize = 4;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0)
}

/// Truncate a payload for logging.
///
/// Strings within the limit are returned as-is; longer ones keep the first
/// `TRUNCATE_LIMIT` bytes (on a char boundary) plus the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    format!(
        "{}... [truncated, total {} bytes]",
        &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
        s.len()
    )
}

/// Mask a credential, leaving only a short prefix visible.
pub fn mask_secret(secret: &str) -> String {
    let visible = floor_char_boundary(secret, VISIBLE_KEY_PREFIX);
    if secret.len() <= VISIBLE_KEY_PREFIX {
        return "****".to_string();
    }
    format!("{}****", &secret[..visible])
}
