//! Huawei Cloud SDK-HMAC-SHA256 signature
//!
//! Reference: <https://support.huaweicloud.com/devg-apisign/api-sign-algorithm-005.html>

use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::providers::common::hmac_sha256;
use crate::utils::log_sanitizer::{mask_secret, truncate_for_log};

use super::HuaweicloudProvider;

const ALGORITHM: &str = "SDK-HMAC-SHA256";

/// Canonical URI: the path with a trailing `/`.
fn canonical_uri(uri: &str) -> String {
    if uri.ends_with('/') {
        uri.to_string()
    } else {
        format!("{uri}/")
    }
}

/// Canonical query: `&`-separated pairs sorted by name.
fn canonical_query(query: &str) -> String {
    let mut params: Vec<&str> = query.split('&').filter(|p| !p.is_empty()).collect();
    params.sort_unstable();
    params.join("&")
}

impl HuaweicloudProvider {
    /// Builds the `Authorization` header value for a request.
    pub(crate) fn sign(
        &self,
        method: &str,
        uri: &str,
        query: &str,
        headers: &[(String, String)],
        payload: &str,
        timestamp: &str,
    ) -> String {
        let mut sorted_headers: Vec<(String, &str)> = headers
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.trim()))
            .collect();
        sorted_headers.sort_by(|a, b| a.0.cmp(&b.0));

        let canonical_headers = sorted_headers
            .iter()
            .fold(String::new(), |mut acc, (k, v)| {
                let _ = writeln!(acc, "{k}:{v}");
                acc
            });
        let signed_headers = sorted_headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");

        let hashed_payload = hex::encode(Sha256::digest(payload.as_bytes()));
        let canonical_request = format!(
            "{method}\n{}\n{}\n{canonical_headers}\n{signed_headers}\n{hashed_payload}",
            canonical_uri(uri),
            canonical_query(query),
        );
        log::debug!("CanonicalRequest:\n{}", truncate_for_log(&canonical_request));

        let hashed_canonical_request = hex::encode(Sha256::digest(canonical_request.as_bytes()));
        let string_to_sign = format!("{ALGORITHM}\n{timestamp}\n{hashed_canonical_request}");

        let signature = hex::encode(hmac_sha256(
            self.secret_access_key.as_bytes(),
            string_to_sign.as_bytes(),
        ));
        log::debug!(
            "Signed {method} {uri} with access key {}",
            mask_secret(&self.access_key_id)
        );

        format!(
            "{ALGORITHM} Access={}, SignedHeaders={signed_headers}, Signature={signature}",
            self.access_key_id
        )
    }
}
