//! Provider factory.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::HostedZoneProvider;
use crate::types::ProviderCredentials;

#[cfg(feature = "huaweicloud")]
use crate::providers::HuaweicloudProvider;

/// Creates a [`HostedZoneProvider`] from the given credentials.
///
/// The concrete provider is chosen by the [`ProviderCredentials`] variant.
/// `max_retries` bounds the automatic retries of transient HTTP failures;
/// callers never retry on top of it.
///
/// # Examples
///
/// ```rust,no_run
/// use dns_migrator_provider::{create_provider, ProviderCredentials};
///
/// let provider = create_provider(
///     ProviderCredentials::Huaweicloud {
///         access_key_id: "ak".to_string(),
///         secret_access_key: "sk".to_string(),
///     },
///     2,
/// )?;
/// # Ok::<(), dns_migrator_provider::ProviderError>(())
/// ```
pub fn create_provider(
    credentials: ProviderCredentials,
    max_retries: u32,
) -> Result<Arc<dyn HostedZoneProvider>> {
    match credentials {
        #[cfg(feature = "huaweicloud")]
        ProviderCredentials::Huaweicloud {
            access_key_id,
            secret_access_key,
        } => Ok(Arc::new(
            HuaweicloudProvider::builder(access_key_id, secret_access_key)
                .max_retries(max_retries)
                .build()?,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_huaweicloud_provider() {
        let provider = create_provider(
            ProviderCredentials::Huaweicloud {
                access_key_id: "ak".to_string(),
                secret_access_key: "sk".to_string(),
            },
            0,
        )
        .unwrap();
        assert_eq!(provider.id(), "huaweicloud");
    }
}
