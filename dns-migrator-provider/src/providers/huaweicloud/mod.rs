//! Huawei Cloud DNS Provider

mod error;
mod http;
mod provider;
mod sign;
/// Huawei Cloud API-specific request/response types.
pub(crate) mod types;

use reqwest::Client;

use crate::error::Result;
use crate::http_client::RetryPolicy;
use crate::providers::common::create_http_client;

/// Huawei Cloud DNS API host.
pub(crate) const HUAWEICLOUD_DNS_HOST: &str = "dns.myhuaweicloud.com";
/// Maximum number of items on a single page of Huawei Cloud API
pub(crate) const MAX_PAGE_SIZE: u32 = 500;
/// Maximum length of a record set description.
pub(crate) const MAX_DESCRIPTION_LEN: usize = 255;

/// Huawei Cloud DNS provider implementation.
///
/// Authenticates via AK/SK request signing. Public zones map to hosted zones;
/// UPSERT is realized as lookup-then-`PUT` or `POST`.
///
/// # Construction
///
/// ```rust,no_run
/// use dns_migrator_provider::HuaweicloudProvider;
///
/// let provider = HuaweicloudProvider::new(
///     "your-access-key-id".to_string(),
///     "your-secret-access-key".to_string(),
/// )?;
/// # Ok::<(), dns_migrator_provider::ProviderError>(())
/// ```
pub struct HuaweicloudProvider {
    pub(crate) client: Client,
    pub(crate) access_key_id: String,
    pub(crate) secret_access_key: String,
    pub(crate) retry: RetryPolicy,
    pub(crate) endpoint: String,
}

/// Builder for [`HuaweicloudProvider`] with configurable retry behavior.
pub struct HuaweicloudProviderBuilder {
    access_key_id: String,
    secret_access_key: String,
    max_retries: u32,
    endpoint: String,
}

impl HuaweicloudProviderBuilder {
    fn new(access_key_id: String, secret_access_key: String) -> Self {
        Self {
            access_key_id,
            secret_access_key,
            max_retries: 2,
            endpoint: format!("https://{HUAWEICLOUD_DNS_HOST}"),
        }
    }

    /// Set the maximum number of automatic retries for transient errors (default: 2).
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Override the API endpoint (scheme + host), e.g. a regional endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the [`HuaweicloudProvider`] instance.
    pub fn build(self) -> Result<HuaweicloudProvider> {
        Ok(HuaweicloudProvider {
            client: create_http_client("huaweicloud")?,
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            retry: RetryPolicy::with_max_retries(self.max_retries),
            endpoint: self.endpoint,
        })
    }
}

impl HuaweicloudProvider {
    /// Creates a new Huawei Cloud provider with default settings (2 retries).
    pub fn new(access_key_id: String, secret_access_key: String) -> Result<Self> {
        Self::builder(access_key_id, secret_access_key).build()
    }

    /// Returns a builder for customizing the provider configuration.
    pub fn builder(access_key_id: String, secret_access_key: String) -> HuaweicloudProviderBuilder {
        HuaweicloudProviderBuilder::new(access_key_id, secret_access_key)
    }

    /// Host header value derived from the configured endpoint.
    pub(crate) fn host(&self) -> &str {
        self.endpoint
            .split_once("://")
            .map_or(self.endpoint.as_str(), |(_, host)| host)
    }
}
