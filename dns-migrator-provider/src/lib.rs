//! # dns-migrator-provider
//!
//! Hosted-zone abstraction used by the tinydns migrator to push record sets
//! into a cloud DNS service.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | [Huawei Cloud DNS](https://www.huaweicloud.com/product/dns.html) | `huaweicloud` | AK/SK Signing |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: enable every provider above.
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls instead.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dns_migrator_provider::{
//!     create_provider, ChangeBatch, HostedZoneProvider, ProviderCredentials,
//!     RecordSetType, ResourceRecordSet,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider(
//!         ProviderCredentials::Huaweicloud {
//!             access_key_id: "ak".to_string(),
//!             secret_access_key: "sk".to_string(),
//!         },
//!         2,
//!     )?;
//!
//!     let zones = provider.list_all_zones().await?;
//!     let Some(zone) = zones.first() else {
//!         return Ok(());
//!     };
//!
//!     let batch = ChangeBatch::upsert(
//!         Some("[A] Record change initiated on 2024-05-01".to_string()),
//!         ResourceRecordSet {
//!             name: format!("www.{}.", zone.name),
//!             record_type: RecordSetType::A,
//!             ttl: 300,
//!             values: vec!["192.0.2.10".to_string()],
//!         },
//!     );
//!     provider.change_record_sets(&zone.id, &batch).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError).
//! A change the service refuses surfaces as
//! [`ProviderError::InvalidChangeBatch`]; transient failures (`NetworkError`,
//! `Timeout`, `RateLimited`) are retried with exponential backoff according to
//! the provider's [`RetryPolicy`] before they are returned.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

pub use error::{ProviderError, Result};

pub use factory::create_provider;

pub use http_client::RetryPolicy;

pub use traits::HostedZoneProvider;

pub use types::{
    Change, ChangeAction, ChangeBatch, ChangeInfo, HostedZone, PaginatedResponse,
    PaginationParams, ProviderCredentials, ProviderType, RecordSet, RecordSetType,
    ResourceRecordSet,
};

pub use providers::common::{normalize_domain_name, to_fqdn};
pub use utils::log_sanitizer::{mask_secret, truncate_for_log};

#[cfg(feature = "huaweicloud")]
pub use providers::{HuaweicloudProvider, HuaweicloudProviderBuilder};
