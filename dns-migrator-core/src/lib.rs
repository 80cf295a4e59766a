//! DNS Migrator Core Library
//!
//! Moves a tinydns flat-file database to other DNS back ends:
//! - [`RecordStore`] parses the tinydns `data` file into typed records
//! - [`ZoneMatcher`] decides which managed zone a domain belongs to
//! - [`BindZoneRenderer`] renders BIND zone files
//! - [`ProviderSync`] upserts record sets into a cloud provider's hosted zones
//!
//! The provider is injected as `Arc<dyn HostedZoneProvider>`, so everything
//! here runs against an in-memory fake as well as a real API.

pub mod error;
pub mod record_store;
pub mod services;
pub mod types;
pub mod zone_matcher;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult, ParseError, ParseErrorKind};
pub use record_store::{RecordStore, TINYDNS_DEFAULT_TTL};
pub use services::{BindZoneOptions, BindZoneRenderer, ProviderSync, RenderedZone, SyncOptions};
pub use zone_matcher::{RelativeName, ZoneMatcher};
