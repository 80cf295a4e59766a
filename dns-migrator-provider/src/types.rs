use std::fmt;

use serde::{Deserialize, Serialize};

// ============ Pagination ============

/// Pagination parameters for list operations.
///
/// All list endpoints accept these parameters to control page-based pagination.
/// Pages are 1-indexed.
///
/// # Default
///
/// The default is `page = 1, page_size = 100`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 100,
        }
    }
}

impl PaginationParams {
    /// Clamp pagination values to valid ranges.
    ///
    /// - `page` is clamped to `>= 1`
    /// - `page_size` is clamped to `1..=max_page_size`
    #[must_use]
    pub fn validated(&self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size),
        }
    }

    /// Parameters for the page following this one.
    #[must_use]
    pub fn next_page(&self) -> Self {
        Self {
            page: self.page + 1,
            page_size: self.page_size,
        }
    }
}

/// A paginated response wrapper.
///
/// Returned by all list operations. Contains the current page of items
/// along with pagination metadata.
///
/// # Type Parameters
///
/// * `T` — The item type (e.g., [`HostedZone`], [`RecordSet`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Items in the current page.
    pub items: Vec<T>,
    /// Current page number.
    pub page: u32,
    /// Page size used for this request.
    pub page_size: u32,
    /// Total number of items across all pages.
    pub total_count: u32,
    /// Whether there are more pages after this one.
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response, automatically computing [`has_more`](Self::has_more).
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total_count: u32) -> Self {
        let has_more = (page * page_size) < total_count;
        Self {
            items,
            page,
            page_size,
            total_count,
            has_more,
        }
    }
}

// ============ Provider Types ============

/// Identifies which provider implementation to use.
///
/// Each variant is gated behind its corresponding feature flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Huawei Cloud DNS. Requires feature `huaweicloud`.
    #[cfg(feature = "huaweicloud")]
    Huaweicloud,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            #[cfg(feature = "huaweicloud")]
            Self::Huaweicloud => f.write_str("huaweicloud"),
        }
    }
}

/// Provider credentials, one variant per supported provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderCredentials {
    /// Huawei Cloud AK/SK pair.
    #[cfg(feature = "huaweicloud")]
    Huaweicloud {
        /// Access Key ID.
        #[serde(rename = "accessKeyId")]
        access_key_id: String,
        /// Secret Access Key.
        #[serde(rename = "secretAccessKey")]
        secret_access_key: String,
    },
}

impl ProviderCredentials {
    /// The provider these credentials belong to.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            #[cfg(feature = "huaweicloud")]
            Self::Huaweicloud { .. } => ProviderType::Huaweicloud,
        }
    }
}

// ============ Zones & Record Sets ============

/// A hosted zone managed by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HostedZone {
    /// Opaque provider-assigned zone identifier.
    pub id: String,
    /// Zone name without the trailing dot (e.g., `"example.org"`).
    pub name: String,
    /// Number of record sets in the zone, if reported.
    pub record_count: Option<u32>,
}

/// An existing record set as reported by the provider.
///
/// Only used for inspection output; the sync never diffs against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    /// Provider-specific record set identifier.
    pub id: String,
    /// Fully qualified name as returned by the provider.
    pub name: String,
    /// Record type as returned by the provider (`"A"`, `"SOA"`, ...).
    pub record_type: String,
    /// TTL in seconds, if reported.
    pub ttl: Option<u32>,
    /// Resource record values.
    pub values: Vec<String>,
}

/// Record types that can be written through a change batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordSetType {
    /// IPv4 address record.
    A,
    /// Text record.
    Txt,
    /// Mail exchange record.
    Mx,
    /// Canonical name record.
    Cname,
    /// Name server record.
    Ns,
}

impl RecordSetType {
    /// Types written by the importer, in processing order.
    pub const IMPORTED: [Self; 4] = [Self::A, Self::Txt, Self::Mx, Self::Cname];

    /// Uppercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Txt => "TXT",
            Self::Mx => "MX",
            Self::Cname => "CNAME",
            Self::Ns => "NS",
        }
    }
}

impl fmt::Display for RecordSetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Change action for a single record set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    /// Create; fails if the record set already exists.
    Create,
    /// Insert or replace the whole record set.
    Upsert,
    /// Delete the record set.
    Delete,
}

/// Record set payload of a [`Change`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSet {
    /// Fully qualified name with trailing dot (e.g., `"www.example.org."`).
    pub name: String,
    /// Record type.
    pub record_type: RecordSetType,
    /// TTL in seconds.
    pub ttl: u32,
    /// One or more resource record values.
    pub values: Vec<String>,
}

/// A single change inside a [`ChangeBatch`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// What to do with the record set.
    pub action: ChangeAction,
    /// The record set to act on.
    pub record_set: ResourceRecordSet,
}

/// A batch of changes submitted to one hosted zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeBatch {
    /// Free-form comment attached to the submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Changes, applied in order.
    pub changes: Vec<Change>,
}

impl ChangeBatch {
    /// Batch holding a single UPSERT.
    pub fn upsert(comment: Option<String>, record_set: ResourceRecordSet) -> Self {
        Self {
            comment,
            changes: vec![Change {
                action: ChangeAction::Upsert,
                record_set,
            }],
        }
    }
}

/// Result of an accepted change batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    /// Identifiers of the record sets written, in change order.
    pub record_set_ids: Vec<String>,
}
