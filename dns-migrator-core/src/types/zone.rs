//! Managed zone type definitions

use serde::{Deserialize, Serialize};

use dns_migrator_provider::{HostedZone, RecordSet, normalize_domain_name};

/// A zone records are exported into.
///
/// Static BIND zones have no `id`; zones fetched from a provider carry the
/// provider's opaque identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedZone {
    /// Zone name without trailing dot.
    pub name: String,
    /// Provider-assigned zone identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ManagedZone {
    /// Zone from a statically configured name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: normalize_domain_name(name),
            id: None,
        }
    }

    /// Construct a managed zone from a provider hosted zone
    ///
    /// 名称统一为小写、去掉末尾点。
    #[must_use]
    pub fn from_hosted(zone: HostedZone) -> Self {
        Self {
            name: normalize_domain_name(&zone.name).to_ascii_lowercase(),
            id: Some(zone.id),
        }
    }
}

/// Existing record sets of one zone, fetched for inspection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRecordSets {
    pub zone: ManagedZone,
    pub record_sets: Vec<RecordSet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosted_zone_name_is_lowercased_without_dot() {
        let zone = ManagedZone::from_hosted(HostedZone {
            id: "zone-1".to_string(),
            name: "ArtOfLiving.ORG.".to_string(),
            record_count: None,
        });
        assert_eq!(zone.name, "artofliving.org");
        assert_eq!(zone.id.as_deref(), Some("zone-1"));
    }
}
