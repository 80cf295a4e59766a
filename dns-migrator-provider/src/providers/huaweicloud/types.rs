//! 华为云 DNS API 类型定义

use serde::{Deserialize, Serialize};

use crate::providers::common::normalize_domain_name;
use crate::types::{HostedZone, RecordSet, RecordSetType};

// ============ 列表响应 ============

/// `GET /v2/zones`
#[derive(Debug, Deserialize)]
pub struct ListZonesResponse {
    pub zones: Option<Vec<HuaweicloudZone>>,
    pub metadata: Option<ListMetadata>,
}

/// `GET /v2/zones/{zone_id}/recordsets`
#[derive(Debug, Deserialize)]
pub struct ListRecordSetsResponse {
    pub recordsets: Option<Vec<HuaweicloudRecordSet>>,
    pub metadata: Option<ListMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct ListMetadata {
    pub total_count: Option<u32>,
}

impl ListMetadata {
    /// `metadata.total_count`, 0 when absent.
    pub fn total(metadata: Option<&Self>) -> u32 {
        metadata.and_then(|m| m.total_count).unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
pub struct HuaweicloudZone {
    pub id: String,
    /// 带末尾点，如 `example.org.`
    pub name: String,
    pub record_num: Option<u32>,
}

impl From<HuaweicloudZone> for HostedZone {
    fn from(zone: HuaweicloudZone) -> Self {
        Self {
            id: zone.id,
            name: normalize_domain_name(&zone.name).to_ascii_lowercase(),
            record_count: zone.record_num,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HuaweicloudRecordSet {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub records: Option<Vec<String>>,
    pub ttl: Option<u32>,
}

impl HuaweicloudRecordSet {
    /// Exact owner name and type match. The API's `name` filter is a fuzzy match.
    pub fn is_set(&self, fqdn: &str, record_type: RecordSetType) -> bool {
        self.record_type.eq_ignore_ascii_case(record_type.as_str())
            && normalize_domain_name(&self.name).eq_ignore_ascii_case(&normalize_domain_name(fqdn))
    }
}

impl From<HuaweicloudRecordSet> for RecordSet {
    fn from(rs: HuaweicloudRecordSet) -> Self {
        Self {
            id: rs.id,
            name: rs.name,
            record_type: rs.record_type,
            ttl: rs.ttl,
            values: rs.records.unwrap_or_default(),
        }
    }
}

// ============ 变更请求 ============

/// Body of `POST /v2/zones/{zone_id}/recordsets` and
/// `PUT /v2/zones/{zone_id}/recordsets/{recordset_id}`.
#[derive(Debug, Serialize)]
pub struct RecordSetRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub records: Vec<String>,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Create/update response; only the id is used.
#[derive(Debug, Deserialize)]
pub struct RecordSetResponse {
    pub id: String,
}

/// 错误响应
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_listing_deserializes_and_normalizes() {
        let response: ListZonesResponse = serde_json::from_str(
            r#"{
                "zones": [
                    {"id": "ff8080825b8fc86c", "name": "Example.org.", "record_num": 6, "zone_type": "public"}
                ],
                "metadata": {"total_count": 1}
            }"#,
        )
        .unwrap();

        assert_eq!(ListMetadata::total(response.metadata.as_ref()), 1);
        let zone: HostedZone = response.zones.unwrap().remove(0).into();
        assert_eq!(zone.id, "ff8080825b8fc86c");
        assert_eq!(zone.name, "example.org");
        assert_eq!(zone.record_count, Some(6));
    }

    #[test]
    fn record_set_matching_is_exact() {
        let response: ListRecordSetsResponse = serde_json::from_str(
            r#"{
                "recordsets": [
                    {"id": "1", "name": "mail.example.org.", "type": "MX", "ttl": 300, "records": ["10 mx.example.org."]},
                    {"id": "2", "name": "example.org.", "type": "MX", "ttl": 3600, "records": null}
                ]
            }"#,
        )
        .unwrap();
        let sets = response.recordsets.unwrap();

        assert!(!sets[0].is_set("example.org.", RecordSetType::Mx));
        assert!(sets[1].is_set("Example.org", RecordSetType::Mx));
        assert!(!sets[1].is_set("example.org.", RecordSetType::Txt));
        assert_eq!(ListMetadata::total(response.metadata.as_ref()), 0);

        let rs: RecordSet = sets.into_iter().nth(1).unwrap().into();
        assert_eq!(rs.record_type, "MX");
        assert!(rs.values.is_empty());
    }
}
