//! 测试辅助模块
//!
//! 提供 mock provider 和便捷的测试数据。

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use dns_migrator_provider::{
    ChangeBatch, ChangeInfo, HostedZone, HostedZoneProvider, PaginatedResponse, PaginationParams,
    ProviderError, RecordSet, RecordSetType, Result, normalize_domain_name,
};
use tokio::sync::RwLock;

use crate::record_store::RecordStore;

// ===== MockZoneProvider =====

/// In-memory hosted-zone provider.
pub struct MockZoneProvider {
    zones: RwLock<Vec<HostedZone>>,
    record_sets: RwLock<HashMap<String, Vec<RecordSet>>>,
    /// 已接受的变更批次 (zone_id, batch)
    submitted: RwLock<Vec<(String, ChangeBatch)>>,
    /// 按 (域名, 类型) 拒绝变更
    rejections: RwLock<HashSet<(String, RecordSetType)>>,
    failing_record_listing: RwLock<HashSet<String>>,
    fail_zone_listing: AtomicBool,
}

impl MockZoneProvider {
    pub fn new() -> Self {
        Self {
            zones: RwLock::new(Vec::new()),
            record_sets: RwLock::new(HashMap::new()),
            submitted: RwLock::new(Vec::new()),
            rejections: RwLock::new(HashSet::new()),
            failing_record_listing: RwLock::new(HashSet::new()),
            fail_zone_listing: AtomicBool::new(false),
        }
    }

    pub async fn add_zone(&self, id: &str, name: &str) {
        self.zones.write().await.push(HostedZone {
            id: id.to_string(),
            name: name.to_string(),
            record_count: None,
        });
    }

    pub async fn add_record_set(&self, zone_id: &str, name: &str, record_type: &str, values: &[&str]) {
        let mut store = self.record_sets.write().await;
        let sets = store.entry(zone_id.to_string()).or_default();
        let id = format!("rs-{}", sets.len() + 1);
        sets.push(RecordSet {
            id,
            name: name.to_string(),
            record_type: record_type.to_string(),
            ttl: Some(300),
            values: values.iter().map(ToString::to_string).collect(),
        });
    }

    /// Reject every batch touching `domain` with `record_type`.
    pub async fn reject(&self, domain: &str, record_type: RecordSetType) {
        self.rejections
            .write()
            .await
            .insert((normalize_domain_name(domain), record_type));
    }

    pub fn fail_zone_listing(&self, fail: bool) {
        self.fail_zone_listing.store(fail, Ordering::SeqCst);
    }

    pub async fn fail_record_listing(&self, zone_id: &str) {
        self.failing_record_listing
            .write()
            .await
            .insert(zone_id.to_string());
    }

    /// Accepted batches in submission order.
    pub async fn submitted(&self) -> Vec<(String, ChangeBatch)> {
        self.submitted.read().await.clone()
    }

    pub async fn clear_submitted(&self) {
        self.submitted.write().await.clear();
    }
}

fn page<T: Clone>(items: &[T], params: &PaginationParams) -> PaginatedResponse<T> {
    let params = params.validated(100);
    let start = ((params.page - 1) * params.page_size) as usize;
    let slice: Vec<T> = items
        .iter()
        .skip(start)
        .take(params.page_size as usize)
        .cloned()
        .collect();
    let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
    PaginatedResponse::new(slice, params.page, params.page_size, total)
}

#[async_trait]
impl HostedZoneProvider for MockZoneProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn list_zones(&self, params: &PaginationParams) -> Result<PaginatedResponse<HostedZone>> {
        if self.fail_zone_listing.load(Ordering::SeqCst) {
            return Err(ProviderError::InvalidCredentials {
                provider: "mock".to_string(),
                raw_message: Some("zone listing disabled".to_string()),
            });
        }
        let zones = self.zones.read().await;
        Ok(page(zones.as_slice(), params))
    }

    async fn list_record_sets(
        &self,
        zone_id: &str,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<RecordSet>> {
        if self.failing_record_listing.read().await.contains(zone_id) {
            return Err(ProviderError::NetworkError {
                provider: "mock".to_string(),
                detail: "connection reset".to_string(),
            });
        }
        let store = self.record_sets.read().await;
        Ok(page(store.get(zone_id).map_or(&[][..], Vec::as_slice), params))
    }

    async fn change_record_sets(&self, zone_id: &str, batch: &ChangeBatch) -> Result<ChangeInfo> {
        let rejections = self.rejections.read().await;
        for change in &batch.changes {
            let key = (
                normalize_domain_name(&change.record_set.name),
                change.record_set.record_type,
            );
            if rejections.contains(&key) {
                return Err(ProviderError::InvalidChangeBatch {
                    provider: "mock".to_string(),
                    zone_id: zone_id.to_string(),
                    detail: format!("{} {} rejected", key.1, key.0),
                });
            }
        }
        drop(rejections);

        let mut submitted = self.submitted.write().await;
        submitted.push((zone_id.to_string(), batch.clone()));
        Ok(ChangeInfo {
            record_set_ids: vec![format!("rs-{}", submitted.len())],
        })
    }
}

// ===== 测试数据 =====

/// Fixed run date for deterministic comments and serials.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default()
}

/// Store with two A, one TXT, three MX (one domain), one CNAME and one NS
/// under `example.org`, plus one A record outside it.
pub fn fixture_store() -> RecordStore {
    RecordStore::parse(
        "\
+www.example.org:192.0.2.10:300
+example.org:192.0.2.1:600
'example.org:v=spf1 mx -all:3600
@example.org::mx2.example.org:20:3600
@example.org::mx1.example.org:10:3600
@example.org::mx3.example.org:30:3600
Cmail.example.org:ghs.example.net:1800
&example.org::ns1.example.org
+www.example.org.de:192.0.2.99:300
",
    )
}
