//! Provider 同步服务

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use futures::stream::{self, StreamExt};

use dns_migrator_provider::{HostedZoneProvider, ProviderError, RecordSet};

use crate::error::{CoreError, CoreResult};
use crate::record_store::RecordStore;
use crate::services::sync_planner::plan_changes;
use crate::types::{
    ManagedZone, PlannedUpsert, SyncFailure, SyncPlan, SyncReport, ZoneRecordSets,
};

/// Knobs for one import run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Maximum number of change batches in flight.
    pub concurrency: usize,
    /// Plan and log only; never call the change API.
    pub dry_run: bool,
    /// Date written into change comments.
    pub run_date: NaiveDate,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            dry_run: false,
            run_date: Local::now().date_naive(),
        }
    }
}

/// Pushes tinydns records into a provider's hosted zones.
pub struct ProviderSync {
    provider: Arc<dyn HostedZoneProvider>,
    options: SyncOptions,
}

impl ProviderSync {
    /// 创建同步服务实例
    #[must_use]
    pub fn new(provider: Arc<dyn HostedZoneProvider>, options: SyncOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// List all hosted zones, sorted by name.
    ///
    /// A failure here is fatal for the run: without zone ids there is no target.
    pub async fn list_zones(&self) -> CoreResult<Vec<ManagedZone>> {
        let hosted = self.provider.list_all_zones().await.map_err(|e| {
            log::error!("Failed to list hosted zones: {e}");
            CoreError::Provider(e)
        })?;

        let mut zones: Vec<ManagedZone> = hosted.into_iter().map(ManagedZone::from_hosted).collect();
        zones.sort_by(|a, b| a.name.cmp(&b.name));
        log::info!("Found {} hosted zone(s)", zones.len());
        Ok(zones)
    }

    /// Existing record sets of a zone (read-only, for inspection).
    pub async fn fetch_existing_records(&self, zone_id: &str) -> CoreResult<Vec<RecordSet>> {
        Ok(self.provider.list_all_record_sets(zone_id).await?)
    }

    /// Fetch existing record sets for every zone.
    ///
    /// A zone whose listing fails is logged and left out.
    pub async fn inspect_zones(&self, zones: &[ManagedZone]) -> Vec<ZoneRecordSets> {
        let mut inspected = Vec::with_capacity(zones.len());
        for zone in zones {
            let Some(zone_id) = zone.id.as_deref() else {
                continue;
            };
            match self.fetch_existing_records(zone_id).await {
                Ok(record_sets) => {
                    log::info!("{}", zone.name);
                    for rs in &record_sets {
                        log::info!("{} {} {:?}", rs.record_type, rs.name, rs.values);
                    }
                    inspected.push(ZoneRecordSets {
                        zone: zone.clone(),
                        record_sets,
                    });
                }
                Err(e) => log_core_error(&format!("Failed to get record sets of {}", zone.name), &e),
            }
        }
        inspected
    }

    /// Plan changes for `zones` with this run's date.
    pub fn plan(&self, zones: &[ManagedZone], store: &RecordStore) -> SyncPlan {
        plan_changes(zones, store, self.options.run_date)
    }

    /// Plan and apply every UPSERT.
    pub async fn import_records(&self, zones: &[ManagedZone], store: &RecordStore) -> SyncReport {
        let plan = self.plan(zones, store);
        self.execute(&plan).await
    }

    /// Submit a plan. A failed UPSERT is logged and recorded, never retried,
    /// and does not stop the others.
    pub async fn execute(&self, plan: &SyncPlan) -> SyncReport {
        let mut report = SyncReport {
            unmatched: plan.unmatched,
            ambiguous: plan.ambiguous.clone(),
            dry_run: self.options.dry_run,
            ..Default::default()
        };
        for upsert in &plan.upserts {
            report.counts.entry(upsert.record_type).or_default().planned += 1;
        }

        if self.options.dry_run {
            for upsert in &plan.upserts {
                for change in &upsert.change_batch.changes {
                    log::info!(
                        "[dry-run] UPSERT {} {} ttl={} in {}: {:?}",
                        upsert.record_type,
                        change.record_set.name,
                        change.record_set.ttl,
                        upsert.zone,
                        change.record_set.values
                    );
                }
            }
            return report;
        }

        let results: Vec<(&PlannedUpsert, Result<(), ProviderError>)> =
            stream::iter(plan.upserts.iter().map(|upsert| async move {
                log::info!(
                    "Importing {} record for {} to {}",
                    upsert.record_type,
                    upsert.domain,
                    upsert.zone
                );
                let result = self
                    .provider
                    .change_record_sets(&upsert.zone_id, &upsert.change_batch)
                    .await
                    .map(|_| ());
                (upsert, result)
            }))
            .buffered(self.options.concurrency.max(1))
            .collect()
            .await;

        for (upsert, result) in results {
            let counts = report.counts.entry(upsert.record_type).or_default();
            match result {
                Ok(()) => counts.succeeded += 1,
                Err(e) => {
                    counts.failed += 1;
                    let invalid_change_batch = e.is_invalid_change_batch();
                    let error = if invalid_change_batch {
                        CoreError::ChangeBatch {
                            zone: upsert.zone.clone(),
                            domain: upsert.domain.clone(),
                            record_type: upsert.record_type,
                            reason: e.to_string(),
                        }
                    } else {
                        CoreError::Provider(e)
                    };
                    log_core_error(
                        &format!("Invalid {} record update for {}", upsert.record_type, upsert.domain),
                        &error,
                    );
                    report.failures.push(SyncFailure {
                        zone: upsert.zone.clone(),
                        domain: upsert.domain.clone(),
                        record_type: upsert.record_type,
                        reason: error.to_string(),
                        invalid_change_batch,
                    });
                }
            }
        }

        log::info!(
            "Import finished: {} succeeded, {} failed",
            report.total_succeeded(),
            report.total_failed()
        );
        report
    }
}

fn log_core_error(context: &str, e: &CoreError) {
    if e.is_expected() {
        log::warn!("{context}: {e}");
    } else {
        log::error!("{context}: {e}");
    }
}
