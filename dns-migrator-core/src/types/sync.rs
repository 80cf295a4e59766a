//! Sync plan and report types

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use dns_migrator_provider::{ChangeBatch, RecordSetType};

/// One UPSERT to submit: a single (zone, type, domain) record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedUpsert {
    /// Zone name.
    pub zone: String,
    /// Provider zone identifier the batch is sent to.
    pub zone_id: String,
    /// Owner name without trailing dot.
    pub domain: String,
    pub record_type: RecordSetType,
    pub change_batch: ChangeBatch,
}

/// Every UPSERT derived from the record store, plus what could not be placed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPlan {
    /// Ordered by zone name, record type (A, TXT, MX, CNAME), then domain.
    pub upserts: Vec<PlannedUpsert>,
    /// Records whose domain belongs to none of the zones.
    pub unmatched: usize,
    /// Domains whose owning zone is ambiguous.
    pub ambiguous: Vec<String>,
}

impl SyncPlan {
    pub fn len(&self) -> usize {
        self.upserts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty()
    }
}

/// Outcome counters for one record type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCounts {
    pub planned: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// One rejected or failed UPSERT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
    pub zone: String,
    pub domain: String,
    pub record_type: RecordSetType,
    pub reason: String,
    /// The provider refused the batch itself, as opposed to a transport or auth failure.
    pub invalid_change_batch: bool,
}

/// Aggregate result of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub counts: BTreeMap<RecordSetType, TypeCounts>,
    pub failures: Vec<SyncFailure>,
    pub unmatched: usize,
    pub ambiguous: Vec<String>,
    /// No change was submitted.
    pub dry_run: bool,
}

impl SyncReport {
    /// Counters for a record type (zero if nothing of that type was planned).
    pub fn counts_for(&self, record_type: RecordSetType) -> TypeCounts {
        self.counts.get(&record_type).copied().unwrap_or_default()
    }

    pub fn total_succeeded(&self) -> usize {
        self.counts.values().map(|c| c.succeeded).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.counts.values().map(|c| c.failed).sum()
    }

    /// No failures and no ambiguous domains.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.ambiguous.is_empty()
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            writeln!(f, "Dry run, no changes submitted")?;
        }
        for record_type in RecordSetType::IMPORTED {
            let c = self.counts_for(record_type);
            if self.dry_run {
                writeln!(f, "{:<6} planned {:>5}", record_type.as_str(), c.planned)?;
            } else {
                writeln!(
                    f,
                    "{:<6} succeeded {:>5}  failed {:>5}",
                    record_type.as_str(),
                    c.succeeded,
                    c.failed
                )?;
            }
        }
        if self.unmatched > 0 {
            writeln!(f, "{} record(s) outside every zone", self.unmatched)?;
        }
        for domain in &self.ambiguous {
            writeln!(f, "ambiguous zone for {domain}")?;
        }
        for failure in &self.failures {
            writeln!(
                f,
                "FAILED {} {} ({}): {}",
                failure.record_type, failure.domain, failure.zone, failure.reason
            )?;
        }
        Ok(())
    }
}
