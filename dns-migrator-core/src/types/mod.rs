//! 类型定义模块

mod record;
mod sync;
mod zone;

pub use record::DnsRecord;
pub use sync::{PlannedUpsert, SyncFailure, SyncPlan, SyncReport, TypeCounts};
pub use zone::{ManagedZone, ZoneRecordSets};

// Re-export provider 库的公共类型
pub use dns_migrator_provider::{
    ChangeBatch, HostedZone, PaginationParams, RecordSet, RecordSetType, ResourceRecordSet,
};
