use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    ChangeBatch, ChangeInfo, HostedZone, PaginatedResponse, PaginationParams, RecordSet,
};

/// Upper bound on pages walked by the `list_all_*` helpers.
const MAX_PAGES: u32 = 10_000;

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Provider 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录集名称
    pub record_name: Option<String>,
    /// 托管区 ID 或名称
    pub zone: Option<String>,
}

/// Provider 错误映射 Trait（内部使用）
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// A DNS provider that hosts zones and accepts change batches.
///
/// The sync layer only needs three calls: list zones, list a zone's record
/// sets, and submit a change batch. Implementations must be safe to share
/// across concurrently running upserts.
#[async_trait]
pub trait HostedZoneProvider: Send + Sync {
    /// Provider identifier used in logs and errors.
    fn id(&self) -> &'static str;

    /// Lists one page of hosted zones.
    async fn list_zones(&self, params: &PaginationParams)
    -> Result<PaginatedResponse<HostedZone>>;

    /// Lists one page of record sets of a zone.
    async fn list_record_sets(
        &self,
        zone_id: &str,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<RecordSet>>;

    /// Submits a change batch to a zone.
    ///
    /// A rejected batch surfaces as [`ProviderError::InvalidChangeBatch`].
    async fn change_record_sets(&self, zone_id: &str, batch: &ChangeBatch) -> Result<ChangeInfo>;

    /// Lists every hosted zone by walking all pages.
    async fn list_all_zones(&self) -> Result<Vec<HostedZone>> {
        let mut params = PaginationParams::default();
        let mut zones = Vec::new();
        for _ in 0..MAX_PAGES {
            let page = self.list_zones(&params).await?;
            let done = !page.has_more || page.items.is_empty();
            zones.extend(page.items);
            if done {
                return Ok(zones);
            }
            params = params.next_page();
        }
        log::warn!("[{}] Zone listing stopped after {MAX_PAGES} pages", self.id());
        Ok(zones)
    }

    /// Lists every record set of a zone by walking all pages.
    async fn list_all_record_sets(&self, zone_id: &str) -> Result<Vec<RecordSet>> {
        let mut params = PaginationParams::default();
        let mut record_sets = Vec::new();
        for _ in 0..MAX_PAGES {
            let page = self.list_record_sets(zone_id, &params).await?;
            let done = !page.has_more || page.items.is_empty();
            record_sets.extend(page.items);
            if done {
                return Ok(record_sets);
            }
            params = params.next_page();
        }
        log::warn!(
            "[{}] Record set listing for zone {zone_id} stopped after {MAX_PAGES} pages",
            self.id()
        );
        Ok(record_sets)
    }
}
