//! 华为云 `HostedZoneProvider` trait 实现

use async_trait::async_trait;
use reqwest::Method;

use crate::error::{ProviderError, Result};
use crate::providers::common::{split_record_values, to_fqdn};
use crate::traits::{ErrorContext, HostedZoneProvider};
use crate::types::{
    Change, ChangeAction, ChangeBatch, ChangeInfo, HostedZone, PaginatedResponse,
    PaginationParams, RecordSet, RecordSetType, ResourceRecordSet,
};

use super::types::{
    HuaweicloudRecordSet, ListMetadata, ListRecordSetsResponse, ListZonesResponse,
    RecordSetRequest, RecordSetResponse,
};
use super::{HuaweicloudProvider, MAX_DESCRIPTION_LEN, MAX_PAGE_SIZE};

/// 华为云 offset/limit 分页参数
fn offset_query(params: &PaginationParams) -> String {
    let params = params.validated(MAX_PAGE_SIZE);
    let offset = (params.page - 1) * params.page_size;
    format!("offset={offset}&limit={}", params.page_size)
}

/// 截断描述（华为云限制 255 字符）
fn description(comment: Option<&str>) -> Option<String> {
    comment.map(|c| c.chars().take(MAX_DESCRIPTION_LEN).collect())
}

/// 将变更中的记录集转换为华为云请求体
///
/// 多行值（合并后的 MX）拆成多条记录。
fn record_set_request(record_set: &ResourceRecordSet, comment: Option<&str>) -> RecordSetRequest {
    RecordSetRequest {
        name: to_fqdn(&record_set.name),
        record_type: record_set.record_type.as_str().to_string(),
        records: split_record_values(&record_set.values),
        ttl: record_set.ttl,
        description: description(comment),
    }
}

/// 记录集查找参数：精确匹配名称，按页遍历
fn lookup_query(fqdn: &str, record_type: RecordSetType, params: &PaginationParams) -> String {
    format!(
        "name={}&type={}&search_mode=equal&{}",
        urlencoding::encode(fqdn),
        record_type,
        offset_query(params)
    )
}

/// HTTP call realizing one change, given the id of the existing set if any.
#[derive(Debug, PartialEq, Eq)]
enum WriteStep<'a> {
    /// `PUT` over the existing set
    Replace(&'a str),
    /// `POST` a new set
    Create,
    Delete(&'a str),
    AlreadyExists,
    NotFound,
}

fn write_step(action: ChangeAction, existing: Option<&str>) -> WriteStep<'_> {
    match (action, existing) {
        (ChangeAction::Upsert, Some(id)) => WriteStep::Replace(id),
        (ChangeAction::Upsert | ChangeAction::Create, None) => WriteStep::Create,
        (ChangeAction::Create, Some(_)) => WriteStep::AlreadyExists,
        (ChangeAction::Delete, Some(id)) => WriteStep::Delete(id),
        (ChangeAction::Delete, None) => WriteStep::NotFound,
    }
}

impl HuaweicloudProvider {
    /// 按名称和类型精确查找已有记录集
    ///
    /// 逐页读取直到命中或没有更多结果。
    async fn find_record_set(
        &self,
        zone_id: &str,
        record_set: &ResourceRecordSet,
        ctx: &ErrorContext,
    ) -> Result<Option<HuaweicloudRecordSet>> {
        let fqdn = to_fqdn(&record_set.name);
        let path = format!("/v2/zones/{zone_id}/recordsets");
        let mut params = PaginationParams {
            page: 1,
            page_size: MAX_PAGE_SIZE,
        };

        loop {
            let query = lookup_query(&fqdn, record_set.record_type, &params);
            let response: ListRecordSetsResponse = self.get(&path, &query, ctx.clone()).await?;
            let total_count = ListMetadata::total(response.metadata.as_ref());
            let sets = response.recordsets.unwrap_or_default();
            let fetched = sets.len();

            if let Some(found) = sets
                .into_iter()
                .find(|rs| rs.is_set(&fqdn, record_set.record_type))
            {
                return Ok(Some(found));
            }
            let has_more = PaginatedResponse::<()>::new(
                Vec::new(),
                params.page,
                params.page_size,
                total_count,
            )
            .has_more;
            if fetched == 0 || !has_more {
                return Ok(None);
            }
            params = params.next_page();
        }
    }

    /// 执行单条变更，返回记录集 ID
    async fn apply_change(
        &self,
        zone_id: &str,
        change: &Change,
        comment: Option<&str>,
    ) -> Result<String> {
        let record_set = &change.record_set;
        let ctx = ErrorContext {
            record_name: Some(to_fqdn(&record_set.name)),
            zone: Some(zone_id.to_string()),
        };
        let existing = self.find_record_set(zone_id, record_set, &ctx).await?;
        let collection = format!("/v2/zones/{zone_id}/recordsets");

        match write_step(change.action, existing.as_ref().map(|rs| rs.id.as_str())) {
            WriteStep::Replace(id) => {
                log::debug!(
                    "[huaweicloud] Replacing {} {} ({id})",
                    record_set.record_type,
                    record_set.name
                );
                let body = record_set_request(record_set, comment);
                let path = format!("{collection}/{id}");
                let response: RecordSetResponse =
                    self.send_json(Method::PUT, &path, &body, ctx).await?;
                Ok(response.id)
            }
            WriteStep::Create => {
                log::debug!(
                    "[huaweicloud] Creating {} {}",
                    record_set.record_type,
                    record_set.name
                );
                let body = record_set_request(record_set, comment);
                let response: RecordSetResponse =
                    self.send_json(Method::POST, &collection, &body, ctx).await?;
                Ok(response.id)
            }
            WriteStep::Delete(id) => {
                let path = format!("{collection}/{id}");
                self.delete(&path, ctx).await?;
                Ok(id.to_string())
            }
            WriteStep::AlreadyExists => Err(ProviderError::RecordExists {
                provider: "huaweicloud".to_string(),
                record_name: to_fqdn(&record_set.name),
                raw_message: None,
            }),
            WriteStep::NotFound => Err(ProviderError::RecordNotFound {
                provider: "huaweicloud".to_string(),
                record: to_fqdn(&record_set.name),
                raw_message: None,
            }),
        }
    }
}

#[async_trait]
impl HostedZoneProvider for HuaweicloudProvider {
    fn id(&self) -> &'static str {
        "huaweicloud"
    }

    async fn list_zones(
        &self,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<HostedZone>> {
        let query = format!("type=public&{}", offset_query(params));
        let response: ListZonesResponse = self
            .get("/v2/zones", &query, ErrorContext::default())
            .await?;

        let total_count = ListMetadata::total(response.metadata.as_ref());
        let zones = response
            .zones
            .unwrap_or_default()
            .into_iter()
            .map(HostedZone::from)
            .collect();

        Ok(PaginatedResponse::new(
            zones,
            params.page,
            params.page_size,
            total_count,
        ))
    }

    async fn list_record_sets(
        &self,
        zone_id: &str,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<RecordSet>> {
        let path = format!("/v2/zones/{zone_id}/recordsets");
        let ctx = ErrorContext {
            zone: Some(zone_id.to_string()),
            ..Default::default()
        };
        let response: ListRecordSetsResponse =
            self.get(&path, &offset_query(params), ctx).await?;

        let total_count = ListMetadata::total(response.metadata.as_ref());
        let record_sets = response
            .recordsets
            .unwrap_or_default()
            .into_iter()
            .map(RecordSet::from)
            .collect();

        Ok(PaginatedResponse::new(
            record_sets,
            params.page,
            params.page_size,
            total_count,
        ))
    }

    /// 华为云没有批量变更接口，按顺序逐条执行。
    ///
    /// 某条失败时立即返回，已执行的变更不会回滚。
    async fn change_record_sets(&self, zone_id: &str, batch: &ChangeBatch) -> Result<ChangeInfo> {
        let mut info = ChangeInfo::default();
        for change in &batch.changes {
            let id = self
                .apply_change(zone_id, change, batch.comment.as_deref())
                .await
                .map_err(|e| e.into_change_batch_error(zone_id))?;
            info.record_set_ids.push(id);
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_query_uses_clamped_page_size() {
        let q = offset_query(&PaginationParams {
            page: 3,
            page_size: 100,
        });
        assert_eq!(q, "offset=200&limit=100");

        let q = offset_query(&PaginationParams {
            page: 0,
            page_size: 9_999,
        });
        assert_eq!(q, "offset=0&limit=500");
    }

    #[test]
    fn request_splits_merged_mx_value() {
        let rs = ResourceRecordSet {
            name: "example.org".to_string(),
            record_type: RecordSetType::Mx,
            ttl: 3600,
            values: vec!["10 mx1.example.org\n20 mx2.example.org\n".to_string()],
        };
        let body = record_set_request(&rs, Some("[MX] Record change initiated on 2024-05-01"));
        assert_eq!(body.name, "example.org.");
        assert_eq!(body.record_type, "MX");
        assert_eq!(
            body.records,
            vec!["10 mx1.example.org", "20 mx2.example.org"]
        );
        assert_eq!(
            body.description.as_deref(),
            Some("[MX] Record change initiated on 2024-05-01")
        );
    }

    #[test]
    fn description_is_truncated() {
        let long = "x".repeat(400);
        let desc = description(Some(&long)).unwrap();
        assert_eq!(desc.chars().count(), MAX_DESCRIPTION_LEN);
        assert!(description(None).is_none());
    }

    #[test]
    fn request_serializes_type_field() {
        let rs = ResourceRecordSet {
            name: "www.example.org.".to_string(),
            record_type: RecordSetType::A,
            ttl: 300,
            values: vec!["192.0.2.1".to_string()],
        };
        let json = serde_json::to_value(record_set_request(&rs, None)).unwrap();
        assert_eq!(json["type"], "A");
        assert_eq!(json["name"], "www.example.org.");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn lookup_query_asks_for_exact_name_page_by_page() {
        let first = PaginationParams {
            page: 1,
            page_size: MAX_PAGE_SIZE,
        };
        assert_eq!(
            lookup_query("example.org.", RecordSetType::A, &first),
            "name=example.org.&type=A&search_mode=equal&offset=0&limit=500"
        );
        assert_eq!(
            lookup_query("_dmarc.example.org.", RecordSetType::Txt, &first.next_page()),
            "name=_dmarc.example.org.&type=TXT&search_mode=equal&offset=500&limit=500"
        );
    }

    #[test]
    fn upsert_replaces_existing_set_and_creates_missing_one() {
        assert_eq!(
            write_step(ChangeAction::Upsert, Some("rs-1")),
            WriteStep::Replace("rs-1")
        );
        assert_eq!(write_step(ChangeAction::Upsert, None), WriteStep::Create);
        assert_eq!(write_step(ChangeAction::Create, None), WriteStep::Create);
        assert_eq!(
            write_step(ChangeAction::Create, Some("rs-1")),
            WriteStep::AlreadyExists
        );
        assert_eq!(
            write_step(ChangeAction::Delete, Some("rs-1")),
            WriteStep::Delete("rs-1")
        );
        assert_eq!(write_step(ChangeAction::Delete, None), WriteStep::NotFound);
    }
}
