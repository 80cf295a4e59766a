//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use dns_migrator_provider::{
    ChangeAction, ChangeBatch, HostedZoneProvider, ProviderCredentials, RecordSetType,
    ResourceRecordSet, create_provider,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试记录名称
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// 构造单条变更的批次
pub fn single_change(
    action: ChangeAction,
    name: &str,
    record_type: RecordSetType,
    values: &[&str],
) -> ChangeBatch {
    let mut batch = ChangeBatch::upsert(
        Some(format!("[{record_type}] integration test")),
        ResourceRecordSet {
            name: name.to_string(),
            record_type,
            ttl: 300,
            values: values.iter().map(ToString::to_string).collect(),
        },
    );
    batch.changes[0].action = action;
    batch
}

/// 测试上下文 - 封装 Provider 和测试托管区
pub struct TestContext {
    pub provider: Arc<dyn HostedZoneProvider>,
    pub zone: String,
    pub zone_id: Option<String>,
}

impl TestContext {
    /// 创建 Huaweicloud 测试上下文
    pub fn huaweicloud() -> Option<Self> {
        let access_key_id = env::var("HUAWEICLOUD_ACCESS_KEY_ID").ok()?;
        let secret_access_key = env::var("HUAWEICLOUD_SECRET_ACCESS_KEY").ok()?;
        let zone = env::var("TEST_DOMAIN").ok()?;

        let credentials = ProviderCredentials::Huaweicloud {
            access_key_id,
            secret_access_key,
        };
        let provider = create_provider(credentials, 2).ok()?;

        Some(Self {
            provider,
            zone,
            zone_id: None,
        })
    }

    /// 查找测试托管区的 `zone_id`
    pub async fn find_zone_id(&mut self) -> Option<String> {
        if self.zone_id.is_some() {
            return self.zone_id.clone();
        }

        let zones = self.provider.list_all_zones().await.ok()?;
        let zone = zones
            .into_iter()
            .find(|z| z.name.eq_ignore_ascii_case(&self.zone))?;
        self.zone_id = Some(zone.id.clone());
        Some(zone.id)
    }

    /// 测试记录的完全限定名
    pub fn fqdn(&self, label: &str) -> String {
        format!("{label}.{}.", self.zone)
    }

    /// 清理测试记录
    pub async fn cleanup(&self, zone_id: &str, name: &str, record_type: RecordSetType) {
        let batch = single_change(ChangeAction::Delete, name, record_type, &["0.0.0.0"]);
        let _ = self.provider.change_record_sets(zone_id, &batch).await;
    }
}
