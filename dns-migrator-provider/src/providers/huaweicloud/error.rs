//! 华为云错误映射
//!
//! 参考: <https://support.huaweicloud.com/api-dns/ErrorCode.html>
//!
//! 只映射迁移工具会遇到的错误码：认证、权限、配额、托管区状态、记录集参数。
//! 其余错误码回退到 `Unknown`。

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::HuaweicloudProvider;

impl ProviderErrorMapper for HuaweicloudProvider {
    fn provider_name(&self) -> &'static str {
        "huaweicloud"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        match raw.code.as_deref() {
            // ============ 认证错误 ============
            Some(
                "APIGW.0301" // IAM 认证信息错误
                | "APIGW.0101" // API 不存在/未发布（认证路径错误）
                | "APIGW.0303" // APP 认证信息错误
                | "APIGW.0305" // 通用认证错误
                | "DNS.0005", // 权限认证失败
            ) => ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },

            // ============ 权限/操作被拒绝 ============
            Some("APIGW.0302" | "APIGW.0306" | "DNS.0013" | "DNS.0030" | "DNS.1802") => {
                ProviderError::PermissionDenied {
                    provider,
                    raw_message: Some(raw.message),
                }
            }

            // ============ 频率限制 ============
            Some("APIGW.0308") => ProviderError::RateLimited {
                provider,
                retry_after: None,
                raw_message: Some(raw.message),
            },

            // ============ 配额 ============
            Some("DNS.0403" | "DNS.0404" | "DNS.2002") => ProviderError::QuotaExceeded {
                provider,
                raw_message: Some(raw.message),
            },

            // ============ 记录集已存在 ============
            Some("DNS.0312" | "DNS.0335" | "DNS.0016") => ProviderError::RecordExists {
                provider,
                record_name: context.record_name.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 记录集不存在 ============
            Some("DNS.0313" | "DNS.0004") => ProviderError::RecordNotFound {
                provider,
                record: context.record_name.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 托管区不存在 ============
            Some("DNS.0302" | "DNS.0101" | "DNS.1206") => ProviderError::ZoneNotFound {
                provider,
                zone: context.zone.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 托管区被暂停/冻结 ============
            Some("DNS.0213" | "DNS.0214" | "DNS.0209" | "DNS.2003" | "DNS.2005" | "DNS.2006") => {
                ProviderError::ZoneLocked {
                    provider,
                    zone: context.zone.unwrap_or_default(),
                    raw_message: Some(raw.message),
                }
            }

            // ============ 记录集参数 ============
            Some("DNS.0303" | "DNS.0319") => invalid_param(provider, "ttl", raw.message),
            Some("DNS.0307") => ProviderError::UnsupportedRecordType {
                provider,
                record_type: raw.message,
            },
            Some("DNS.0308") => invalid_param(provider, "records", raw.message),
            Some("DNS.0304" | "DNS.0202" | "DNS.0321") => {
                invalid_param(provider, "name", raw.message)
            }
            Some("DNS.0206" | "DNS.0305") => invalid_param(provider, "description", raw.message),

            // ============ 后端服务错误 ============
            Some("APIGW.0201" | "DNS.0015" | "DNS.0036") => ProviderError::NetworkError {
                provider,
                detail: raw.message,
            },

            _ => self.unknown_error(raw),
        }
    }
}

fn invalid_param(provider: String, param: &str, detail: String) -> ProviderError {
    ProviderError::InvalidParameter {
        provider,
        param: param.to_string(),
        detail,
    }
}
