//! 华为云 HTTP 请求方法

use chrono::Utc;
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::HuaweicloudProvider;
use super::types::ErrorResponse;

impl HuaweicloudProvider {
    /// 统一处理华为云响应错误
    fn handle_response_error(
        &self,
        status: u16,
        response_text: &str,
        ctx: ErrorContext,
    ) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        if let Ok(error) = serde_json::from_str::<ErrorResponse>(response_text)
            && error.code.is_some()
        {
            return Err(self.map_error(
                RawApiError::with_code(
                    error.code.unwrap_or_default(),
                    error.message.unwrap_or_default(),
                ),
                ctx,
            ));
        }

        Err(self.unknown_error(RawApiError::new(format!("HTTP {status}: {response_text}"))))
    }

    /// 签名并发送请求，返回成功响应的文本
    async fn send_signed(
        &self,
        method: Method,
        path: &str,
        query: &str,
        payload: Option<String>,
        ctx: ErrorContext,
    ) -> Result<String> {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        let host = self.host().to_string();

        let mut headers = vec![
            ("Host".to_string(), host.clone()),
            ("X-Sdk-Date".to_string(), timestamp.clone()),
        ];
        if payload.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let body = payload.unwrap_or_default();
        let authorization = self.sign(method.as_str(), path, query, &headers, &body, &timestamp);

        let url = if query.is_empty() {
            format!("{}{path}", self.endpoint)
        } else {
            format!("{}{path}?{query}", self.endpoint)
        };

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", authorization);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let (status, response_text) = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            method.as_str(),
            &url,
            &self.retry,
        )
        .await?;

        self.handle_response_error(status, &response_text, ctx)?;
        Ok(response_text)
    }

    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
        ctx: ErrorContext,
    ) -> Result<T> {
        let text = self.send_signed(Method::GET, path, query, None, ctx).await?;
        HttpUtils::parse_json(&text, self.provider_name())
    }

    /// 执行带 body 的请求（POST/PUT）
    pub(crate) async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T> {
        let payload =
            serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                provider: self.provider_name().to_string(),
                detail: e.to_string(),
            })?;

        let text = self
            .send_signed(method, path, "", Some(payload), ctx)
            .await?;
        HttpUtils::parse_json(&text, self.provider_name())
    }

    /// 执行 DELETE 请求
    pub(crate) async fn delete(&self, path: &str, ctx: ErrorContext) -> Result<()> {
        self.send_signed(Method::DELETE, path, "", None, ctx)
            .await
            .map(|_| ())
    }
}
