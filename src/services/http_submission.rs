//! HTTP 提交后端 - 业务能力层
//!
//! 通过 REST API 与问卷后端交互。响应约定沿用 code/message 风格：
//! code == 200 表示成功，其余 code 的 message 可直接面向用户展示。

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::record::SubmissionRecord;
use crate::services::submission::SubmissionService;

/// HTTP 提交后端
pub struct HttpSubmissionService {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpSubmissionService {
    /// 从配置创建
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// 检查响应是否成功
    fn is_success_response(result: &Value) -> bool {
        result
            .get("code")
            .and_then(|v| v.as_u64())
            .map(|code| code == 200)
            .unwrap_or(false)
    }

    fn response_message(result: &Value) -> Option<String> {
        result
            .get("message")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}

impl SubmissionService for HttpSubmissionService {
    async fn check_duplicate(&self, category_key: &str, contact_key: &str) -> AppResult<bool> {
        let endpoint = "survey/duplicate";
        debug!("查重: category={}", category_key);

        let result: Value = self
            .client
            .get(self.url(endpoint))
            .header("surveytoken", &self.token)
            .query(&[("category", category_key), ("contact", contact_key)])
            .send()
            .await?
            .json()
            .await?;

        if !Self::is_success_response(&result) {
            return Err(AppError::bad_response(
                endpoint,
                result.get("code").and_then(|v| v.as_u64()),
                Self::response_message(&result),
            ));
        }

        Ok(result
            .get("duplicate")
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    async fn save(&self, record: &SubmissionRecord) -> AppResult<()> {
        let endpoint = "survey/responses";
        debug!("保存提交记录");

        let result: Value = self
            .client
            .post(self.url(endpoint))
            .header("surveytoken", &self.token)
            .json(record)
            .send()
            .await?
            .json()
            .await?;

        if Self::is_success_response(&result) {
            Ok(())
        } else {
            Err(AppError::save_rejected(Self::response_message(&result)))
        }
    }

    async fn mark_submission_time(&self, category_key: &str, contact_key: &str) -> AppResult<()> {
        let endpoint = "survey/submission-time";

        let result: Value = self
            .client
            .post(self.url(endpoint))
            .header("surveytoken", &self.token)
            .json(&json!({
                "category": category_key,
                "contact": contact_key,
            }))
            .send()
            .await?
            .json()
            .await?;

        if !Self::is_success_response(&result) {
            // 时间戳失败不致命，记下来即可
            warn!("⚠️ 提交时间标记失败: {:?}", Self::response_message(&result));
        }

        Ok(())
    }
}
