//! 内存提交后端 - 业务能力层
//!
//! 自带冷却窗口的内存实现，供测试和无后端的嵌入场景使用。

use std::collections::HashMap;

use chrono::{DateTime, Duration, Local};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::AppResult;
use crate::models::record::SubmissionRecord;
use crate::services::submission::SubmissionService;

/// 默认冷却窗口（分钟）
const DEFAULT_WINDOW_MINUTES: i64 = 5;

/// 内存提交后端
pub struct MemorySubmissionService {
    window: Duration,
    marks: Mutex<HashMap<(String, String), DateTime<Local>>>,
    saved: Mutex<Vec<SubmissionRecord>>,
}

impl MemorySubmissionService {
    pub fn new() -> Self {
        Self::with_window(Duration::minutes(DEFAULT_WINDOW_MINUTES))
    }

    /// 使用自定义冷却窗口创建
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            marks: Mutex::new(HashMap::new()),
            saved: Mutex::new(Vec::new()),
        }
    }

    /// 已保存的记录数量
    pub async fn saved_count(&self) -> usize {
        self.saved.lock().await.len()
    }

    /// 读取已保存的记录（测试断言用）
    pub async fn saved_records(&self) -> Vec<SubmissionRecord> {
        self.saved.lock().await.clone()
    }
}

impl Default for MemorySubmissionService {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionService for MemorySubmissionService {
    async fn check_duplicate(&self, category_key: &str, contact_key: &str) -> AppResult<bool> {
        let marks = self.marks.lock().await;
        let key = (category_key.to_string(), contact_key.to_string());

        let duplicate = marks
            .get(&key)
            .map(|marked_at| Local::now() - *marked_at < self.window)
            .unwrap_or(false);

        debug!("查重: {:?} -> {}", key, duplicate);
        Ok(duplicate)
    }

    async fn save(&self, record: &SubmissionRecord) -> AppResult<()> {
        self.saved.lock().await.push(record.clone());
        Ok(())
    }

    async fn mark_submission_time(&self, category_key: &str, contact_key: &str) -> AppResult<()> {
        let key = (category_key.to_string(), contact_key.to_string());
        self.marks.lock().await.insert(key, Local::now());
        Ok(())
    }
}
