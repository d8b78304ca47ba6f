//! 提交后端契约 - 业务能力层
//!
//! 核心只依赖这个 trait：查重、保存、记录提交时间。
//! 具体后端由宿主注入（HTTP 实现见 http_submission，
//! 内存实现见 memory_submission）。

use crate::error::AppResult;
use crate::models::record::SubmissionRecord;

/// 提交后端能力
///
/// - `check_duplicate` 必须在 `save` 之前完成并返回"非重复"
/// - `mark_submission_time` 失败只记日志，不影响提交结果
#[allow(async_fn_in_trait)]
pub trait SubmissionService {
    /// 按（受访者类别, 联系方式）查询冷却窗口内是否已有提交
    async fn check_duplicate(&self, category_key: &str, contact_key: &str) -> AppResult<bool>;

    /// 持久化一条提交记录
    ///
    /// 后端明确拒绝时返回 `SubmissionError::SaveRejected`（携带用户可见文案）
    async fn save(&self, record: &SubmissionRecord) -> AppResult<()>;

    /// 记录本次提交的时间戳（用于后端的重复提交窗口）
    async fn mark_submission_time(&self, category_key: &str, contact_key: &str) -> AppResult<()>;
}
