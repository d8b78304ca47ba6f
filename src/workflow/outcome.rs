//! 流程结果类型

use crate::models::field::FormValidation;

/// 前进操作的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// 校验通过，当前活动页变为给定页
    Advanced(u8),
    /// 校验未通过，停留在原页（携带全部字段错误）
    Rejected(FormValidation),
    /// 请求与当前状态不符（非活动页 / 提交进行中），被忽略
    Ignored,
}

/// 提交操作的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 提交成功，会话已重置
    Submitted,
    /// 最后一页校验未通过
    ValidationFailed(FormValidation),
    /// 命中重复提交窗口，未持久化
    Duplicate,
    /// 保存失败或发生未预期错误，可重试
    Failed,
    /// 已有提交在进行中，本次调用为空操作
    InFlight,
    /// 当前活动页不是最后一页，请求被忽略
    Ignored,
}
