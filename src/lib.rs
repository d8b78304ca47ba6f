//! # Survey Submit
//!
//! 多步问卷的推进与提交核心
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 数据模型层（Models）
//! - `models/` - 会话状态、字段值、提交记录、静态页面配置表
//! - `SurveySession` - 唯一的共享可变状态，由流程层独占持有
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程顺序
//! - `Validator` - 单字段 / 整页校验能力
//! - `sanitizer` / `formatter` - 记录净化与四页合并能力
//! - `SubmissionService` - 后端契约（查重 / 保存 / 记时间戳）
//! - `SurveyPresenter` - 表现层契约（核心不接触任何 UI 工具包）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 页面推进状态机 + 提交序列编排
//! - `SurveyFlow` - 流程编排（校验 → 前进 / 后退；合并 → 查重 → 保存）
//!
//! ## 提交互斥
//!
//! 提交中状态是显式的会话阶段（`SurveyPhase::Submitting`），
//! 而不是布尔标志：进行中的提交使后续 `submit()` 调用成为空操作，
//! 且该阶段在所有退出路径上保证释放。

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod services;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, SubmissionError};
pub use models::{
    FieldValue, FormValidation, PageData, SubmissionRecord, SurveyPhase, SurveySession,
    TOTAL_PAGES,
};
pub use services::{
    HttpSubmissionService, MemorySubmissionService, SubmissionService, SurveyPresenter, Validator,
};
pub use workflow::{AdvanceOutcome, SubmitOutcome, SurveyFlow};
