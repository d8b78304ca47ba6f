//! 问卷流程编排 - 流程层
//!
//! 核心职责：页面推进状态机 + 提交序列编排
//!
//! 提交顺序：
//! 1. 校验最后一页 → 2. 合并 + 净化 → 3. 查重 → 4. 保存 → 5. 成功收尾
//!
//! 每一步都可以短路后续步骤；提交阶段在所有退出路径上释放。

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, SubmissionError};
use crate::models::field::{FieldValue, FormValidation};
use crate::models::pages::{
    page_spec, CONTROLLING_DISABLE_VALUE, CONTROLLING_FIELD, DEPENDENT_FIELDS, NA_VALUE,
    TOTAL_PAGES,
};
use crate::models::session::SurveySession;
use crate::services::formatter;
use crate::services::presenter::SurveyPresenter;
use crate::services::sanitizer;
use crate::services::submission::SubmissionService;
use crate::services::validator::Validator;
use crate::workflow::outcome::{AdvanceOutcome, SubmitOutcome};

// 面向受访者的文案
const MSG_DUPLICATE: &str =
    "You have already submitted a survey recently. Please wait a few minutes before submitting again.";
const MSG_SAVE_FALLBACK: &str = "Failed to submit survey. Please try again.";
const MSG_UNEXPECTED: &str = "An unexpected error occurred. Please try again.";

/// 问卷流程编排器
///
/// - 独占持有会话状态（没有全局单例）
/// - 每次页面流转前触发校验
/// - 组装并提交最终记录，处理重复 / 失败 / 成功三种结局
/// - 不接触任何 UI，可见副作用全部走 `SurveyPresenter`
pub struct SurveyFlow<S, P> {
    config: Config,
    session: SurveySession,
    validator: Validator,
    submission: S,
    presenter: P,
}

impl<S: SubmissionService, P: SurveyPresenter> SurveyFlow<S, P> {
    /// 创建新的问卷流程（第 1 页，空会话）
    pub fn new(config: Config, submission: S, presenter: P) -> Self {
        Self {
            config,
            session: SurveySession::new(),
            validator: Validator::new(),
            submission,
            presenter,
        }
    }

    // ========== 供表现层读取的状态 ==========

    pub fn current_page(&self) -> u8 {
        self.session.current_page()
    }

    pub fn total_pages(&self) -> u8 {
        TOTAL_PAGES
    }

    /// 提交是否进行中（用于禁用提交按钮）
    pub fn is_submitting(&self) -> bool {
        self.session.is_submitting()
    }

    /// 当前进度百分比
    pub fn progress_percent(&self) -> u8 {
        Self::progress_of(self.session.current_page())
    }

    /// 读取某页某字段的文本值
    ///
    /// # Panics
    /// 页码越界时 panic（页码来自核心内部，越界属于编程错误）
    pub fn page_value(&self, page: u8, field: &str) -> Option<String> {
        self.session.text_value(page, field)
    }

    /// 注入的提交后端
    pub fn submission(&self) -> &S {
        &self.submission
    }

    /// 注入的表现层
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    // ========== 页面推进状态机 ==========

    /// 收集并校验当前页，通过则前进一页
    ///
    /// 校验失败时停留原页，逐字段显示错误，
    /// 并把聚焦提示指向第一个无效字段（按页面声明顺序）。
    pub fn advance(&mut self, page: u8) -> AdvanceOutcome {
        if self.session.is_submitting() {
            warn!("提交进行中，忽略前进请求");
            return AdvanceOutcome::Ignored;
        }
        if page != self.session.current_page() {
            warn!(
                "忽略对第 {} 页的前进请求（当前活动页是第 {} 页）",
                page,
                self.session.current_page()
            );
            return AdvanceOutcome::Ignored;
        }

        // 收集当前页输入并整页写入会话
        let data = self.presenter.collect_page_data(page);
        self.session.set_page_data(page, data.clone());

        let validation = self.validator.validate_form(&data, page_spec(page).fields);

        self.presenter.clear_all_errors();

        if !validation.is_valid() {
            warn!(
                "⚠️ 第 {} 页校验未通过: {} 个字段有错误",
                page,
                validation.errors.len()
            );
            self.surface_field_errors(&validation);
            return AdvanceOutcome::Rejected(validation);
        }

        if page < TOTAL_PAGES {
            let next = page + 1;
            self.session.go_to(next);
            self.presenter.page_changed(next, Self::progress_of(next));
            info!("➡️ 第 {} 页校验通过，进入第 {} 页", page, next);
            AdvanceOutcome::Advanced(next)
        } else {
            // 最后一页没有"下一页"，数据已提交进会话，等待 submit()
            AdvanceOutcome::Advanced(page)
        }
    }

    /// 无条件返回上一页（不触发校验，已填数据保留）
    pub fn retreat(&mut self) -> u8 {
        let current = self.session.current_page();
        if self.session.is_submitting() || current <= 1 {
            return current;
        }

        let prev = current - 1;
        self.session.go_to(prev);
        self.presenter.page_changed(prev, Self::progress_of(prev));
        info!("⬅️ 返回第 {} 页", prev);
        prev
    }

    // ========== 字段级事件 ==========

    /// 单字段校验（blur / change 事件）
    ///
    /// 只刷新该字段的错误指示，从不阻塞输入，也不改变页面状态。
    pub fn on_field_event(&self, field: &str, value: FieldValue) {
        let validation = self.validator.validate_field(field, &value, &self.session);
        if validation.valid {
            self.presenter.clear_field_error(field);
        } else if let Some(message) = &validation.error {
            self.presenter.show_field_error(field, message);
        }
    }

    /// 控制字段变更副作用
    ///
    /// cc1 取禁用值时，cc2 / cc3 被强制填为 N/A 并置为不可交互；
    /// 改回其他值时只重新启用，此前被覆盖的值不会自动恢复。
    pub fn on_controlling_field_change(&mut self, value: &str) {
        self.session
            .set_value(2, CONTROLLING_FIELD, FieldValue::text(value));

        if value == CONTROLLING_DISABLE_VALUE {
            info!("控制字段取值 {}，禁用依赖字段并自动填入 N/A", value);
            for field in DEPENDENT_FIELDS {
                self.session.set_value(2, field, FieldValue::text(NA_VALUE));
                self.presenter.force_field_value(field, NA_VALUE);
            }
            self.presenter.set_fields_enabled(&DEPENDENT_FIELDS, false);
        } else {
            self.presenter.set_fields_enabled(&DEPENDENT_FIELDS, true);
        }
    }

    // ========== 提交序列 ==========

    /// 提交问卷
    ///
    /// 互斥保证：已有提交在进行时直接返回 `InFlight`，
    /// 不排队、不重试、不会发出第二次后端调用。
    /// 只有最后一页是活动页时才接受提交（与 `advance` 的
    /// 活动页守卫对称），否则返回 `Ignored`。
    /// 提交阶段在所有退出路径（成功、校验失败、重复、
    /// 保存失败、未预期错误）上都会释放。
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.session.is_submitting() {
            info!("提交已在进行中，忽略重复调用");
            return SubmitOutcome::InFlight;
        }
        if self.session.current_page() != TOTAL_PAGES {
            warn!(
                "忽略提交请求（当前活动页是第 {} 页，不是最后一页）",
                self.session.current_page()
            );
            return SubmitOutcome::Ignored;
        }
        self.session.begin_submit();

        let outcome = match self.submit_inner().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("❌ 提交过程中发生未预期错误: {:#}", e);
                self.presenter.show_error(MSG_UNEXPECTED);
                SubmitOutcome::Failed
            }
        };

        // 成功路径已在 reset 中回到 Filling，其余路径在这里释放
        self.session.abort_submit();
        outcome
    }

    async fn submit_inner(&mut self) -> Result<SubmitOutcome> {
        // ========== 步骤 1: 收集并校验最后一页 ==========
        let page = TOTAL_PAGES;
        let data = self.presenter.collect_page_data(page);
        self.session.set_page_data(page, data.clone());

        let validation = self.validator.validate_form(&data, page_spec(page).fields);
        if !validation.is_valid() {
            warn!(
                "⚠️ 第 {} 页校验未通过: {} 个字段有错误",
                page,
                validation.errors.len()
            );
            self.surface_field_errors(&validation);
            return Ok(SubmitOutcome::ValidationFailed(validation));
        }

        // ========== 步骤 2: 合并四页数据并净化 ==========
        let record = formatter::format_for_storage(
            self.session.page(1),
            self.session.page(2),
            self.session.page(3),
            self.session.page(4),
        );
        let record = sanitizer::sanitize_record(record);

        // ========== 步骤 3: 查重 ==========
        info!("🔍 查询重复提交窗口...");
        let duplicate = self
            .with_timeout(
                "survey/duplicate",
                self.submission
                    .check_duplicate(record.category_key(), record.contact_key()),
            )
            .await?;

        if duplicate {
            info!("⛔ 命中重复提交窗口，本次不持久化");
            self.presenter.show_error(MSG_DUPLICATE);
            return Ok(SubmitOutcome::Duplicate);
        }

        // ========== 步骤 4: 保存 ==========
        info!("📤 正在保存问卷...");
        if let Err(e) = self
            .with_timeout("survey/responses", self.submission.save(&record))
            .await
        {
            if let AppError::Submission(SubmissionError::SaveRejected { message }) = &e {
                warn!("⚠️ 后端拒绝保存: {:?}", message);
                let shown = message
                    .clone()
                    .unwrap_or_else(|| MSG_SAVE_FALLBACK.to_string());
                self.presenter.show_error(&shown);
                return Ok(SubmitOutcome::Failed);
            }
            // 网络 / 超时等走外层的通用兜底
            return Err(e.into());
        }

        // ========== 步骤 5: 成功收尾 ==========
        if let Err(e) = self
            .with_timeout(
                "survey/submission-time",
                self.submission
                    .mark_submission_time(record.category_key(), record.contact_key()),
            )
            .await
        {
            // 时间戳标记失败不影响提交结果
            warn!("⚠️ 提交时间标记失败: {}", e);
        }

        info!("✅ 问卷提交成功");
        self.session.complete_submit();
        self.presenter.show_success();

        // 会话销毁：重置为初始状态，准备下一次填写
        self.session.reset();
        self.presenter.page_changed(1, Self::progress_of(1));
        self.presenter
            .schedule_home_redirect(Duration::from_secs(self.config.redirect_delay_secs));

        Ok(SubmitOutcome::Submitted)
    }

    // ========== 辅助方法 ==========

    /// 逐字段显示错误，并把聚焦提示指向第一个无效字段
    fn surface_field_errors(&self, validation: &FormValidation) {
        for e in &validation.errors {
            self.presenter.show_field_error(&e.field, &e.message);
        }
        if let Some(first) = validation.first() {
            self.presenter.focus_field(&first.field);
        }
    }

    /// 给后端调用加上显式超时，避免提交阶段被挂死
    async fn with_timeout<T>(
        &self,
        endpoint: &str,
        fut: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        let secs = self.config.request_timeout_secs;
        match tokio::time::timeout(Duration::from_secs(secs), fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::timeout(endpoint, secs)),
        }
    }

    fn progress_of(page: u8) -> u8 {
        (page as u16 * 100 / TOTAL_PAGES as u16) as u8
    }
}
