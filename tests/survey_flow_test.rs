//! 问卷流程端到端测试
//!
//! 用记录型表现层 + 脚本化后端走完整个推进 / 提交流程。

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use survey_submit::{
    AdvanceOutcome, AppError, AppResult, Config, FieldValue, PageData, SubmissionRecord,
    SubmissionService, SubmitOutcome, SurveyFlow, SurveyPresenter,
};

// ========== 测试替身 ==========

/// 记录所有可见副作用的表现层
#[derive(Default)]
struct RecordingPresenter {
    /// 每页预先排布好的"用户输入"
    staged: RefCell<HashMap<u8, PageData>>,
    field_errors: RefCell<Vec<(String, String)>>,
    cleared_fields: RefCell<Vec<String>>,
    clear_all_count: Cell<usize>,
    focused: RefCell<Vec<String>>,
    banners: RefCell<Vec<String>>,
    success_count: Cell<usize>,
    enable_events: RefCell<Vec<(Vec<String>, bool)>>,
    forced_values: RefCell<Vec<(String, String)>>,
    page_changes: RefCell<Vec<(u8, u8)>>,
    redirects: RefCell<Vec<Duration>>,
}

impl RecordingPresenter {
    fn stage_page(&self, page: u8, data: PageData) {
        self.staged.borrow_mut().insert(page, data);
    }

    fn error_fields(&self) -> Vec<String> {
        self.field_errors
            .borrow()
            .iter()
            .map(|(f, _)| f.clone())
            .collect()
    }
}

impl SurveyPresenter for RecordingPresenter {
    fn collect_page_data(&self, page: u8) -> PageData {
        self.staged.borrow().get(&page).cloned().unwrap_or_default()
    }

    fn show_field_error(&self, field: &str, message: &str) {
        self.field_errors
            .borrow_mut()
            .push((field.to_string(), message.to_string()));
    }

    fn clear_field_error(&self, field: &str) {
        self.cleared_fields.borrow_mut().push(field.to_string());
    }

    fn clear_all_errors(&self) {
        self.clear_all_count.set(self.clear_all_count.get() + 1);
    }

    fn focus_field(&self, field: &str) {
        self.focused.borrow_mut().push(field.to_string());
    }

    fn show_error(&self, message: &str) {
        self.banners.borrow_mut().push(message.to_string());
    }

    fn show_success(&self) {
        self.success_count.set(self.success_count.get() + 1);
    }

    fn set_fields_enabled(&self, fields: &[&str], enabled: bool) {
        self.enable_events.borrow_mut().push((
            fields.iter().map(|f| f.to_string()).collect(),
            enabled,
        ));
    }

    fn force_field_value(&self, field: &str, value: &str) {
        self.forced_values
            .borrow_mut()
            .push((field.to_string(), value.to_string()));
    }

    fn page_changed(&self, page: u8, progress_percent: u8) {
        self.page_changes.borrow_mut().push((page, progress_percent));
    }

    fn schedule_home_redirect(&self, delay: Duration) {
        self.redirects.borrow_mut().push(delay);
    }
}

/// 脚本化后端：可配置查重结果与保存行为
#[derive(Default)]
struct ScriptedBackend {
    duplicate: bool,
    /// Some(_) 表示保存被拒绝（内层为后端给出的文案）
    reject_save: RefCell<Option<Option<String>>>,
    duplicate_calls: Cell<usize>,
    save_calls: Cell<usize>,
    mark_calls: Cell<usize>,
}

impl ScriptedBackend {
    fn rejecting(message: Option<&str>) -> Self {
        Self {
            reject_save: RefCell::new(Some(message.map(|s| s.to_string()))),
            ..Default::default()
        }
    }
}

impl SubmissionService for ScriptedBackend {
    async fn check_duplicate(&self, _category: &str, _contact: &str) -> AppResult<bool> {
        self.duplicate_calls.set(self.duplicate_calls.get() + 1);
        Ok(self.duplicate)
    }

    async fn save(&self, _record: &SubmissionRecord) -> AppResult<()> {
        self.save_calls.set(self.save_calls.get() + 1);
        match &*self.reject_save.borrow() {
            Some(message) => Err(AppError::save_rejected(message.clone())),
            None => Ok(()),
        }
    }

    async fn mark_submission_time(&self, _category: &str, _contact: &str) -> AppResult<()> {
        self.mark_calls.set(self.mark_calls.get() + 1);
        Ok(())
    }
}

// ========== 测试数据 ==========

fn page(entries: &[(&str, &str)]) -> PageData {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), FieldValue::text(*v)))
        .collect()
}

fn full_page1() -> PageData {
    page(&[
        ("clientType", "citizen"),
        ("date", "2025-03-14"),
        ("age", "34"),
        ("serviceAvailed", "Business Permit Renewal"),
        ("regionOfResidence", "NCR"),
        ("sex", "female"),
    ])
}

fn full_page2() -> PageData {
    page(&[("cc1", "1"), ("cc2", "2"), ("cc3", "3")])
}

fn full_page3() -> PageData {
    let mut data = PageData::new();
    for i in 0..=8 {
        data.insert(format!("sqd{}", i), FieldValue::text("5"));
    }
    data
}

fn full_page4() -> PageData {
    page(&[
        ("suggestions", "Great service, keep it up."),
        ("email", "resident@example.com"),
    ])
}

/// 永不返回的后端：模拟挂起的网络调用
#[derive(Default)]
struct StalledBackend {
    duplicate_calls: Cell<usize>,
    save_calls: Cell<usize>,
}

impl SubmissionService for StalledBackend {
    async fn check_duplicate(&self, _category: &str, _contact: &str) -> AppResult<bool> {
        self.duplicate_calls.set(self.duplicate_calls.get() + 1);
        std::future::pending().await
    }

    async fn save(&self, _record: &SubmissionRecord) -> AppResult<()> {
        self.save_calls.set(self.save_calls.get() + 1);
        Ok(())
    }

    async fn mark_submission_time(&self, _category: &str, _contact: &str) -> AppResult<()> {
        Ok(())
    }
}

/// 排布四页完整数据并推进到最后一页
fn flow_at_last_page<S: SubmissionService>(backend: S) -> SurveyFlow<S, RecordingPresenter> {
    let presenter = RecordingPresenter::default();
    presenter.stage_page(1, full_page1());
    presenter.stage_page(2, full_page2());
    presenter.stage_page(3, full_page3());
    presenter.stage_page(4, full_page4());

    let mut flow = SurveyFlow::new(Config::default(), backend, presenter);
    assert_eq!(flow.advance(1), AdvanceOutcome::Advanced(2), "第 1 页应该通过");
    assert_eq!(flow.advance(2), AdvanceOutcome::Advanced(3), "第 2 页应该通过");
    assert_eq!(flow.advance(3), AdvanceOutcome::Advanced(4), "第 3 页应该通过");
    flow
}

// ========== 页面推进 ==========

#[test]
fn advance_with_missing_field_stays_and_reports_it() {
    let presenter = RecordingPresenter::default();
    let mut data = full_page1();
    data.remove("age");
    presenter.stage_page(1, data);

    let mut flow = SurveyFlow::new(Config::default(), ScriptedBackend::default(), presenter);

    let outcome = flow.advance(1);

    // 停留在第 1 页，错误集合恰好是缺失的字段
    assert_eq!(flow.current_page(), 1);
    match outcome {
        AdvanceOutcome::Rejected(validation) => {
            assert_eq!(validation.fields(), vec!["age"]);
        }
        other => panic!("应该被拒绝，实际是 {:?}", other),
    }
    assert_eq!(flow.presenter().error_fields(), vec!["age"]);
    // 聚焦提示指向第一个无效字段
    assert_eq!(flow.presenter().focused.borrow().as_slice(), ["age"]);
}

#[test]
fn advance_with_full_page_moves_forward() {
    let presenter = RecordingPresenter::default();
    presenter.stage_page(1, full_page1());

    let mut flow = SurveyFlow::new(Config::default(), ScriptedBackend::default(), presenter);

    assert_eq!(flow.advance(1), AdvanceOutcome::Advanced(2));
    assert_eq!(flow.current_page(), 2);
    assert_eq!(flow.progress_percent(), 50);
    assert_eq!(flow.presenter().page_changes.borrow().as_slice(), [(2, 50)]);
    // 通过的数据已整页提交进会话
    assert_eq!(flow.page_value(1, "age").as_deref(), Some("34"));
}

#[test]
fn advance_on_inactive_page_is_ignored() {
    let presenter = RecordingPresenter::default();
    presenter.stage_page(3, full_page3());

    let mut flow = SurveyFlow::new(Config::default(), ScriptedBackend::default(), presenter);

    assert_eq!(flow.advance(3), AdvanceOutcome::Ignored);
    assert_eq!(flow.current_page(), 1);
}

#[test]
fn retreat_never_validates_and_preserves_data() {
    let presenter = RecordingPresenter::default();
    presenter.stage_page(1, full_page1());
    presenter.stage_page(2, full_page2());

    let mut flow = SurveyFlow::new(Config::default(), ScriptedBackend::default(), presenter);
    flow.advance(1);
    flow.advance(2);
    assert_eq!(flow.current_page(), 3);

    let errors_before = flow.presenter().field_errors.borrow().len();

    assert_eq!(flow.retreat(), 2);
    assert_eq!(flow.retreat(), 1);
    // 第 1 页不再后退
    assert_eq!(flow.retreat(), 1);

    // 后退不触发校验，也不丢数据
    assert_eq!(flow.presenter().field_errors.borrow().len(), errors_before);
    assert_eq!(flow.page_value(2, "cc1").as_deref(), Some("1"));
    assert_eq!(flow.page_value(1, "clientType").as_deref(), Some("citizen"));
}

// ========== 控制字段副作用 ==========

#[test]
fn controlling_field_disables_and_autofills_dependents() {
    let presenter = RecordingPresenter::default();
    let mut flow = SurveyFlow::new(Config::default(), ScriptedBackend::default(), presenter);

    flow.on_controlling_field_change("4");

    // 两个依赖字段被强制为 N/A 并禁用
    assert_eq!(flow.page_value(2, "cc2").as_deref(), Some("5"));
    assert_eq!(flow.page_value(2, "cc3").as_deref(), Some("5"));
    assert_eq!(
        flow.presenter().forced_values.borrow().as_slice(),
        [
            ("cc2".to_string(), "5".to_string()),
            ("cc3".to_string(), "5".to_string())
        ]
    );
    assert_eq!(
        flow.presenter().enable_events.borrow().last(),
        Some(&(vec!["cc2".to_string(), "cc3".to_string()], false))
    );

    flow.on_controlling_field_change("2");

    // 改回其他值：重新启用，但此前被覆盖的值不恢复
    assert_eq!(
        flow.presenter().enable_events.borrow().last(),
        Some(&(vec!["cc2".to_string(), "cc3".to_string()], true))
    );
    assert_eq!(flow.page_value(2, "cc2").as_deref(), Some("5"));
}

#[test]
fn field_event_only_toggles_inline_error() {
    let presenter = RecordingPresenter::default();
    let flow = SurveyFlow::new(Config::default(), ScriptedBackend::default(), presenter);

    flow.on_field_event("email", FieldValue::text("not-an-email"));
    assert_eq!(flow.presenter().error_fields(), vec!["email"]);

    flow.on_field_event("email", FieldValue::text("resident@example.com"));
    assert_eq!(
        flow.presenter().cleared_fields.borrow().as_slice(),
        ["email"]
    );
    // 字段级事件从不改变页面状态
    assert_eq!(flow.current_page(), 1);
}

// ========== 提交序列 ==========

#[tokio::test]
async fn successful_submit_resets_session_and_schedules_redirect() {
    let mut flow = flow_at_last_page(ScriptedBackend::default());

    let outcome = flow.submit().await;

    assert_eq!(outcome, SubmitOutcome::Submitted);
    assert_eq!(flow.submission().duplicate_calls.get(), 1);
    assert_eq!(flow.submission().save_calls.get(), 1);
    assert_eq!(flow.submission().mark_calls.get(), 1);

    // 会话重置：回到第 1 页，四页数据全部清空
    assert_eq!(flow.current_page(), 1);
    assert!(!flow.is_submitting());
    for page in 1..=4 {
        assert_eq!(flow.page_value(page, "clientType"), None);
        assert_eq!(flow.page_value(page, "cc1"), None);
        assert_eq!(flow.page_value(page, "email"), None);
    }

    assert_eq!(flow.presenter().success_count.get(), 1);
    // 延迟跳转已按配置调度
    assert_eq!(
        flow.presenter().redirects.borrow().as_slice(),
        [Duration::from_secs(3)]
    );
}

#[tokio::test]
async fn invalid_last_page_blocks_submit_before_any_backend_call() {
    let presenter = RecordingPresenter::default();
    presenter.stage_page(1, full_page1());
    presenter.stage_page(2, full_page2());
    presenter.stage_page(3, full_page3());
    presenter.stage_page(4, page(&[("email", "not-an-email")]));

    let mut flow = SurveyFlow::new(Config::default(), ScriptedBackend::default(), presenter);
    flow.advance(1);
    flow.advance(2);
    flow.advance(3);

    let outcome = flow.submit().await;

    match outcome {
        SubmitOutcome::ValidationFailed(validation) => {
            assert_eq!(validation.fields(), vec!["email"]);
        }
        other => panic!("应该校验失败，实际是 {:?}", other),
    }
    // 一次后端调用都不该发出
    assert_eq!(flow.submission().duplicate_calls.get(), 0);
    assert_eq!(flow.submission().save_calls.get(), 0);
    assert_eq!(flow.current_page(), 4);
    assert!(!flow.is_submitting());
}

#[tokio::test]
async fn duplicate_prevents_persistence_entirely() {
    let backend = ScriptedBackend {
        duplicate: true,
        ..Default::default()
    };
    let mut flow = flow_at_last_page(backend);

    let outcome = flow.submit().await;

    assert_eq!(outcome, SubmitOutcome::Duplicate);
    // 查重命中后保存从未被调用
    assert_eq!(flow.submission().duplicate_calls.get(), 1);
    assert_eq!(flow.submission().save_calls.get(), 0);
    assert_eq!(flow.submission().mark_calls.get(), 0);

    // 用户看到重复提交提示，可稍后重试
    let banners = flow.presenter().banners.borrow();
    assert_eq!(banners.len(), 1);
    assert!(banners[0].contains("already submitted"), "提示文案: {}", banners[0]);
    drop(banners);

    assert_eq!(flow.current_page(), 4);
    assert!(!flow.is_submitting());
}

#[tokio::test]
async fn save_rejection_surfaces_backend_message() {
    let backend = ScriptedBackend::rejecting(Some("The survey service is temporarily unavailable."));
    let mut flow = flow_at_last_page(backend);

    let outcome = flow.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(
        flow.presenter().banners.borrow().as_slice(),
        ["The survey service is temporarily unavailable."]
    );
    // 留在最后一页，提交阶段已释放，可重试
    assert_eq!(flow.current_page(), 4);
    assert!(!flow.is_submitting());
    assert_eq!(flow.submission().mark_calls.get(), 0);
}

#[tokio::test]
async fn save_rejection_without_message_uses_generic_fallback() {
    let backend = ScriptedBackend::rejecting(None);
    let mut flow = flow_at_last_page(backend);

    let outcome = flow.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(
        flow.presenter().banners.borrow().as_slice(),
        ["Failed to submit survey. Please try again."]
    );
}

#[tokio::test(start_paused = true)]
async fn hung_backend_call_times_out_and_releases_phase() {
    let mut flow = flow_at_last_page(StalledBackend::default());

    let outcome = flow.submit().await;

    // 超时走通用失败路径：提示用户、释放提交阶段、停留在最后一页
    assert_eq!(outcome, SubmitOutcome::Failed);
    assert!(!flow.is_submitting());
    assert_eq!(flow.current_page(), 4);
    assert_eq!(
        flow.presenter().banners.borrow().as_slice(),
        ["An unexpected error occurred. Please try again."]
    );
    // 查重挂死后不再触碰保存
    assert_eq!(flow.submission().duplicate_calls.get(), 1);
    assert_eq!(flow.submission().save_calls.get(), 0);
}

#[tokio::test]
async fn submit_requested_off_last_page_is_ignored() {
    let presenter = RecordingPresenter::default();
    let mut flow = SurveyFlow::new(Config::default(), ScriptedBackend::default(), presenter);

    // 活动页还在第 1 页
    let outcome = flow.submit().await;

    assert_eq!(outcome, SubmitOutcome::Ignored);
    assert_eq!(flow.submission().duplicate_calls.get(), 0);
    assert_eq!(flow.submission().save_calls.get(), 0);
    assert!(!flow.is_submitting());
}

#[tokio::test]
async fn retry_after_failure_succeeds() {
    let backend = ScriptedBackend::rejecting(None);
    let mut flow = flow_at_last_page(backend);

    assert_eq!(flow.submit().await, SubmitOutcome::Failed);
    assert!(!flow.is_submitting());

    // 后端恢复后重试成功
    *flow.submission().reject_save.borrow_mut() = None;

    assert_eq!(flow.submit().await, SubmitOutcome::Submitted);
    assert_eq!(flow.submission().save_calls.get(), 2);
    assert_eq!(flow.current_page(), 1);
}
