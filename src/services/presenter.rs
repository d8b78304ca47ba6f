//! 表现层契约 - 业务能力层
//!
//! 核心不接触任何 UI 工具包，所有可见副作用都通过这个 trait 下发：
//! 读取当前页输入、显示/清除错误、切换页面、禁用字段、延迟跳转。

use std::time::Duration;

use crate::models::field::PageData;

/// 表现层回调契约
///
/// 所有方法都是同步且不可失败的：展示失败不属于核心的失败语义。
pub trait SurveyPresenter {
    /// 读取某一页当前的输入值
    fn collect_page_data(&self, page: u8) -> PageData;

    /// 在指定字段旁显示内联错误
    fn show_field_error(&self, field: &str, message: &str);

    /// 清除指定字段的内联错误
    fn clear_field_error(&self, field: &str);

    /// 清除所有内联错误
    fn clear_all_errors(&self);

    /// 滚动 / 聚焦到指定字段（第一个无效字段的提示）
    fn focus_field(&self, field: &str);

    /// 显示全局错误横幅（重复提交提示、保存失败等）
    fn show_error(&self, message: &str);

    /// 显示提交成功提示
    fn show_success(&self);

    /// 批量启用 / 禁用字段（控制字段副作用）
    fn set_fields_enabled(&self, fields: &[&str], enabled: bool);

    /// 强制写入字段值（依赖字段自动填 N/A）
    fn force_field_value(&self, field: &str, value: &str);

    /// 活动页变更（含进度百分比，用于进度条）
    fn page_changed(&self, page: u8, progress_percent: u8);

    /// 在延迟之后跳转回首页（提交成功后调度）
    fn schedule_home_redirect(&self, delay: Duration);
}
