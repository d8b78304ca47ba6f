//! 问卷会话状态
//!
//! 核心唯一的共享可变状态，由流程层独占持有和修改。
//! 提交互斥不再用布尔标志，而是显式的 `SurveyPhase` 状态。

use crate::models::field::{FieldValue, PageData};
use crate::models::pages::TOTAL_PAGES;

/// 会话所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyPhase {
    /// 正在填写（页面可前进 / 后退）
    Filling,
    /// 提交流程进行中（互斥：期间再次提交是空操作）
    Submitting,
    /// 提交成功（瞬态：随即重置回 Filling）
    Submitted,
}

/// 问卷会话
///
/// 不变量：
/// - `1 <= current_page <= TOTAL_PAGES`
/// - `pages[n]` 只会被"收集并校验"周期整体覆盖
#[derive(Debug, Clone)]
pub struct SurveySession {
    current_page: u8,
    pages: [PageData; TOTAL_PAGES as usize],
    phase: SurveyPhase,
}

impl SurveySession {
    /// 创建新会话（第 1 页，四页数据均为空）
    pub fn new() -> Self {
        Self {
            current_page: 1,
            pages: Default::default(),
            phase: SurveyPhase::Filling,
        }
    }

    pub fn current_page(&self) -> u8 {
        self.current_page
    }

    pub fn phase(&self) -> SurveyPhase {
        self.phase
    }

    /// 提交是否进行中（供表现层禁用提交按钮）
    pub fn is_submitting(&self) -> bool {
        self.phase == SurveyPhase::Submitting
    }

    /// 读取某一页已提交的数据
    ///
    /// # Panics
    /// 页码越界时 panic（页码来自核心内部，越界属于编程错误）
    pub fn page(&self, page: u8) -> &PageData {
        assert_page(page);
        &self.pages[(page - 1) as usize]
    }

    /// 整页覆盖某一页的数据（收集-校验周期）
    ///
    /// # Panics
    /// 页码越界时 panic
    pub fn set_page_data(&mut self, page: u8, data: PageData) {
        assert_page(page);
        self.pages[(page - 1) as usize] = data;
    }

    /// 写入单个字段值（控制字段副作用使用）
    ///
    /// # Panics
    /// 页码越界时 panic
    pub fn set_value(&mut self, page: u8, field: &str, value: FieldValue) {
        assert_page(page);
        self.pages[(page - 1) as usize].insert(field.to_string(), value);
    }

    /// 读取单个字段的文本值
    ///
    /// # Panics
    /// 页码越界时 panic
    pub fn text_value(&self, page: u8, field: &str) -> Option<String> {
        assert_page(page);
        self.pages[(page - 1) as usize]
            .get(field)
            .map(|v| v.as_text())
    }

    /// 跳转到指定页
    ///
    /// # Panics
    /// 页码越界时 panic
    pub fn go_to(&mut self, page: u8) {
        assert_page(page);
        self.current_page = page;
    }

    /// 进入提交阶段
    ///
    /// 返回是否成功进入（已在提交中则返回 false）
    pub fn begin_submit(&mut self) -> bool {
        if self.phase == SurveyPhase::Submitting {
            return false;
        }
        self.phase = SurveyPhase::Submitting;
        true
    }

    /// 提交失败 / 中断：回到填写阶段，停留在当前页
    pub fn abort_submit(&mut self) {
        if self.phase == SurveyPhase::Submitting {
            self.phase = SurveyPhase::Filling;
        }
    }

    /// 提交成功：标记 Submitted
    pub fn complete_submit(&mut self) {
        self.phase = SurveyPhase::Submitted;
    }

    /// 重置为初始状态（提交成功后立即调用）
    pub fn reset(&mut self) {
        self.current_page = 1;
        self.pages = Default::default();
        self.phase = SurveyPhase::Filling;
    }
}

impl Default for SurveySession {
    fn default() -> Self {
        Self::new()
    }
}

fn assert_page(page: u8) {
    assert!(
        (1..=TOTAL_PAGES).contains(&page),
        "页码 {} 超出范围 [1, {}]",
        page,
        TOTAL_PAGES
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "页码 0 超出范围")]
    fn out_of_range_page_is_a_programming_error() {
        SurveySession::new().page(0);
    }

    #[test]
    #[should_panic(expected = "页码 5 超出范围")]
    fn page_above_total_is_a_programming_error() {
        SurveySession::new().text_value(TOTAL_PAGES + 1, "clientType");
    }
}
