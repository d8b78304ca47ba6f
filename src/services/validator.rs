//! 字段与表单校验服务 - 业务能力层
//!
//! 只回答"这个值合不合法"，不关心页面流转，
//! 也不负责错误的展示（展示由表现层回调完成）。

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::models::field::{FieldValidation, FieldValue, FormValidation, PageData};
use crate::models::pages::{
    field_spec, FieldRule, FieldSpec, CONTROLLING_DISABLE_VALUE, CONTROLLING_FIELD,
    DEPENDENT_FIELDS,
};
use crate::models::session::SurveySession;

// 面向受访者的文案
const MSG_REQUIRED: &str = "This field is required.";
const MSG_CHOICE: &str = "Please select one of the provided options.";
const MSG_DATE: &str = "Please enter a valid date.";
const MSG_AGE: &str = "Please enter a valid age.";
const MSG_EMAIL: &str = "Please enter a valid email address.";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("邮箱正则不合法"))
}

/// 校验服务
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// 单字段校验（blur / change 事件触发）
    ///
    /// 可依赖会话中已收集的状态做跨字段判断：
    /// cc1 选择"不了解"时，cc2 / cc3 被强制为 N/A，直接视为合法。
    pub fn validate_field(
        &self,
        field: &str,
        value: &FieldValue,
        session: &SurveySession,
    ) -> FieldValidation {
        if DEPENDENT_FIELDS.contains(&field) {
            let controlling = session.text_value(2, CONTROLLING_FIELD);
            if controlling.as_deref() == Some(CONTROLLING_DISABLE_VALUE) {
                return FieldValidation::ok();
            }
        }

        let Some(spec) = field_spec(field) else {
            debug!("未知字段 {}，跳过校验", field);
            return FieldValidation::ok();
        };

        match check_rule(spec, value) {
            Some(message) => FieldValidation::fail(message),
            None => FieldValidation::ok(),
        }
    }

    /// 整页校验（前进 / 提交前触发）
    ///
    /// 错误按页面声明的字段顺序收集，
    /// 第一个错误决定聚焦提示指向的字段。
    pub fn validate_form(&self, data: &PageData, fields: &[FieldSpec]) -> FormValidation {
        let mut result = FormValidation::default();

        // 同页跨字段规则：cc1 为禁用值时，依赖字段不再检查
        let controlling_disabled = data
            .get(CONTROLLING_FIELD)
            .map(|v| v.as_text() == CONTROLLING_DISABLE_VALUE)
            .unwrap_or(false);

        for spec in fields {
            if controlling_disabled && DEPENDENT_FIELDS.contains(&spec.name) {
                continue;
            }

            let value = data.get(spec.name);
            match value {
                Some(v) => {
                    if let Some(message) = check_rule(spec, v) {
                        result.push(spec.name, message);
                    }
                }
                None => {
                    if spec.required {
                        result.push(spec.name, MSG_REQUIRED);
                    }
                }
            }
        }

        result
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// 按字段规则检查单个值，返回错误文案（None 表示合法）
fn check_rule(spec: &FieldSpec, value: &FieldValue) -> Option<String> {
    if value.is_empty() {
        return spec.required.then(|| MSG_REQUIRED.to_string());
    }

    let text = value.as_text();
    let text = text.trim();

    match spec.rule {
        FieldRule::Required => None,
        FieldRule::Choice(allowed) => {
            (!allowed.contains(&text)).then(|| MSG_CHOICE.to_string())
        }
        FieldRule::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .is_err()
            .then(|| MSG_DATE.to_string()),
        FieldRule::Age => {
            let valid = text
                .parse::<u32>()
                .map(|age| (1..=120).contains(&age))
                .unwrap_or(false);
            (!valid).then(|| MSG_AGE.to_string())
        }
        FieldRule::Email => (!email_pattern().is_match(text)).then(|| MSG_EMAIL.to_string()),
        FieldRule::FreeText(max_len) => (text.chars().count() > max_len)
            .then(|| format!("Please keep this under {} characters.", max_len)),
    }
}
