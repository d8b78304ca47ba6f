//! 提交记录模型
//!
//! 四页数据合并后的最终记录。每次提交尝试时重新构建，
//! 从不部分持久化，也不保存在会话里。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 第 4 页的反馈信息（嵌套字段）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub email: String,
    pub suggestions: String,
}

/// 最终提交记录
///
/// 第 1、2 页字段平铺，第 3 页的服务质量评分收进 `sqd` 映射，
/// 第 4 页收进嵌套的 `feedback`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub client_type: String,
    pub date: String,
    pub age: String,
    pub service_availed: String,
    pub region_of_residence: String,
    pub sex: String,

    pub cc1: String,
    pub cc2: String,
    pub cc3: String,

    /// sqd0 ~ sqd8 评分
    pub sqd: BTreeMap<String, String>,

    pub feedback: Feedback,

    /// 记录构建时间（RFC 3339）
    pub submitted_at: String,
}

impl SubmissionRecord {
    /// 查重键：受访者类别
    pub fn category_key(&self) -> &str {
        &self.client_type
    }

    /// 查重键：联系方式
    pub fn contact_key(&self) -> &str {
        &self.feedback.email
    }

    /// 遍历记录中所有字符串字段（净化时使用）
    pub fn for_each_string(&mut self, mut f: impl FnMut(&mut String)) {
        f(&mut self.client_type);
        f(&mut self.date);
        f(&mut self.age);
        f(&mut self.service_availed);
        f(&mut self.region_of_residence);
        f(&mut self.sex);
        f(&mut self.cc1);
        f(&mut self.cc2);
        f(&mut self.cc3);
        for v in self.sqd.values_mut() {
            f(v);
        }
        f(&mut self.feedback.email);
        f(&mut self.feedback.suggestions);
    }
}
