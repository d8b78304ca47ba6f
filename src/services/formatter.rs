//! 记录合并服务 - 业务能力层
//!
//! 只负责"把四页数据合并成一条提交记录"能力，
//! 不做净化（净化由 sanitizer 负责），不做流程。

use std::collections::BTreeMap;

use crate::models::field::PageData;
use crate::models::record::{Feedback, SubmissionRecord};

fn text(data: &PageData, field: &str) -> String {
    data.get(field).map(|v| v.as_text()).unwrap_or_default()
}

/// 合并四页数据为最终提交记录
///
/// 第 1、2 页平铺，第 3 页收进 sqd 映射，第 4 页收进嵌套 feedback，
/// 并盖上构建时间戳。
pub fn format_for_storage(
    page1: &PageData,
    page2: &PageData,
    page3: &PageData,
    page4: &PageData,
) -> SubmissionRecord {
    let mut sqd = BTreeMap::new();
    for i in 0..=8 {
        let name = format!("sqd{}", i);
        sqd.insert(name.clone(), text(page3, &name));
    }

    SubmissionRecord {
        client_type: text(page1, "clientType"),
        date: text(page1, "date"),
        age: text(page1, "age"),
        service_availed: text(page1, "serviceAvailed"),
        region_of_residence: text(page1, "regionOfResidence"),
        sex: text(page1, "sex"),

        cc1: text(page2, "cc1"),
        cc2: text(page2, "cc2"),
        cc3: text(page2, "cc3"),

        sqd,

        feedback: Feedback {
            email: text(page4, "email"),
            suggestions: text(page4, "suggestions"),
        },

        submitted_at: chrono::Local::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::FieldValue;

    #[test]
    fn merges_pages_into_flat_record() {
        let mut page1 = PageData::new();
        page1.insert("clientType".into(), FieldValue::text("citizen"));
        page1.insert("age".into(), FieldValue::text("34"));

        let mut page3 = PageData::new();
        page3.insert("sqd0".into(), FieldValue::text("5"));

        let mut page4 = PageData::new();
        page4.insert("email".into(), FieldValue::text("a@b.co"));

        let record = format_for_storage(&page1, &PageData::new(), &page3, &page4);

        assert_eq!(record.client_type, "citizen");
        assert_eq!(record.age, "34");
        assert_eq!(record.sqd["sqd0"], "5");
        // 未填写的字段合并为空串，而不是缺键
        assert_eq!(record.sqd["sqd8"], "");
        assert_eq!(record.feedback.email, "a@b.co");
        assert_eq!(record.category_key(), "citizen");
        assert_eq!(record.contact_key(), "a@b.co");
    }
}
