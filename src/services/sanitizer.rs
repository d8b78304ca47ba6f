//! 记录净化服务 - 业务能力层
//!
//! 只负责"清洗字符串字段"能力：去标签、去控制字符、截断。

use std::sync::OnceLock;

use regex::Regex;

use crate::models::record::SubmissionRecord;

/// 单个字符串字段的最大保留长度
const MAX_FIELD_LEN: usize = 2000;

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("标签正则不合法"))
}

/// 净化单个字符串：去 HTML 标签、去控制字符、去首尾空白、截断
pub fn sanitize_text(input: &str) -> String {
    let stripped = tag_pattern().replace_all(input, "");
    let cleaned: String = stripped
        .chars()
        .filter(|c| !c.is_control() || *c == '\n')
        .collect();
    cleaned.trim().chars().take(MAX_FIELD_LEN).collect()
}

/// 净化整条提交记录的所有字符串字段
pub fn sanitize_record(mut record: SubmissionRecord) -> SubmissionRecord {
    record.for_each_string(|s| *s = sanitize_text(s));
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_trims() {
        assert_eq!(
            sanitize_text("  <script>alert(1)</script>hello  "),
            "alert(1)hello"
        );
        assert_eq!(sanitize_text("<b>bold</b> text"), "bold text");
    }

    #[test]
    fn removes_control_chars_but_keeps_newlines() {
        assert_eq!(sanitize_text("a\u{0007}b\nc"), "ab\nc");
    }
}
