//! 静态页面配置表
//!
//! 每页的字段清单、必填规则与校验规则。
//! 这是配置，不是算法：流程层只按表驱动，不关心具体字段含义。

/// 问卷总页数（问卷生命周期内固定）
pub const TOTAL_PAGES: u8 = 4;

/// 第 2 页的控制字段：选择"不了解"时禁用两个依赖字段
pub const CONTROLLING_FIELD: &str = "cc1";

/// 控制字段触发禁用的取值
pub const CONTROLLING_DISABLE_VALUE: &str = "4";

/// 被控制字段（禁用时被强制填为 N/A）
pub const DEPENDENT_FIELDS: [&str; 2] = ["cc2", "cc3"];

/// 依赖字段的 N/A 取值
pub const NA_VALUE: &str = "5";

/// 字段校验规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// 只要求非空
    Required,
    /// 必须是给定选项之一
    Choice(&'static [&'static str]),
    /// 必须是 YYYY-MM-DD 格式的有效日期
    Date,
    /// 必须是 1-120 的整数
    Age,
    /// 可留空；填写时必须是合法邮箱
    Email,
    /// 可留空；填写时限制最大长度
    FreeText(usize),
}

/// 单个字段的配置
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    /// 是否必填（进入下一页前必须通过）
    pub required: bool,
    pub rule: FieldRule,
}

/// 单页的配置
#[derive(Debug, Clone, Copy)]
pub struct PageSpec {
    pub index: u8,
    /// 表现层中该页的标识（原 DOM id）
    pub dom_id: &'static str,
    /// 按声明顺序排列的字段清单
    pub fields: &'static [FieldSpec],
}

const fn field(name: &'static str, required: bool, rule: FieldRule) -> FieldSpec {
    FieldSpec {
        name,
        required,
        rule,
    }
}

/// 四页问卷的完整配置
///
/// 第 1 页：六个身份字段；第 2 页：三个认知字段（cc2/cc3 依赖 cc1）；
/// 第 3 页：九个服务质量字段；第 4 页：两个可选反馈字段（只做格式校验）。
pub const PAGE_SPECS: [PageSpec; TOTAL_PAGES as usize] = [
    PageSpec {
        index: 1,
        dom_id: "form-1",
        fields: &[
            field("clientType", true, FieldRule::Required),
            field("date", true, FieldRule::Date),
            field("age", true, FieldRule::Age),
            field("serviceAvailed", true, FieldRule::Required),
            field("regionOfResidence", true, FieldRule::Required),
            field("sex", true, FieldRule::Required),
        ],
    },
    PageSpec {
        index: 2,
        dom_id: "form-2",
        fields: &[
            field("cc1", true, FieldRule::Choice(&["1", "2", "3", "4"])),
            field("cc2", true, FieldRule::Choice(&["1", "2", "3", "4", "5"])),
            field("cc3", true, FieldRule::Choice(&["1", "2", "3", "4", "5"])),
        ],
    },
    PageSpec {
        index: 3,
        dom_id: "form-3",
        fields: &[
            field("sqd0", true, FieldRule::Choice(&["1", "2", "3", "4", "5", "6"])),
            field("sqd1", true, FieldRule::Choice(&["1", "2", "3", "4", "5", "6"])),
            field("sqd2", true, FieldRule::Choice(&["1", "2", "3", "4", "5", "6"])),
            field("sqd3", true, FieldRule::Choice(&["1", "2", "3", "4", "5", "6"])),
            field("sqd4", true, FieldRule::Choice(&["1", "2", "3", "4", "5", "6"])),
            field("sqd5", true, FieldRule::Choice(&["1", "2", "3", "4", "5", "6"])),
            field("sqd6", true, FieldRule::Choice(&["1", "2", "3", "4", "5", "6"])),
            field("sqd7", true, FieldRule::Choice(&["1", "2", "3", "4", "5", "6"])),
            field("sqd8", true, FieldRule::Choice(&["1", "2", "3", "4", "5", "6"])),
        ],
    },
    PageSpec {
        index: 4,
        dom_id: "form-4",
        fields: &[
            field("suggestions", false, FieldRule::FreeText(2000)),
            field("email", false, FieldRule::Email),
        ],
    },
];

/// 获取某一页的配置
///
/// # Panics
/// 页码越界时 panic（页码来自核心内部，越界属于编程错误）
pub fn page_spec(page: u8) -> &'static PageSpec {
    assert!(
        (1..=TOTAL_PAGES).contains(&page),
        "页码 {} 超出范围 [1, {}]",
        page,
        TOTAL_PAGES
    );
    &PAGE_SPECS[(page - 1) as usize]
}

/// 查找某个字段的配置（跨页）
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    PAGE_SPECS
        .iter()
        .flat_map(|p| p.fields.iter())
        .find(|f| f.name == name)
}
