/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 提交后端 API 基础 URL
    pub api_base_url: String,
    /// 提交后端访问令牌
    pub api_token: String,
    /// 后端请求超时（秒），覆盖查重和保存两次调用
    pub request_timeout_secs: u64,
    /// 提交成功后跳转首页的延迟（秒）
    pub redirect_delay_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://survey-api.example.org".to_string(),
            api_token: String::new(),
            request_timeout_secs: 30,
            redirect_delay_secs: 3,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("SURVEY_API_BASE_URL").unwrap_or(default.api_base_url),
            api_token: std::env::var("SURVEY_API_TOKEN").unwrap_or(default.api_token),
            request_timeout_secs: std::env::var("SURVEY_REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            redirect_delay_secs: std::env::var("SURVEY_REDIRECT_DELAY_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.redirect_delay_secs),
            verbose_logging: std::env::var("SURVEY_VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
