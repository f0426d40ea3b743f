use crate::error::{AppResult, ConfigError};
use std::str::FromStr;
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// Swiggy 站点根地址
    pub base_url: String,
    /// 请求使用的 User-Agent
    pub user_agent: String,
    /// 单次 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 服务端每页订单数
    pub page_size: u64,
    /// 两次分页请求之间的间隔（毫秒）
    pub page_delay_ms: u64,
    /// 连接错误后的重试等待（毫秒）
    pub retry_backoff_ms: u64,
    /// 登录每一步允许的尝试次数
    pub max_login_attempts: usize,
    /// CSV 输出目录
    pub output_dir: String,
    /// 预览展示的行数
    pub preview_rows: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.swiggy.com".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36".to_string(),
            request_timeout_secs: 30,
            page_size: 10,
            page_delay_ms: 1500,
            retry_backoff_ms: 2000,
            max_login_attempts: 3,
            output_dir: "output".to_string(),
            preview_rows: 5,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，未设置的项使用默认值
    ///
    /// 变量存在但无法解析时返回 [`ConfigError::EnvVarParseFailed`]
    pub fn from_env() -> AppResult<Self> {
        let default = Self::default();
        Ok(Self {
            base_url: std::env::var("SWIGGY_BASE_URL").unwrap_or(default.base_url),
            user_agent: std::env::var("USER_AGENT").unwrap_or(default.user_agent),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(default.request_timeout_secs),
            page_size: parse_env("PAGE_SIZE", "u64")?.unwrap_or(default.page_size),
            page_delay_ms: parse_env("PAGE_DELAY_MS", "u64")?.unwrap_or(default.page_delay_ms),
            retry_backoff_ms: parse_env("RETRY_BACKOFF_MS", "u64")?
                .unwrap_or(default.retry_backoff_ms),
            max_login_attempts: parse_env("MAX_LOGIN_ATTEMPTS", "usize")?
                .unwrap_or(default.max_login_attempts),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            preview_rows: parse_env("PREVIEW_ROWS", "usize")?.unwrap_or(default.preview_rows),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

fn parse_env<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => parse_value(var_name, &value, expected_type).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T: FromStr>(var_name: &str, value: &str, expected_type: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}
