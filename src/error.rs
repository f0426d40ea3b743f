use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 与站点建立连接失败（致命，登录前终止）
    #[error("连接建立失败: {0}")]
    ConnectionSetup(#[from] ConnectionSetupError),
    /// OTP 登录错误
    #[error("登录错误: {0}")]
    Login(#[from] LoginError),
    /// 分页获取订单失败
    #[error("订单获取失败: {0}")]
    PageFetch(#[from] PageFetchError),
    /// 导出错误
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
}

/// 建立会话时的错误
#[derive(Debug, Error)]
pub enum ConnectionSetupError {
    /// 请求首页失败
    #[error("请求 {url} 失败: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// 页面中找不到 csrfToken 片段
    #[error("页面中未找到 csrfToken")]
    TokenNotFound,
    /// 响应中缺少会话 cookie
    #[error("响应中缺少会话 cookie: {name}")]
    CookieNotFound { name: String },
}

/// OTP 登录错误
#[derive(Debug, Error)]
pub enum LoginError {
    /// 手机号格式不正确
    #[error("手机号格式不正确: '{phone}'")]
    InvalidPhone { phone: String },
    /// OTP 为空或格式不正确
    #[error("OTP 格式不正确")]
    InvalidOtp,
    /// 发送 OTP 被接口拒绝
    #[error("发送 OTP 失败: {reason}")]
    OtpSend { reason: String },
    /// OTP 校验失败
    #[error("OTP 校验失败: {reason}")]
    OtpVerify { reason: String },
    /// 当前状态不允许该操作
    #[error("登录状态 {actual} 下不能执行 {operation}")]
    InvalidState {
        operation: &'static str,
        actual: &'static str,
    },
    /// 响应异常，登录流程进入终止状态
    #[error("登录流程已终止: {reason}")]
    Failed { reason: String },
    /// 尝试次数用尽
    #[error("{step} 已尝试 {attempts} 次，放弃")]
    AttemptsExhausted { step: &'static str, attempts: usize },
}

impl LoginError {
    /// 是否可以通过重新输入后重试
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LoginError::InvalidPhone { .. }
                | LoginError::InvalidOtp
                | LoginError::OtpSend { .. }
                | LoginError::OtpVerify { .. }
        )
    }
}

/// 单次订单页请求的错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 传输层连接失败或连接中途断开，可重试一次
    #[error("连接 {endpoint} 失败: {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: BoxError,
    },
    /// 其他传输错误（超时等）
    #[error("请求 {endpoint} 失败: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: BoxError,
    },
    /// 非成功状态码
    #[error("{endpoint} 返回状态码 {status}")]
    Status { endpoint: String, status: u16 },
    /// 响应体无法解析
    #[error("{endpoint} 返回了无法解析的响应 ({body}): {source}")]
    Malformed {
        endpoint: String,
        body: String,
        #[source]
        source: BoxError,
    },
    /// 响应缺少 data 字段
    #[error("{endpoint} 响应中缺少 data")]
    MissingData { endpoint: String },
}

impl FetchError {
    /// 是否为可重试的连接错误
    pub fn is_connection(&self) -> bool {
        matches!(self, FetchError::Connection { .. })
    }

    /// 按 reqwest 错误类型分类
    ///
    /// 连接被拒绝，或者连接建立后在响应完成前被对端关闭/重置，都算连接错误；
    /// 超时不算
    pub fn from_reqwest(endpoint: impl Into<String>, err: reqwest::Error) -> Self {
        let endpoint = endpoint.into();
        if !err.is_timeout() && (err.is_connect() || is_dropped_connection(&err)) {
            FetchError::Connection {
                endpoint,
                source: Box::new(err),
            }
        } else {
            FetchError::Transport {
                endpoint,
                source: Box::new(err),
            }
        }
    }
}

/// 沿错误链查找"连接中途断开"的底层错误
fn is_dropped_connection(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(cause) = current {
        if let Some(hyper_err) = cause.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message() || hyper_err.is_closed() {
                return true;
            }
        }
        if let Some(io_err) = cause.downcast_ref::<std::io::Error>() {
            if matches!(
                io_err.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
            ) {
                return true;
            }
        }
        current = cause.source();
    }
    false
}

/// 分页中止时的错误，带页码
#[derive(Debug, Error)]
#[error("第 {page} 页: {source}")]
pub struct PageFetchError {
    pub page: u64,
    #[source]
    pub source: FetchError,
}

/// 导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// 缓存中没有该次运行的数据
    #[error("没有运行 {run_id} 的数据")]
    UnknownRun { run_id: String },
    /// 文件读写失败
    #[error("写入 {path} 失败: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// CSV 编码失败
    #[error("生成 CSV {path} 失败: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
