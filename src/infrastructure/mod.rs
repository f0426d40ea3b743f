//! 基础设施层
//!
//! 持有唯一的 HTTP 会话，只暴露"建立连接 / 刷新令牌"的能力

pub mod csrf;
pub mod http_session;

pub use csrf::{parse_csrf_token, CsrfToken};
pub use http_session::{HttpSession, SessionTokens, SESSION_COOKIE};
