//! HTTP 会话 - 基础设施层
//!
//! 唯一持有 reqwest 客户端（cookie 存储、User-Agent、超时）

use crate::config::Config;
use crate::error::ConnectionSetupError;
use crate::infrastructure::csrf::{parse_csrf_token, CsrfToken};
use tracing::{debug, info};

/// Swiggy 会话 cookie 名
pub const SESSION_COOKIE: &str = "__SW";

/// 建立连接后拿到的凭据
///
/// `__SW` cookie 只在建立连接时检查是否存在，之后由 cookie 存储自动携带
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub csrf_token: CsrfToken,
}

/// HTTP 会话
///
/// 职责：
/// - 持有唯一的 reqwest::Client，cookie 自动跟随后续请求
/// - 建立连接并解析 csrfToken / 会话 cookie
/// - 不认识 OTP / 订单
pub struct HttpSession {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSession {
    /// 创建新的会话（尚未发出任何请求）
    pub fn new(config: &Config) -> Result<Self, ConnectionSetupError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .timeout(config.request_timeout())
            .build()
            .map_err(|source| ConnectionSetupError::Request {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self { client, base_url })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// 拼接站点下的完整地址
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 建立连接：请求首页，解析 csrfToken 与 `__SW` cookie
    ///
    /// 不做重试，任何一项缺失都直接返回错误
    pub async fn establish(&self) -> Result<SessionTokens, ConnectionSetupError> {
        info!("🔗 正在与 Swiggy 建立连接...");

        let (html, sw_cookie) = self.fetch_root().await?;
        let csrf_token = parse_csrf_token(&html)?;
        if !sw_cookie.is_some_and(|value| !value.is_empty()) {
            return Err(ConnectionSetupError::CookieNotFound {
                name: SESSION_COOKIE.to_string(),
            });
        }

        info!("✓ 连接建立成功");
        Ok(SessionTokens { csrf_token })
    }

    /// 重新请求首页，只刷新 csrfToken（cookie 保留在 cookie 存储中）
    pub async fn refresh_token(&self) -> Result<CsrfToken, ConnectionSetupError> {
        debug!("刷新 csrfToken");
        let (html, _) = self.fetch_root().await?;
        parse_csrf_token(&html)
    }

    async fn fetch_root(&self) -> Result<(String, Option<String>), ConnectionSetupError> {
        let url = self.url("/");
        let request_failed = |source| ConnectionSetupError::Request {
            url: url.clone(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(request_failed)?;
        debug!("首页状态码: {}", response.status());

        let sw_cookie = response
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string());

        let html = response.text().await.map_err(request_failed)?;
        Ok((html, sw_cookie))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_for(server: &MockServer) -> HttpSession {
        let config = Config {
            base_url: server.uri(),
            ..Config::default()
        };
        HttpSession::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_establish_reads_token_and_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "__SW=sw-cookie-value; Path=/")
                    .set_body_string(r#"<script>window._csrfToken = "tok-1";</script>"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let tokens = session_for(&server).establish().await.unwrap();
        assert_eq!(tokens.csrf_token.as_str(), "tok-1");
    }

    #[tokio::test]
    async fn test_establish_without_cookie_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<script>window._csrfToken = "tok-1";</script>"#),
            )
            .mount(&server)
            .await;

        let err = session_for(&server).establish().await.unwrap_err();
        assert!(matches!(err, ConnectionSetupError::CookieNotFound { ref name } if name == "__SW"));
    }

    #[tokio::test]
    async fn test_establish_without_token_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "__SW=abc; Path=/")
                    .set_body_string("<html></html>"),
            )
            .mount(&server)
            .await;

        let err = session_for(&server).establish().await.unwrap_err();
        assert!(matches!(err, ConnectionSetupError::TokenNotFound));
    }
}
