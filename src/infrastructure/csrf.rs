//! csrfToken 解析
//!
//! 首页内嵌的脚本片段形如：
//!
//! ```text
//! window._csrfToken = "2b8a...f1";
//! ```
//!
//! 约定：`csrfToken` 之后依次是可选空白、`=`、可选空白、单引号或双引号包裹的值、
//! 对应的闭合引号、可选空白和 `;`。取第一个匹配；值为空视为未找到。

use crate::error::ConnectionSetupError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static CSRF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"csrfToken\s*=\s*(?:"([^"]*)"|'([^']*)')\s*;"#).expect("csrf pattern is valid")
});

/// 防伪令牌，一次性使用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 从首页 HTML 中解析 csrfToken
///
/// # 返回
/// 找不到片段或值为空时返回 [`ConnectionSetupError::TokenNotFound`]
pub fn parse_csrf_token(html: &str) -> Result<CsrfToken, ConnectionSetupError> {
    let captures = CSRF_PATTERN
        .captures(html)
        .ok_or(ConnectionSetupError::TokenNotFound)?;

    let value = captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str())
        .unwrap_or_default();

    if value.is_empty() {
        return Err(ConnectionSetupError::TokenNotFound);
    }

    Ok(CsrfToken(value.to_string()))
}
