//! OTP 登录 - 业务能力层
//!
//! 状态机：`Unauthenticated → OtpRequested → Verified`，
//! 响应异常时进入 `Failed`（终止状态，需要重新开始整个流程）。
//!
//! csrfToken 是一次性的：每次 POST 都消耗当前令牌，下一次请求前从首页重新获取。

use crate::clients::{ApiReply, SwiggyClient};
use crate::error::LoginError;
use crate::infrastructure::{CsrfToken, SessionTokens};
use tracing::{debug, info, warn};

/// 登录状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    Unauthenticated,
    OtpRequested { mobile: String },
    Verified,
    Failed { reason: String },
}

impl LoginState {
    pub fn name(&self) -> &'static str {
        match self {
            LoginState::Unauthenticated => "Unauthenticated",
            LoginState::OtpRequested { .. } => "OtpRequested",
            LoginState::Verified => "Verified",
            LoginState::Failed { .. } => "Failed",
        }
    }
}

/// OTP 登录流程
pub struct OtpLogin<'a> {
    client: &'a SwiggyClient,
    token: Option<CsrfToken>,
    state: LoginState,
}

impl<'a> OtpLogin<'a> {
    /// 用建立连接时拿到的令牌开始登录
    pub fn new(client: &'a SwiggyClient, tokens: &SessionTokens) -> Self {
        Self {
            client,
            token: Some(tokens.csrf_token.clone()),
            state: LoginState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    pub fn is_verified(&self) -> bool {
        self.state == LoginState::Verified
    }

    /// 向手机号发送 OTP
    ///
    /// 允许在 `Unauthenticated` 或 `OtpRequested`（重新发送）状态下调用
    pub async fn request_otp(&mut self, mobile: &str) -> Result<(), LoginError> {
        match self.state {
            LoginState::Unauthenticated | LoginState::OtpRequested { .. } => {}
            _ => return Err(self.invalid_state("request_otp")),
        }

        let mobile = validate_mobile(mobile)?;
        let token = self.take_token().await?;

        info!("📨 正在为 {} 请求 OTP...", mobile);
        let reply = match self.client.send_otp(&mobile, &token).await {
            Ok(reply) => reply,
            Err(e) => return Err(self.fail(format!("发送 OTP 请求失败: {}", e))),
        };

        if let Some(reason) = rejection(&reply, false) {
            warn!("⚠️ Swiggy 拒绝发送 OTP: {}", reason);
            return Err(LoginError::OtpSend { reason });
        }

        info!("✓ OTP 已发送");
        self.state = LoginState::OtpRequested { mobile };
        Ok(())
    }

    /// 提交 OTP
    ///
    /// 只能在 `OtpRequested` 状态下调用；校验失败后状态不变，可以重新输入
    pub async fn verify_otp(&mut self, otp: &str) -> Result<(), LoginError> {
        if !matches!(self.state, LoginState::OtpRequested { .. }) {
            return Err(self.invalid_state("verify_otp"));
        }

        let otp = validate_otp(otp)?;
        let token = self.take_token().await?;

        info!("🔐 正在校验 OTP...");
        let reply = match self.client.verify_otp(otp, &token).await {
            Ok(reply) => reply,
            Err(e) => return Err(self.fail(format!("校验 OTP 请求失败: {}", e))),
        };

        if let Some(reason) = rejection(&reply, true) {
            warn!("⚠️ OTP 校验未通过: {}", reason);
            return Err(LoginError::OtpVerify { reason });
        }

        info!("✓ 登录成功");
        self.state = LoginState::Verified;
        Ok(())
    }

    /// 取出可用的令牌；已被消耗时从首页刷新
    async fn take_token(&mut self) -> Result<CsrfToken, LoginError> {
        if let Some(token) = self.token.take() {
            return Ok(token);
        }

        debug!("令牌已使用，重新获取");
        match self.client.session().refresh_token().await {
            Ok(token) => Ok(token),
            Err(e) => Err(self.fail(format!("刷新 csrfToken 失败: {}", e))),
        }
    }

    fn fail(&mut self, reason: String) -> LoginError {
        warn!("❌ 登录流程终止: {}", reason);
        self.state = LoginState::Failed {
            reason: reason.clone(),
        };
        LoginError::Failed { reason }
    }

    fn invalid_state(&self, operation: &'static str) -> LoginError {
        LoginError::InvalidState {
            operation,
            actual: self.state.name(),
        }
    }
}

/// 判断登录类接口是否拒绝了请求
///
/// `strict_ok` 为 true 时只接受 200
fn rejection(reply: &ApiReply, strict_ok: bool) -> Option<String> {
    if reply.is_invalid_request() {
        return Some("Invalid Request".to_string());
    }
    let accepted = if strict_ok {
        reply.status == 200
    } else {
        reply.is_success()
    };
    if !accepted {
        return Some(format!("状态码 {}", reply.status));
    }
    None
}

/// 手机号：去掉首尾空白，可带前导 `+`，其余必须是数字
fn validate_mobile(mobile: &str) -> Result<String, LoginError> {
    let trimmed = mobile.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(LoginError::InvalidPhone {
            phone: mobile.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn validate_otp(otp: &str) -> Result<&str, LoginError> {
    let trimmed = otp.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(LoginError::InvalidOtp);
    }
    Ok(trimmed)
}
