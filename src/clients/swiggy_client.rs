/// Swiggy API 客户端
///
/// 封装 OTP 发送、OTP 校验、订单列表三个接口
use crate::error::FetchError;
use crate::infrastructure::{CsrfToken, HttpSession};
use crate::models::{OrderId, OrdersPage, OrdersResponse};
use crate::services::order_paginator::OrderPageSource;
use crate::utils::logging::truncate_text;
use serde_json::json;
use tracing::debug;

pub const SEND_OTP_PATH: &str = "/dapi/auth/sms-otp";
pub const VERIFY_OTP_PATH: &str = "/dapi/auth/otp-verify";
pub const ORDERS_PATH: &str = "/dapi/order/all";

/// 接口拒绝请求时返回的纯文本响应体
pub const INVALID_REQUEST_SENTINEL: &str = "Invalid Request";

/// 登录类接口的原始响应
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    /// 响应体是否为 "Invalid Request"
    pub fn is_invalid_request(&self) -> bool {
        self.body.trim() == INVALID_REQUEST_SENTINEL
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Swiggy 客户端
pub struct SwiggyClient {
    session: HttpSession,
}

impl SwiggyClient {
    /// 创建新的客户端，持有会话
    pub fn new(session: HttpSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &HttpSession {
        &self.session
    }

    /// 向手机号发送 OTP
    ///
    /// # 参数
    /// - `mobile`: 注册手机号
    /// - `token`: 当前 csrfToken
    pub async fn send_otp(&self, mobile: &str, token: &CsrfToken) -> Result<ApiReply, reqwest::Error> {
        let payload = json!({
            "mobile": mobile,
            "_csrf": token.as_str(),
        });
        self.post_json(SEND_OTP_PATH, &payload).await
    }

    /// 提交 OTP 完成登录
    ///
    /// # 参数
    /// - `otp`: 用户输入的 OTP
    /// - `token`: 刷新后的 csrfToken
    pub async fn verify_otp(&self, otp: &str, token: &CsrfToken) -> Result<ApiReply, reqwest::Error> {
        let payload = json!({
            "otp": otp,
            "_csrf": token.as_str(),
        });
        self.post_json(VERIFY_OTP_PATH, &payload).await
    }

    /// 获取一页订单
    ///
    /// # 参数
    /// - `cursor`: 上一页最后一个订单号，第一页传 `None`
    pub async fn fetch_orders_page(&self, cursor: Option<&OrderId>) -> Result<OrdersPage, FetchError> {
        let endpoint = self.session.url(ORDERS_PATH);

        let mut request = self.session.client().get(&endpoint);
        if let Some(cursor) = cursor {
            request = request.query(&[("order_id", cursor.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&endpoint, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(&endpoint, e))?;

        debug!(
            "订单接口 cursor={:?} 状态码={} 响应: {}",
            cursor.map(OrderId::as_str),
            status,
            truncate_text(&body, 200)
        );

        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let parsed: OrdersResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
                endpoint: endpoint.clone(),
                body: truncate_text(&body, 200),
                source: Box::new(e),
            })?;

        parsed
            .into_page()
            .ok_or(FetchError::MissingData { endpoint })
    }

    async fn post_json(&self, path: &str, payload: &serde_json::Value) -> Result<ApiReply, reqwest::Error> {
        let url = self.session.url(path);
        let response = self.session.client().post(&url).json(payload).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("{} 状态码={} 响应: {}", path, status, truncate_text(&body, 200));

        Ok(ApiReply { status, body })
    }
}

impl OrderPageSource for SwiggyClient {
    async fn fetch_page(&self, cursor: Option<&OrderId>) -> Result<OrdersPage, FetchError> {
        self.fetch_orders_page(cursor).await
    }
}
