//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 把一次运行串起来：建立连接 → OTP 登录 → 分页获取 → 抽取 → 预览与导出。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (一次运行)
//!     ↓
//! services (能力层：otp_login / order_paginator / order_extractor)
//!     ↓
//! clients::SwiggyClient (接口调用)
//!     ↓
//! infrastructure::HttpSession (唯一的 HTTP 会话)
//! ```
//!
//! 结果表由 App 显式交给 presentation 层缓存，不使用全局状态。

pub mod app;

pub use app::{App, RunSummary};
