//! # Swiggy Order Export
//!
//! 通过 OTP 登录 Swiggy，分页获取订单历史，导出为 `orders.csv` 和 `items.csv`
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有唯一的 HTTP 会话，只暴露能力
//! - `HttpSession` - 建立连接、刷新 csrfToken
//!
//! ### ② 接口层（Clients）
//! - `clients/` - `SwiggyClient`，OTP 发送 / 校验、订单列表
//!
//! ### ③ 业务能力层（Services）
//! - `OtpLogin` - 登录状态机
//! - `OrderPaginator` - 游标分页、连接错误重试、请求间隔
//! - `order_extractor` - 已送达订单与菜品的抽取
//!
//! ### ④ 编排层（Orchestration）与展示层（Presentation）
//! - `orchestrator/app` - 一次运行的完整流程
//! - `presentation/` - 终端输入、预览、CSV 导出，按运行 ID 缓存结果
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod presentation;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::SwiggyClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::HttpSession;
pub use models::{Item, Order, OrderTables};
pub use orchestrator::{App, RunSummary};
pub use presentation::{ExportPresenter, LoginPrompt, RunId, TerminalPrompt};
pub use services::{extract, OrderPaginator, OtpLogin};
