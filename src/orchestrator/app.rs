//! 应用主流程 - 编排层
//!
//! 1. **初始化**：创建会话并建立连接，失败直接终止（不进入任何输入环节）
//! 2. **登录**：请求 OTP、校验 OTP，可恢复的错误会重新询问输入
//! 3. **获取**：分页获取全部订单，失败时保留已获取部分
//! 4. **导出**：缓存结果、打印预览、写出 CSV

use crate::clients::SwiggyClient;
use crate::config::Config;
use crate::error::{AppError, LoginError};
use crate::infrastructure::{HttpSession, SessionTokens};
use crate::presentation::{ExportPresenter, ExportedFiles, LoginPrompt, RunId};
use crate::services::{OrderPaginator, OtpLogin, PaginationOutcome, StopReason};
use crate::utils::logging::{log_startup, print_run_summary};
use anyhow::Result;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    client: SwiggyClient,
    tokens: SessionTokens,
    presenter: ExportPresenter,
}

/// 一次运行的统计
#[derive(Debug)]
pub struct RunSummary {
    pub run_id: RunId,
    pub total_orders: u64,
    pub pages_planned: u64,
    pub pages_fetched: u64,
    pub orders: usize,
    pub items: usize,
    pub stop: StopReason,
    pub exported: Option<ExportedFiles>,
}

impl App {
    /// 初始化应用：建立连接失败是致命错误
    pub async fn initialize(config: Config) -> Result<Self, AppError> {
        log_startup(&config);

        let session = HttpSession::new(&config)?;
        let tokens = session.establish().await?;
        let presenter = ExportPresenter::new(&config);

        Ok(Self {
            config,
            client: SwiggyClient::new(session),
            tokens,
            presenter,
        })
    }

    pub fn presenter(&self) -> &ExportPresenter {
        &self.presenter
    }

    /// 运行应用主逻辑
    pub async fn run<P: LoginPrompt>(&mut self, prompt: &mut P) -> Result<RunSummary> {
        self.login(prompt).await?;

        let paginator = OrderPaginator::new(&self.config);
        let outcome = paginator
            .run(&self.client, |progress| {
                info!(
                    "📄 第 {}/{} 页完成，已获取 {} 个已送达订单",
                    progress.page, progress.pages, progress.orders_so_far
                );
            })
            .await;

        if let Some(err) = outcome.error() {
            error!("⚠️ 订单获取中止，将导出已获取的部分: {}", err);
        }

        let PaginationOutcome {
            tables,
            total_orders,
            pages_planned,
            pages_fetched,
            stop,
        } = outcome;
        let (orders, items) = (tables.orders.len(), tables.items.len());

        let run_id = RunId::now();
        self.presenter.store(run_id.clone(), tables);

        let exported = if orders == 0 {
            info!("ℹ️ 没有已送达的订单，不生成文件");
            None
        } else {
            println!("{}", self.presenter.render_preview(&run_id)?);
            Some(self.presenter.export(&run_id)?)
        };

        let summary = RunSummary {
            run_id,
            total_orders,
            pages_planned,
            pages_fetched,
            orders,
            items,
            stop,
            exported,
        };
        print_run_summary(&summary);

        Ok(summary)
    }

    /// OTP 登录，每一步最多尝试 `max_login_attempts` 次
    async fn login<P: LoginPrompt>(&self, prompt: &mut P) -> Result<()> {
        let max_attempts = self.config.max_login_attempts.max(1);
        let mut login = OtpLogin::new(&self.client, &self.tokens);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let mobile = prompt.phone_number()?;
            match login.request_otp(&mobile).await {
                Ok(()) => break,
                Err(e) => retry_or_abort(prompt, e, "请求 OTP", attempt, max_attempts)?,
            }
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            let otp = prompt.otp()?;
            match login.verify_otp(&otp).await {
                Ok(()) => break,
                Err(e) => retry_or_abort(prompt, e, "校验 OTP", attempt, max_attempts)?,
            }
        }

        Ok(())
    }
}

/// 可恢复的错误在次数未用尽且用户同意时返回 `Ok`，继续下一次尝试
fn retry_or_abort<P: LoginPrompt>(
    prompt: &mut P,
    err: LoginError,
    step: &'static str,
    attempt: usize,
    max_attempts: usize,
) -> Result<()> {
    if !err.is_recoverable() {
        return Err(AppError::from(err).into());
    }

    warn!("⚠️ {} 失败 ({}/{}): {}", step, attempt, max_attempts, err);
    if attempt >= max_attempts {
        return Err(AppError::from(LoginError::AttemptsExhausted {
            step,
            attempts: attempt,
        })
        .into());
    }

    if !prompt.confirm_retry(&err.to_string())? {
        return Err(AppError::from(err).into());
    }
    Ok(())
}
