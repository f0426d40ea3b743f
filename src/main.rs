use anyhow::Result;
use swiggy_order_export::utils::logging;
use swiggy_order_export::{App, Config, TerminalPrompt};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 建立连接并运行
    let mut app = App::initialize(config).await?;
    app.run(&mut TerminalPrompt).await?;

    Ok(())
}
