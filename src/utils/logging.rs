/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use crate::config::Config;
use crate::orchestrator::RunSummary;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// `RUST_LOG` 优先；否则根据 `verbose` 使用 `debug` 或 `info`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - Swiggy 订单历史导出");
    info!("🌐 站点: {}", config.base_url);
    info!("📁 输出目录: {}", config.output_dir);
    info!("{}", "=".repeat(60));
}

/// 打印本次运行的统计信息
pub fn print_run_summary(summary: &RunSummary) {
    info!("\n{}", "=".repeat(60));
    info!("📊 运行 {} 完成", summary.run_id);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📦 订单总数(服务端): {}", summary.total_orders);
    info!(
        "📄 已获取页数: {}/{}",
        summary.pages_fetched, summary.pages_planned
    );
    info!("✅ 已送达订单: {}", summary.orders);
    info!("🍽️ 菜品条目: {}", summary.items);
    match &summary.exported {
        Some(files) => {
            info!("💾 订单文件: {}", files.orders_csv.display());
            info!("💾 菜品文件: {}", files.items_csv.display());
        }
        None => info!("💾 未生成文件"),
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("abc", 5), "abc");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("订单历史导出", 2), "订单...");
    }
}
