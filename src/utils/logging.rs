//! 日志工具模块
//!
//! 提供运行横幅、订单进度和最终统计的输出

use tracing::info;

use crate::config::Config;
use crate::orchestrator::WorkflowReport;
use crate::workflow::OrderCtx;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    let policy = config.submit_policy();
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - 机器人订单自动提交 ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 下单页面: {}", config.order_page_url);
    info!("📁 输出目录: {}", config.output_dir);
    match policy.max_attempts {
        Some(max) => info!("🔁 单个订单最多提交 {} 次", max),
        None => info!("🔁 单个订单提交次数不限"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录订单加载信息
pub fn log_orders_loaded(total: usize) {
    info!("✓ 找到 {} 个待处理的订单", total);
    info!("💡 订单将按文件顺序逐个处理\n");
}

/// 记录单个订单开始
pub fn log_order_start(ctx: &OrderCtx, address: &str) {
    info!("\n{} {}", ctx, "─".repeat(30));
    info!("{} 收货地址: {}", ctx, truncate_text(address, 40));
}

/// 打印最终统计信息
pub fn print_final_stats(report: &WorkflowReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 完成订单: {}", report.artifacts.len());
    info!(
        "🔁 提交次数: {} (被拒绝 {} 次)",
        report.total_attempts,
        report.rejected_attempts()
    );
    info!(
        "📦 回执压缩包: {} ({} 个文件)",
        report.archives.pdf_archive.display(),
        report.archives.pdf_count
    );
    info!(
        "📦 截图压缩包: {} ({} 个文件)",
        report.archives.image_archive.display(),
        report.archives.image_count
    );
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
