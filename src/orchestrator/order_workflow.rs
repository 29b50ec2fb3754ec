//! 订单工作流 - 编排层
//!
//! ## 职责
//!
//! 1. **准备输出目录**
//! 2. **获取订单**：下载并解析订单文件
//! 3. **逐个下单**：严格按顺序，每个订单 提交 → 采集
//! 4. **打包**：只打包本次运行产生的文件
//! 5. **释放会话**：无论成功还是出错，浏览器会话都只关闭一次
//!
//! 任何一步出错都会中止整个流程，已经生成的产物保留在磁盘上

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{Archiver, BrowserDriver, Downloader, PdfToolkit};
use crate::models::{OutputLayout, ReceiptArtifacts, Selectors};
use crate::services::{
    ArchiveBuilder, ArchiveInput, ArchiveSummary, FormSubmitter, OrderSource, ReceiptCapturer,
};
use crate::utils::logging;
use crate::workflow::{OrderCtx, OrderFlow};

/// 一次运行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    /// 每个订单的产物，按处理顺序
    pub artifacts: Vec<ReceiptArtifacts>,
    /// 所有订单的提交次数之和
    pub total_attempts: u32,
    pub archives: ArchiveSummary,
}

impl WorkflowReport {
    /// 被拒绝的提交次数
    pub fn rejected_attempts(&self) -> u32 {
        self.total_attempts
            .saturating_sub(self.artifacts.len() as u32)
    }
}

/// 外部能力的集合
pub struct Collaborators {
    pub driver: Arc<dyn BrowserDriver>,
    pub pdf: Arc<dyn PdfToolkit>,
    pub downloader: Arc<dyn Downloader>,
    pub archiver: Arc<dyn Archiver>,
}

/// 订单工作流
pub struct OrderWorkflow {
    driver: Arc<dyn BrowserDriver>,
    layout: OutputLayout,
    order_page_url: String,
    source: OrderSource,
    flow: OrderFlow,
    archive_builder: ArchiveBuilder,
}

impl OrderWorkflow {
    /// 按配置组装工作流
    pub fn new(config: &Config, collaborators: Collaborators) -> Self {
        let layout = config.output_layout();
        let selectors = Selectors::default();
        let timings = config.timings();

        let submitter = FormSubmitter::new(
            collaborators.driver.clone(),
            selectors.clone(),
            layout.clone(),
            timings,
            config.submit_policy(),
        );
        let capturer = ReceiptCapturer::new(
            collaborators.driver.clone(),
            collaborators.pdf,
            selectors,
            layout.clone(),
            timings,
        );

        Self {
            driver: collaborators.driver,
            source: OrderSource::new(collaborators.downloader, &config.orders_url, layout.clone()),
            flow: OrderFlow::new(submitter, capturer),
            archive_builder: ArchiveBuilder::new(collaborators.archiver, layout.clone()),
            order_page_url: config.order_page_url.clone(),
            layout,
        }
    }

    /// 运行整个流程，结束时关闭浏览器会话
    pub async fn run(&self) -> AppResult<WorkflowReport> {
        let result = self.run_orders().await;
        let closed = self.driver.close().await;

        match (result, closed) {
            (Ok(report), Ok(())) => {
                info!("✓ 浏览器会话已关闭");
                Ok(report)
            }
            (Ok(_), Err(close_err)) => {
                error!("❌ 关闭浏览器会话失败: {}", close_err);
                Err(close_err)
            }
            (Err(e), Ok(())) => {
                info!("✓ 浏览器会话已关闭");
                Err(e)
            }
            (Err(e), Err(close_err)) => {
                warn!("⚠️ 关闭浏览器会话失败: {}", close_err);
                Err(e)
            }
        }
    }

    async fn run_orders(&self) -> AppResult<WorkflowReport> {
        self.layout.prepare().await?;

        let orders = self.source.fetch().await?;
        logging::log_orders_loaded(orders.len());

        self.driver.goto(&self.order_page_url).await?;
        info!("✓ 已打开下单页面: {}", self.order_page_url);

        let total = orders.len();
        let mut artifacts = Vec::with_capacity(total);
        let mut total_attempts = 0;

        for (index, order) in orders.iter().enumerate() {
            let ctx = OrderCtx::new(order, index + 1, total);
            logging::log_order_start(&ctx, &order.address);

            let outcome = self.flow.run(order, &ctx).await.map_err(|e| {
                error!("{} ❌ 处理失败，流程中止: {}", ctx, e);
                e
            })?;
            total_attempts += outcome.attempts;
            artifacts.push(outcome.artifacts);
        }

        info!("\n📦 正在打包回执和截图...");
        let archives = self
            .archive_builder
            .build(ArchiveInput::Artifacts(&artifacts))
            .await?;

        Ok(WorkflowReport {
            artifacts,
            total_attempts,
            archives,
        })
    }
}
