//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：打印启动信息、打开浏览器会话、组装各层能力
//! 2. **运行**：委托 `OrderWorkflow` 处理整批订单
//! 3. **资源管理**：连接模式下持有用户的浏览器，结束时只关闭自己开的页面
//! 4. **全局统计**：输出本次运行的汇总

use std::sync::Arc;

use anyhow::{Context, Result};
use chromiumoxide::{Browser, Page};
use tracing::{info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::{
    ChromeDriver, ChromePdfToolkit, HttpDownloader, JsExecutor, ZipArchiver,
};
use crate::orchestrator::order_workflow::{Collaborators, OrderWorkflow, WorkflowReport};
use crate::utils::logging::{log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    workflow: OrderWorkflow,
    /// 连接模式下借用的浏览器，保持连接直到运行结束
    attached: Option<(Browser, Page)>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let session = browser::open_session(&config)
            .await
            .context("打开浏览器会话失败")?;

        let executor = JsExecutor::new(session.page);
        let pdf = Arc::new(ChromePdfToolkit::new(session.render_page.clone()));
        let (driver, attached) = if session.owned {
            (ChromeDriver::launched(session.browser, executor), None)
        } else {
            (
                ChromeDriver::attached(executor),
                Some((session.browser, session.render_page)),
            )
        };

        let workflow = OrderWorkflow::new(
            &config,
            Collaborators {
                driver: Arc::new(driver),
                pdf,
                downloader: Arc::new(HttpDownloader::new()),
                archiver: Arc::new(ZipArchiver),
            },
        );

        Ok(Self { workflow, attached })
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> Result<WorkflowReport> {
        let result = self.workflow.run().await;

        if let Some((_browser, render_page)) = self.attached {
            if let Err(e) = render_page.close().await {
                warn!("⚠️ 关闭回执渲染页失败: {}", e);
            }
        }

        let report = result.context("订单处理失败")?;
        print_final_stats(&report);
        info!("🎉 全部订单已完成");
        Ok(report)
    }
}
