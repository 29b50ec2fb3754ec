//! # Robot Order Submit
//!
//! 一个用于机器人商店自动下单的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page、HTTP 客户端），只暴露能力
//! - `BrowserDriver` / `ChromeDriver` - 页面操作能力
//! - `PdfToolkit` - HTML 转 PDF、截图叠加
//! - `Downloader` / `Archiver` - 下载订单文件、写压缩包
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个订单
//! - `OrderSource` - 下载并解析订单文件
//! - `FormSubmitter` - 填表并提交，被拒绝时重试
//! - `ReceiptCapturer` - 截图 + PDF 回执
//! - `ArchiveBuilder` - 打包回执和截图
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个订单"的完整处理流程
//! - `OrderCtx` - 上下文封装（订单号 + 序号）
//! - `OrderFlow` - 流程编排（submit → capture）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 应用入口，管理浏览器会话
//! - `orchestrator/order_workflow` - 整批订单的处理和打包
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod test_support;

// 重新导出常用类型
pub use browser::{open_session, BrowserSession};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{OrderRecord, ReceiptArtifacts};
pub use orchestrator::{App, OrderWorkflow, WorkflowReport};
pub use workflow::{OrderCtx, OrderFlow};
