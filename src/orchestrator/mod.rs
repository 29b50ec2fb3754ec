//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整批订单的调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 应用入口
//! - 管理应用生命周期（初始化、运行、清理）
//! - 打开浏览器会话，组装基础设施
//! - 输出全局统计信息
//!
//! ### `order_workflow` - 订单工作流
//! - 下载订单文件，按顺序逐个下单
//! - 创建并复用 OrderFlow
//! - 打包本次运行产生的回执和截图
//! - 保证浏览器会话只关闭一次
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (App：资源和生命周期)
//!     ↓
//! order_workflow (处理 Vec<OrderRecord>)
//!     ↓
//! workflow::OrderFlow (处理单个订单)
//!     ↓
//! services (能力层：submit / capture / archive)
//!     ↓
//! infrastructure (基础设施：BrowserDriver / PdfToolkit / Archiver)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：App 管资源，OrderWorkflow 管流程
//! 2. **资源隔离**：只有编排层接触 Browser 和 Page
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_processor;
pub mod order_workflow;

// 重新导出主要类型
pub use batch_processor::App;
pub use order_workflow::{Collaborators, OrderWorkflow, WorkflowReport};
