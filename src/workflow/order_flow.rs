//! 订单处理流程 - 流程层
//!
//! 核心职责：定义"一个订单"的完整处理流程
//!
//! 流程顺序：
//! 1. 填写并提交表单（被拒绝时重新提交）
//! 2. 截图 → 回执 PDF → 再下一单 → 截图嵌入 PDF

use tracing::info;

use crate::error::AppResult;
use crate::models::{OrderRecord, ReceiptArtifacts};
use crate::services::{FormSubmitter, ReceiptCapturer};
use crate::workflow::order_ctx::OrderCtx;

/// 单个订单的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOutcome {
    pub artifacts: ReceiptArtifacts,
    /// 提交次数（含成功那一次）
    pub attempts: u32,
}

/// 订单处理流程
///
/// - 编排 提交 → 采集 两个步骤
/// - 不持有浏览器资源，只依赖业务能力（services）
pub struct OrderFlow {
    submitter: FormSubmitter,
    capturer: ReceiptCapturer,
}

impl OrderFlow {
    pub fn new(submitter: FormSubmitter, capturer: ReceiptCapturer) -> Self {
        Self {
            submitter,
            capturer,
        }
    }

    pub async fn run(&self, order: &OrderRecord, ctx: &OrderCtx) -> AppResult<OrderOutcome> {
        info!("{} 📝 开始下单: {}", ctx, order);

        let confirmation = self.submitter.submit(order, ctx).await?;
        let artifacts = self.capturer.capture(order, ctx).await?;

        info!("{} ✅ 订单完成", ctx);
        Ok(OrderOutcome {
            artifacts,
            attempts: confirmation.attempts,
        })
    }
}
