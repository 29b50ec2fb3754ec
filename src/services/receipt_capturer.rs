//! 回执采集 - 业务能力层
//!
//! 对一个已确认的订单：截取机器人预览图、把确认页 HTML 渲染成 PDF、
//! 点击"再下一单"、最后把截图叠加到 PDF 上

use std::sync::Arc;

use tokio::time::sleep;
use tracing::info;

use crate::config::Timings;
use crate::error::{AppError, AppResult, CaptureError};
use crate::infrastructure::{BrowserDriver, PdfToolkit};
use crate::models::{OrderRecord, OutputLayout, ReceiptArtifacts, Selectors};
use crate::workflow::OrderCtx;

/// 回执采集服务
pub struct ReceiptCapturer {
    driver: Arc<dyn BrowserDriver>,
    pdf: Arc<dyn PdfToolkit>,
    selectors: Selectors,
    layout: OutputLayout,
    timings: Timings,
}

impl ReceiptCapturer {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        pdf: Arc<dyn PdfToolkit>,
        selectors: Selectors,
        layout: OutputLayout,
        timings: Timings,
    ) -> Self {
        Self {
            driver,
            pdf,
            selectors,
            layout,
            timings,
        }
    }

    /// 生成并合并单个订单的截图和 PDF 回执
    ///
    /// "再下一单"会离开确认页，所以必须在 PDF 渲染之后点击
    pub async fn capture(
        &self,
        order: &OrderRecord,
        ctx: &OrderCtx,
    ) -> AppResult<ReceiptArtifacts> {
        let s = &self.selectors;
        let screenshot_path = self.layout.robot_image(&order.order_number);
        let receipt_pdf_path = self.layout.receipt_pdf(&order.order_number);

        // 等待预览图渲染完成
        sleep(self.timings.render_delay).await;
        if !self.driver.is_present(&s.preview_image).await? {
            return Err(self.missing(order, "机器人预览图", &s.preview_image));
        }
        self.driver
            .capture_element_screenshot(&s.preview_image, &screenshot_path)
            .await?;
        info!("{} ✓ 已截取机器人预览图", ctx);

        let receipt_html = self
            .driver
            .outer_html(&s.confirmation)
            .await?
            .ok_or_else(|| self.missing(order, "订单确认区域", &s.confirmation))?;
        self.pdf.html_to_pdf(&receipt_html, &receipt_pdf_path).await?;
        info!("{} ✓ 回执已保存为 PDF", ctx);

        self.driver.click(&s.order_another_button).await?;
        info!("{} ✓ 已返回下单页", ctx);

        self.pdf
            .overlay_image(&receipt_pdf_path, &screenshot_path)
            .await?;
        info!("{} ✓ 截图已嵌入 PDF", ctx);

        Ok(ReceiptArtifacts {
            order_number: order.order_number.clone(),
            screenshot_path,
            receipt_pdf_path,
        })
    }

    fn missing(&self, order: &OrderRecord, role: &'static str, selector: &str) -> AppError {
        CaptureError::ElementMissing {
            order_number: order.order_number.clone(),
            role,
            selector: selector.to_string(),
        }
        .into()
    }
}
