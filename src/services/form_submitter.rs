//! 表单提交 - 业务能力层
//!
//! 把一个订单变成"已确认"状态。商店偶尔会拒绝提交（页面出现错误提示而不是确认页），
//! 此时保留已填写的表单直接再次提交。
//!
//! 状态流转：
//!
//! ```text
//! Filling → Submitted → Confirmed
//!              ↑   ↓
//!             Rejected
//! ```

use std::sync::Arc;

use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::{SubmitPolicy, Timings};
use crate::error::{AppResult, SubmitError};
use crate::infrastructure::BrowserDriver;
use crate::models::{Confirmation, OrderRecord, OutputLayout, Selectors, SubmissionOutcome};
use crate::workflow::OrderCtx;

/// 提交状态机的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitState {
    /// 关闭弹窗并填写表单
    Filling,
    /// 第 `attempt` 次点击提交
    Submitted { attempt: u32 },
    /// 第 `attempt` 次提交被拒绝
    Rejected { attempt: u32 },
}

/// 表单提交服务
pub struct FormSubmitter {
    driver: Arc<dyn BrowserDriver>,
    selectors: Selectors,
    layout: OutputLayout,
    timings: Timings,
    policy: SubmitPolicy,
}

impl FormSubmitter {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        selectors: Selectors,
        layout: OutputLayout,
        timings: Timings,
        policy: SubmitPolicy,
    ) -> Self {
        Self {
            driver,
            selectors,
            layout,
            timings,
            policy,
        }
    }

    /// 填写并提交订单，直到出现确认页
    ///
    /// `policy.max_attempts` 为 `None` 时一直重试；否则在达到上限后返回
    /// `SubmitError::RetryExhausted`
    pub async fn submit(&self, order: &OrderRecord, ctx: &OrderCtx) -> AppResult<Confirmation> {
        let mut state = SubmitState::Filling;
        loop {
            state = match state {
                SubmitState::Filling => {
                    self.dismiss_modal(ctx).await?;
                    self.fill_form(order).await?;
                    info!("{} ✓ 表单已填写", ctx);
                    SubmitState::Submitted { attempt: 1 }
                }
                SubmitState::Submitted { attempt } => {
                    match self.submit_once(order, attempt).await? {
                        SubmissionOutcome::Confirmed => {
                            info!("{} ✓ 订单已确认 (第 {} 次提交)", ctx, attempt);
                            return Ok(Confirmation {
                                order_number: order.order_number.clone(),
                                attempts: attempt,
                            });
                        }
                        SubmissionOutcome::Rejected => SubmitState::Rejected { attempt },
                    }
                }
                SubmitState::Rejected { attempt } => {
                    if let Some(max) = self.policy.max_attempts {
                        if attempt >= max {
                            warn!("{} ❌ 已提交 {} 次仍被拒绝，放弃", ctx, attempt);
                            return Err(SubmitError::RetryExhausted {
                                order_number: order.order_number.clone(),
                                attempts: attempt,
                            }
                            .into());
                        }
                    }
                    warn!("{} ⚠️ 第 {} 次提交被拒绝，重新提交", ctx, attempt);
                    if !self.policy.backoff.is_zero() {
                        sleep(self.policy.backoff).await;
                    }
                    SubmitState::Submitted {
                        attempt: attempt + 1,
                    }
                }
            };
        }
    }

    /// 关闭 cookie 弹窗
    ///
    /// 在 `modal_wait` 内等待关闭按钮出现，出现才点击，没出现就跳过
    async fn dismiss_modal(&self, ctx: &OrderCtx) -> AppResult<()> {
        if self
            .wait_for(&self.selectors.modal_dismiss, self.timings.modal_wait)
            .await?
        {
            self.driver.click(&self.selectors.modal_dismiss).await?;
            info!("{} ✓ 已关闭弹窗", ctx);
        } else {
            debug!("{} 没有弹窗", ctx);
        }
        Ok(())
    }

    async fn fill_form(&self, order: &OrderRecord) -> AppResult<()> {
        let s = &self.selectors;
        self.driver
            .select_by_value(&s.head_select, &order.head_id)
            .await?;
        self.driver.click(&s.body_option(&order.body_id)).await?;
        self.driver
            .input_text(&s.legs_input, &order.legs_part_number)
            .await?;
        self.driver.input_text(&s.address_input, &order.address).await?;
        Ok(())
    }

    /// 截图 → 滚动到提交按钮 → 点击 → 检查错误提示
    async fn submit_once(&self, order: &OrderRecord, attempt: u32) -> AppResult<SubmissionOutcome> {
        let s = &self.selectors;
        let diagnostic = self.layout.diagnostic_screenshot(&order.order_number);
        self.driver.capture_page_screenshot(&diagnostic).await?;

        if self.driver.is_present(&s.submit_button).await? {
            self.driver.scroll_into_view(&s.submit_button).await?;
        }
        self.driver.click(&s.submit_button).await?;
        debug!("订单 {} 第 {} 次点击提交", order.order_number, attempt);

        if self.driver.is_visible(&s.error_banner).await? {
            Ok(SubmissionOutcome::Rejected)
        } else {
            Ok(SubmissionOutcome::Confirmed)
        }
    }

    /// 在 `timeout` 内轮询元素是否出现
    async fn wait_for(&self, selector: &str, timeout: Duration) -> AppResult<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.driver.is_present(selector).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(self.timings.poll_interval).await;
        }
    }
}
