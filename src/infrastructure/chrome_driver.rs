//! 基于 chromiumoxide 的浏览器驱动
//!
//! 查询类操作（存在、可见、下拉框取值）走 JS，点击 / 输入 / 截图走原生 CDP 命令

use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::element::Element;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Browser;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, BrowserError};
use crate::infrastructure::driver::BrowserDriver;
use crate::infrastructure::js_executor::JsExecutor;

/// chromiumoxide 驱动
pub struct ChromeDriver {
    executor: JsExecutor,
    /// 自己启动的浏览器，关闭会话时一起退出；连接到已有浏览器时为 `None`
    browser: Mutex<Option<Browser>>,
}

impl ChromeDriver {
    /// # 参数
    /// - `browser`: 由本程序启动的浏览器，会在 `close()` 时关闭
    /// - `executor`: 持有下单页面的 JS 执行器
    pub fn launched(browser: Browser, executor: JsExecutor) -> Self {
        Self {
            executor,
            browser: Mutex::new(Some(browser)),
        }
    }

    /// 连接到已有浏览器，`close()` 只关闭页面
    pub fn attached(executor: JsExecutor) -> Self {
        Self {
            executor,
            browser: Mutex::new(None),
        }
    }

    async fn find(&self, selector: &str) -> AppResult<Element> {
        self.executor
            .page()
            .find_element(selector)
            .await
            .map_err(|e| {
                debug!("查找元素 {} 失败: {}", selector, e);
                AppError::element_not_found(selector)
            })
    }
}

#[async_trait]
impl BrowserDriver for ChromeDriver {
    async fn goto(&self, url: &str) -> AppResult<()> {
        self.executor.page().goto(url).await.map_err(|e| {
            AppError::Browser(BrowserError::NavigationFailed {
                url: url.to_string(),
                source: Box::new(e),
            })
        })?;
        Ok(())
    }

    async fn is_present(&self, selector: &str) -> AppResult<bool> {
        let found: Option<bool> = self.executor.with_element(selector, "return true;").await?;
        Ok(found.unwrap_or(false))
    }

    async fn is_visible(&self, selector: &str) -> AppResult<bool> {
        let visible: Option<bool> = self
            .executor
            .with_element(
                selector,
                r#"
                const style = window.getComputedStyle(el);
                if (style.display === 'none' || style.visibility === 'hidden') {
                    return false;
                }
                return !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);
                "#,
            )
            .await?;
        Ok(visible.unwrap_or(false))
    }

    async fn click(&self, selector: &str) -> AppResult<()> {
        self.find(selector).await?.click().await?;
        Ok(())
    }

    async fn select_by_value(&self, selector: &str, value: &str) -> AppResult<()> {
        // React 受控组件需要走原生 setter 并派发 change 事件
        let body = format!(
            r#"
            const setter = Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, 'value').set;
            setter.call(el, {});
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return el.value;
            "#,
            serde_json::to_string(value)?
        );
        let selected: Option<String> = self.executor.with_element(selector, &body).await?;
        match selected {
            None => Err(AppError::element_not_found(selector)),
            Some(actual) if actual != value => {
                warn!("下拉框 {} 中没有值为 {} 的选项", selector, value);
                Err(AppError::element_not_found(format!(
                    "{} option[value={}]",
                    selector, value
                )))
            }
            Some(_) => Ok(()),
        }
    }

    async fn input_text(&self, selector: &str, text: &str) -> AppResult<()> {
        let cleared: Option<bool> = self
            .executor
            .with_element(
                selector,
                r#"
                const setter = Object.getOwnPropertyDescriptor(HTMLInputElement.prototype, 'value').set;
                setter.call(el, '');
                el.dispatchEvent(new Event('input', { bubbles: true }));
                return true;
                "#,
            )
            .await?;
        if cleared.is_none() {
            return Err(AppError::element_not_found(selector));
        }
        self.find(selector).await?.click().await?.type_str(text).await?;
        Ok(())
    }

    async fn scroll_into_view(&self, selector: &str) -> AppResult<()> {
        self.find(selector).await?.scroll_into_view().await?;
        Ok(())
    }

    async fn capture_page_screenshot(&self, path: &Path) -> AppResult<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        self.executor.page().save_screenshot(params, path).await?;
        Ok(())
    }

    async fn capture_element_screenshot(&self, selector: &str, path: &Path) -> AppResult<()> {
        self.find(selector)
            .await?
            .save_screenshot(CaptureScreenshotFormat::Png, path)
            .await?;
        Ok(())
    }

    async fn outer_html(&self, selector: &str) -> AppResult<Option<String>> {
        self.executor
            .with_element(selector, "return el.outerHTML;")
            .await
    }

    async fn close(&self) -> AppResult<()> {
        let mut guard = self.browser.lock().await;
        match guard.take() {
            Some(mut browser) => {
                debug!("正在关闭浏览器");
                browser.close().await?;
                if let Err(e) = browser.wait().await {
                    warn!("等待浏览器进程退出失败: {}", e);
                }
            }
            None => {
                debug!("正在关闭页面（保留已连接的浏览器）");
                self.executor.page().clone().close().await?;
            }
        }
        Ok(())
    }
}
