//! 浏览器驱动接口
//!
//! 业务层只通过这个接口操作页面，不直接接触 chromiumoxide

use std::path::Path;

use async_trait::async_trait;

use crate::error::AppResult;

/// 浏览器驱动
///
/// 所有方法都以 CSS 选择器定位元素。一个实例对应一个浏览器会话，
/// 整个运行期间只被顺序调用。
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// 打开指定页面
    async fn goto(&self, url: &str) -> AppResult<()>;

    /// 元素是否存在于 DOM 中
    async fn is_present(&self, selector: &str) -> AppResult<bool>;

    /// 元素是否存在且可见
    async fn is_visible(&self, selector: &str) -> AppResult<bool>;

    async fn click(&self, selector: &str) -> AppResult<()>;

    /// 按 value 选择下拉框选项
    async fn select_by_value(&self, selector: &str, value: &str) -> AppResult<()>;

    /// 清空输入框后输入文本
    async fn input_text(&self, selector: &str, text: &str) -> AppResult<()>;

    async fn scroll_into_view(&self, selector: &str) -> AppResult<()>;

    /// 整页截图
    async fn capture_page_screenshot(&self, path: &Path) -> AppResult<()>;

    /// 单个元素截图
    async fn capture_element_screenshot(&self, selector: &str, path: &Path) -> AppResult<()>;

    /// 元素的 outerHTML，元素不存在时返回 `None`
    async fn outer_html(&self, selector: &str) -> AppResult<Option<String>>;

    /// 结束浏览器会话
    async fn close(&self) -> AppResult<()>;
}
