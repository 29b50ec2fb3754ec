//! 浏览器会话
//!
//! 两种方式获得浏览器：
//! - 配置了 `browser_debug_port`：连接到已打开的浏览器
//! - 否则：自己启动一个（默认无头）
//!
//! 每个会话有两个页面，`page` 用来下单，`render_page` 专门把回执渲染成 PDF，
//! 互不干扰

mod connection;
mod headless;

pub use connection::connect_to_browser;
pub use headless::launch_browser;

use chromiumoxide::{Browser, Page};
use tracing::info;

use crate::config::Config;
use crate::error::AppResult;

/// 打开的浏览器会话
pub struct BrowserSession {
    pub browser: Browser,
    /// 浏览器是否由本程序启动；连接模式下关闭会话时不退出用户的浏览器
    pub owned: bool,
    pub page: Page,
    pub render_page: Page,
}

/// 按配置启动或连接浏览器
pub async fn open_session(config: &Config) -> AppResult<BrowserSession> {
    let (browser, page, owned) = match config.browser_debug_port {
        Some(port) => {
            let (browser, page) = connect_to_browser(port).await?;
            (browser, page, false)
        }
        None => {
            let (browser, page) =
                launch_browser(config.headless, config.chrome_executable.as_deref()).await?;
            (browser, page, true)
        }
    };
    let render_page = browser.new_page("about:blank").await?;
    info!("✓ 浏览器会话已就绪 (下单页 + 回执渲染页)");

    Ok(BrowserSession {
        browser,
        owned,
        page,
        render_page,
    })
}
