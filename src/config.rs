use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};
use crate::models::OutputLayout;

/// 默认配置文件路径，可通过 `ROBOT_CONFIG` 覆盖
const DEFAULT_CONFIG_FILE: &str = "robot.toml";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 订单 CSV 的下载地址
    pub orders_url: String,
    /// 下单页面地址
    pub order_page_url: String,
    /// 输出目录
    pub output_dir: String,
    /// 下载后的订单文件名（位于输出目录内）
    pub orders_file: String,
    /// 是否以无头模式启动浏览器
    pub headless: bool,
    /// 浏览器可执行文件路径，为空时由 chromiumoxide 自动查找
    pub chrome_executable: Option<String>,
    /// 已运行浏览器的调试端口，设置后不再启动新浏览器
    pub browser_debug_port: Option<u16>,
    /// 等待 cookie 弹窗出现的最长时间（毫秒）
    pub modal_wait_ms: u64,
    /// 等待确认页图片渲染的时间（毫秒）
    pub render_delay_ms: u64,
    /// 轮询页面元素的间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 单个订单最多提交次数，0 表示不限次数
    pub max_submit_attempts: u32,
    /// 两次提交之间的固定等待（毫秒）
    pub submit_backoff_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            orders_url: "https://robotsparebinindustries.com/orders.csv".to_string(),
            order_page_url: "https://robotsparebinindustries.com/#/robot-order".to_string(),
            output_dir: "output".to_string(),
            orders_file: "orders.csv".to_string(),
            headless: true,
            chrome_executable: None,
            browser_debug_port: None,
            modal_wait_ms: 1000,
            render_delay_ms: 2000,
            poll_interval_ms: 100,
            max_submit_attempts: 20,
            submit_backoff_ms: 500,
            verbose_logging: false,
        }
    }
}

/// 配置文件内容，所有字段可选，缺省时沿用默认值
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    orders_url: Option<String>,
    order_page_url: Option<String>,
    output_dir: Option<String>,
    orders_file: Option<String>,
    headless: Option<bool>,
    chrome_executable: Option<String>,
    browser_debug_port: Option<u16>,
    modal_wait_ms: Option<u64>,
    render_delay_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
    max_submit_attempts: Option<u32>,
    submit_backoff_ms: Option<u64>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 按 默认值 → 配置文件 → 环境变量 的顺序加载配置
    pub fn load() -> AppResult<Self> {
        let path =
            std::env::var("ROBOT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_toml_file(&path)?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件读取配置
    pub fn from_toml_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::AppError::file_read_failed(path, e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            crate::error::AppError::Config(ConfigError::FileParseFailed { source, .. }) => {
                ConfigError::FileParseFailed {
                    path: path.to_string(),
                    source,
                }
                .into()
            }
            other => other,
        })
    }

    /// 从 TOML 文本读取配置
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| ConfigError::FileParseFailed {
            path: String::new(),
            source: Box::new(e),
        })?;
        let default = Self::default();
        Ok(Self {
            orders_url: file.orders_url.unwrap_or(default.orders_url),
            order_page_url: file.order_page_url.unwrap_or(default.order_page_url),
            output_dir: file.output_dir.unwrap_or(default.output_dir),
            orders_file: file.orders_file.unwrap_or(default.orders_file),
            headless: file.headless.unwrap_or(default.headless),
            chrome_executable: file.chrome_executable.or(default.chrome_executable),
            browser_debug_port: file.browser_debug_port.or(default.browser_debug_port),
            modal_wait_ms: file.modal_wait_ms.unwrap_or(default.modal_wait_ms),
            render_delay_ms: file.render_delay_ms.unwrap_or(default.render_delay_ms),
            poll_interval_ms: file.poll_interval_ms.unwrap_or(default.poll_interval_ms),
            max_submit_attempts: file.max_submit_attempts.unwrap_or(default.max_submit_attempts),
            submit_backoff_ms: file.submit_backoff_ms.unwrap_or(default.submit_backoff_ms),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }

    /// 仅使用默认值和环境变量
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 用环境变量覆盖当前配置，无法解析的值保持原样
    pub fn with_env_overrides(self) -> Self {
        Self {
            orders_url: std::env::var("ORDERS_URL").unwrap_or(self.orders_url),
            order_page_url: std::env::var("ORDER_PAGE_URL").unwrap_or(self.order_page_url),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(self.output_dir),
            orders_file: std::env::var("ORDERS_FILE").unwrap_or(self.orders_file),
            headless: env_parse("HEADLESS").unwrap_or(self.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE")
                .ok()
                .or(self.chrome_executable),
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT").or(self.browser_debug_port),
            modal_wait_ms: env_parse("MODAL_WAIT_MS").unwrap_or(self.modal_wait_ms),
            render_delay_ms: env_parse("RENDER_DELAY_MS").unwrap_or(self.render_delay_ms),
            poll_interval_ms: env_parse("POLL_INTERVAL_MS").unwrap_or(self.poll_interval_ms),
            max_submit_attempts: env_parse("MAX_SUBMIT_ATTEMPTS")
                .unwrap_or(self.max_submit_attempts),
            submit_backoff_ms: env_parse("SUBMIT_BACKOFF_MS").unwrap_or(self.submit_backoff_ms),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
        }
    }

    /// 页面等待相关的时间参数
    pub fn timings(&self) -> Timings {
        Timings {
            modal_wait: Duration::from_millis(self.modal_wait_ms),
            render_delay: Duration::from_millis(self.render_delay_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    /// 提交重试策略
    pub fn submit_policy(&self) -> SubmitPolicy {
        SubmitPolicy {
            max_attempts: (self.max_submit_attempts > 0).then_some(self.max_submit_attempts),
            backoff: Duration::from_millis(self.submit_backoff_ms),
        }
    }

    /// 输出目录布局
    pub fn output_layout(&self) -> OutputLayout {
        OutputLayout::new(PathBuf::from(&self.output_dir), &self.orders_file)
    }
}

/// 读取并解析环境变量，不存在或无法解析时返回 `None`
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// 页面等待时间
#[derive(Clone, Copy, Debug)]
pub struct Timings {
    /// cookie 弹窗最长等待时间
    pub modal_wait: Duration,
    /// 确认页图片渲染等待
    pub render_delay: Duration,
    /// 轮询间隔
    pub poll_interval: Duration,
}

impl Timings {
    /// 所有等待都为零，测试用
    pub fn immediate() -> Self {
        Self {
            modal_wait: Duration::ZERO,
            render_delay: Duration::ZERO,
            poll_interval: Duration::ZERO,
        }
    }
}

/// 提交重试策略
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitPolicy {
    /// 最多提交次数，`None` 表示一直重试直到成功
    pub max_attempts: Option<u32>,
    /// 被拒绝后再次提交前的等待
    pub backoff: Duration,
}

impl SubmitPolicy {
    /// 不限次数、无等待
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            backoff: Duration::ZERO,
        }
    }

    /// 限定次数、无等待
    pub fn bounded(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            backoff: Duration::ZERO,
        }
    }
}
