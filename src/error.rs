use std::path::PathBuf;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 订单文件错误（下载 / 解析）
    #[error("订单文件错误: {0}")]
    Order(#[from] OrderError),
    /// 表单提交错误
    #[error("提交错误: {0}")]
    Submit(#[from] SubmitError),
    /// 回执采集错误
    #[error("回执采集错误: {0}")]
    Capture(#[from] CaptureError),
    /// PDF 处理错误
    #[error("PDF错误: {0}")]
    Pdf(#[from] PdfError),
    /// 压缩包错误
    #[error("压缩包错误: {0}")]
    Archive(#[from] ArchiveError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 启动浏览器失败
    #[error("启动浏览器失败: {reason}")]
    LaunchFailed { reason: String },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 页面上找不到元素
    #[error("找不到元素: {selector}")]
    ElementNotFound { selector: String },
    /// 执行脚本或 CDP 命令失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 订单文件错误
#[derive(Debug, Error)]
pub enum OrderError {
    /// 下载订单文件失败
    #[error("下载订单文件失败 ({url}): {source}")]
    DownloadFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 订单文件格式错误
    #[error("订单文件解析失败 ({path}): {reason}")]
    ParseFailed { path: String, reason: String },
}

/// 表单提交错误
#[derive(Debug, Error)]
pub enum SubmitError {
    /// 超过最大提交次数仍被拒绝
    #[error("订单 {order_number} 提交 {attempts} 次后仍被拒绝")]
    RetryExhausted { order_number: String, attempts: u32 },
}

/// 回执采集错误
///
/// 确认页缺少元素说明与商店页面的约定不一致，不是瞬时故障，不重试
#[derive(Debug, Error)]
pub enum CaptureError {
    /// 确认页元素缺失
    #[error("订单 {order_number} 的确认页缺少元素 {role} ({selector})")]
    ElementMissing {
        order_number: String,
        role: &'static str,
        selector: String,
    },
}

/// PDF 处理错误
#[derive(Debug, Error)]
pub enum PdfError {
    /// HTML 渲染为 PDF 失败
    #[error("渲染 PDF 失败 ({path}): {source}")]
    RenderFailed {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 嵌入图片失败
    #[error("嵌入图片到 PDF 失败 ({path}): {source}")]
    OverlayFailed {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 压缩包错误
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// 写入压缩包失败
    #[error("写入压缩包失败 ({path}): {source}")]
    WriteFailed {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    FileParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Other(format!("后台任务失败: {}", err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建元素缺失错误
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        AppError::Browser(BrowserError::ElementNotFound {
            selector: selector.into(),
        })
    }

    /// 创建订单文件下载错误
    pub fn download_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Order(OrderError::DownloadFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 创建订单文件解析错误
    pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Order(OrderError::ParseFailed {
            path: path.into(),
            reason: reason.into(),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
