//! 输出目录布局
//!
//! 所有产物路径都由订单号推导，重复运行会覆盖同名文件

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::{AppError, AppResult};

/// PDF 回执压缩包文件名
pub const PDF_ARCHIVE_NAME: &str = "receipt_pdf.zip";
/// 机器人截图压缩包文件名
pub const IMAGE_ARCHIVE_NAME: &str = "robot_images.zip";
/// 诊断截图子目录
pub const DIAGNOSTICS_DIR: &str = "diagnostics";

/// 输出目录布局
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    orders_file: String,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, orders_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            orders_file: orders_file.into(),
        }
    }

    /// 创建输出目录和诊断截图目录
    pub async fn prepare(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(self.diagnostics_dir())
            .await
            .map_err(|e| AppError::file_write_failed(self.root.display().to_string(), e))?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 下载下来的订单文件
    pub fn orders_file(&self) -> PathBuf {
        self.root.join(&self.orders_file)
    }

    pub fn diagnostics_dir(&self) -> PathBuf {
        self.root.join(DIAGNOSTICS_DIR)
    }

    /// 机器人预览截图 `robot_<N>.png`
    pub fn robot_image(&self, order_number: &str) -> PathBuf {
        self.root
            .join(format!("robot_{}.png", file_safe(order_number)))
    }

    /// 回执 PDF `receipt_<N>.pdf`
    pub fn receipt_pdf(&self, order_number: &str) -> PathBuf {
        self.root
            .join(format!("receipt_{}.pdf", file_safe(order_number)))
    }

    /// 提交前的诊断截图，每次重试都覆盖同一个文件
    pub fn diagnostic_screenshot(&self, order_number: &str) -> PathBuf {
        self.diagnostics_dir()
            .join(format!("submit_{}.png", file_safe(order_number)))
    }

    pub fn pdf_archive(&self) -> PathBuf {
        self.root.join(PDF_ARCHIVE_NAME)
    }

    pub fn image_archive(&self) -> PathBuf {
        self.root.join(IMAGE_ARCHIVE_NAME)
    }
}

/// 把订单号转换成可用作文件名的形式
///
/// `[A-Za-z0-9._-]` 以外的字符按 UTF-8 字节编码成 `%XX`（`%` 本身也会被编码），
/// 不裁剪空白，不同订单号不会得到同一个文件名
pub fn file_safe(order_number: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid regex"));
    re.replace_all(order_number, |caps: &Captures| {
        caps[0].bytes().map(|b| format!("%{:02X}", b)).collect::<String>()
    })
    .into_owned()
}
