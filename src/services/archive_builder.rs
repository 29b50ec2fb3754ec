//! 打包服务 - 业务能力层
//!
//! 所有订单处理完之后，把 PDF 回执和机器人截图分别打成两个压缩包

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::infrastructure::Archiver;
use crate::models::{OutputLayout, ReceiptArtifacts};

/// 压缩包的输入来源
#[derive(Debug, Clone, Copy)]
pub enum ArchiveInput<'a> {
    /// 只打包本次运行产生的文件
    Artifacts(&'a [ReceiptArtifacts]),
    /// 扫描输出目录（不递归），打包当前存在的所有 `*.pdf` / `*.png`
    ScanOutputDir,
}

/// 打包结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub pdf_archive: PathBuf,
    pub image_archive: PathBuf,
    pub pdf_count: usize,
    pub image_count: usize,
}

/// 打包服务
///
/// 每次都完整重写两个压缩包，不做增量
pub struct ArchiveBuilder {
    archiver: Arc<dyn Archiver>,
    layout: OutputLayout,
}

impl ArchiveBuilder {
    pub fn new(archiver: Arc<dyn Archiver>, layout: OutputLayout) -> Self {
        Self { archiver, layout }
    }

    pub async fn build(&self, input: ArchiveInput<'_>) -> AppResult<ArchiveSummary> {
        let (pdfs, images) = match input {
            ArchiveInput::Artifacts(artifacts) => (
                artifacts.iter().map(|a| a.receipt_pdf_path.clone()).collect(),
                artifacts.iter().map(|a| a.screenshot_path.clone()).collect(),
            ),
            ArchiveInput::ScanOutputDir => (
                self.scan("pdf").await?,
                self.scan("png").await?,
            ),
        };

        let (pdfs, images) = (unique(pdfs), unique(images));

        let pdf_archive = self.layout.pdf_archive();
        let image_archive = self.layout.image_archive();
        let pdf_count = self.zip(pdfs, pdf_archive.clone()).await?;
        info!("✓ 已打包 {} 个 PDF 回执: {}", pdf_count, pdf_archive.display());
        let image_count = self.zip(images, image_archive.clone()).await?;
        info!("✓ 已打包 {} 张机器人截图: {}", image_count, image_archive.display());

        Ok(ArchiveSummary {
            pdf_archive,
            image_archive,
            pdf_count,
            image_count,
        })
    }

    async fn zip(&self, files: Vec<PathBuf>, archive: PathBuf) -> AppResult<usize> {
        let archiver = Arc::clone(&self.archiver);
        tokio::task::spawn_blocking(move || archiver.zip_files(&files, &archive)).await?
    }

    /// 输出目录下指定扩展名的文件，按文件名排序
    async fn scan(&self, extension: &str) -> AppResult<Vec<PathBuf>> {
        let root = self.layout.root();
        let read_failed =
            |e: std::io::Error| AppError::file_read_failed(root.display().to_string(), e);

        let mut entries = tokio::fs::read_dir(root).await.map_err(read_failed)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_failed)? {
            let path = entry.path();
            let file_type = entry.file_type().await.map_err(read_failed)?;
            if file_type.is_file() && has_extension(&path, extension) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// 去掉重复路径，保留第一次出现的顺序
///
/// 同一个订单号出现两次时产物路径相同，压缩包里不能有重名条目
fn unique(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
