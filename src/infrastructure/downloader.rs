//! HTTP 下载

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 把远程文件下载到本地，已存在的文件会被覆盖
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, url: &str, target: &Path) -> AppResult<()>;
}

/// 基于 reqwest 的下载器
pub struct HttpDownloader {
    client: reqwest::Client,
}

impl HttpDownloader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, target: &Path) -> AppResult<()> {
        debug!("下载 {} -> {}", url, target.display());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::download_failed(url, e))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::download_failed(url, e))?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::file_write_failed(parent.display().to_string(), e))?;
        }
        tokio::fs::write(target, &bytes)
            .await
            .map_err(|e| AppError::file_write_failed(target.display().to_string(), e))?;

        debug!("已写入 {} 字节", bytes.len());
        Ok(())
    }
}
