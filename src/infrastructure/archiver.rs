//! ZIP 打包

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{AppResult, ArchiveError};

/// 把一组文件打包成一个压缩包
///
/// 压缩包内只保留文件名，不保留目录结构；已存在的压缩包会被覆盖
pub trait Archiver: Send + Sync {
    /// 返回写入的文件数量
    fn zip_files(&self, files: &[PathBuf], archive: &Path) -> AppResult<usize>;
}

/// 基于 zip crate 的打包器
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiver;

impl Archiver for ZipArchiver {
    fn zip_files(&self, files: &[PathBuf], archive: &Path) -> AppResult<usize> {
        let write_failed =
            |source: Box<dyn std::error::Error + Send + Sync>| ArchiveError::WriteFailed {
                path: archive.to_path_buf(),
                source,
            };

        let out = File::create(archive).map_err(|e| write_failed(Box::new(e)))?;
        let mut zip = ZipWriter::new(out);

        for file in files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());
            debug!("打包 {} -> {}", file.display(), archive.display());

            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(name, options)
                .map_err(|e| write_failed(Box::new(e)))?;
            let mut input = File::open(file).map_err(|e| write_failed(Box::new(e)))?;
            io::copy(&mut input, &mut zip).map_err(|e| write_failed(Box::new(e)))?;
        }

        zip.finish().map_err(|e| write_failed(Box::new(e)))?;
        Ok(files.len())
    }
}
