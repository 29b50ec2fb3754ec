//! 基础设施层
//!
//! 持有稀缺资源（浏览器页面、HTTP 客户端），只暴露能力；
//! 每种外部能力都有一个 trait，业务层只依赖 trait

pub mod archiver;
pub mod chrome_driver;
pub mod downloader;
pub mod driver;
pub mod js_executor;
pub mod pdf;

pub use archiver::{Archiver, ZipArchiver};
pub use chrome_driver::ChromeDriver;
pub use downloader::{Downloader, HttpDownloader};
pub use driver::BrowserDriver;
pub use js_executor::JsExecutor;
pub use pdf::{ChromePdfToolkit, PdfToolkit};
