//! 订单来源 - 业务能力层
//!
//! 只负责"拿到订单列表"：下载 CSV 到固定位置，再按文件顺序解析

use std::sync::Arc;

use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::Downloader;
use crate::models::{parse_orders_file, OrderRecord, OutputLayout};

/// 订单来源
///
/// 下载或解析失败直接返回错误，不重试：订单列表是整个流程的前提
pub struct OrderSource {
    downloader: Arc<dyn Downloader>,
    orders_url: String,
    layout: OutputLayout,
}

impl OrderSource {
    pub fn new(
        downloader: Arc<dyn Downloader>,
        orders_url: impl Into<String>,
        layout: OutputLayout,
    ) -> Self {
        Self {
            downloader,
            orders_url: orders_url.into(),
            layout,
        }
    }

    /// 下载并解析订单文件
    pub async fn fetch(&self) -> AppResult<Vec<OrderRecord>> {
        let target = self.layout.orders_file();
        info!("📥 正在下载订单文件: {}", self.orders_url);
        self.downloader.download(&self.orders_url, &target).await?;

        let orders = parse_orders_file(&target).await?;
        info!("✓ 已读取 {} 个订单", orders.len());
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, OrderError};
    use crate::test_support::{event_log, FakeDownloader};

    fn source(content: Option<&str>, layout: OutputLayout) -> OrderSource {
        OrderSource::new(
            Arc::new(FakeDownloader::new(content, event_log())),
            "https://example.test/orders.csv",
            layout,
        )
    }

    #[tokio::test]
    async fn fetch_returns_one_record_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "orders.csv");
        let csv = "Order number,Head,Body,Legs,Address\n\
                   1001,1,2,3,Main St 1\n\
                   1002,4,5,6,Side St 2\n";

        let orders = source(Some(csv), layout.clone()).fetch().await.unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1].order_number, "1002");
        assert_eq!(orders[1].legs_part_number, "6");
        assert_eq!(std::fs::read_to_string(layout.orders_file()).unwrap(), csv);
    }

    #[tokio::test]
    async fn fetch_overwrites_existing_order_file() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "orders.csv");
        std::fs::write(layout.orders_file(), "stale content").unwrap();

        let csv = "Order number,Head,Body,Legs,Address\n1,1,1,1,A\n";
        let orders = source(Some(csv), layout).fetch().await.unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn download_failure_is_reported_as_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "orders.csv");

        let err = source(None, layout).fetch().await.unwrap_err();
        assert!(matches!(err, AppError::Order(OrderError::DownloadFailed { .. })));
    }

    #[tokio::test]
    async fn malformed_file_is_reported_as_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path(), "orders.csv");

        let err = source(Some("Order number,Head\n1,2\n"), layout)
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Order(OrderError::ParseFailed { .. })));
    }
}
