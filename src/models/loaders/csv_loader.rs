use std::io::Read;
use std::path::Path;

use tokio::fs;

use crate::error::{AppError, AppResult};
use crate::models::order::OrderRecord;

/// 订单文件必须包含的列，名称必须完全一致
pub const REQUIRED_COLUMNS: [&str; 5] = ["Order number", "Head", "Body", "Legs", "Address"];

/// 从 CSV 文件读取订单列表
pub async fn parse_orders_file(path: &Path) -> AppResult<Vec<OrderRecord>> {
    let content = fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    parse_orders(content.as_slice(), &path.display().to_string())
}

/// 解析带表头的 CSV 订单数据，保持文件中的顺序
///
/// # 参数
/// - `reader`: CSV 数据
/// - `source`: 数据来源（仅用于错误信息）
///
/// # 返回
/// 缺少表头、缺少必需列或某行列数不一致时返回 `OrderError::ParseFailed`
pub fn parse_orders<R: Read>(reader: R, source: &str) -> AppResult<Vec<OrderRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| AppError::parse_failed(source, e.to_string()))?
        .clone();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::parse_failed(source, "缺少表头"));
    }

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(AppError::parse_failed(
                source,
                format!("缺少必需的列: {}", column),
            ));
        }
    }

    let mut orders = Vec::new();
    for (index, row) in rdr.deserialize::<OrderRecord>().enumerate() {
        let order = row.map_err(|e| {
            AppError::parse_failed(source, format!("第 {} 行: {}", index + 1, e))
        })?;
        orders.push(order);
    }

    tracing::debug!("从 {} 解析出 {} 个订单", source, orders.len());
    Ok(orders)
}
