use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 订单文件中的一行
///
/// 所有字段原样来自 CSV，不做任何转换，直接填入表单
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(rename = "Order number")]
    pub order_number: String,
    #[serde(rename = "Head")]
    pub head_id: String,
    #[serde(rename = "Body")]
    pub body_id: String,
    #[serde(rename = "Legs")]
    pub legs_part_number: String,
    #[serde(rename = "Address")]
    pub address: String,
}

impl fmt::Display for OrderRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} (head={}, body={}, legs={})",
            self.order_number, self.head_id, self.body_id, self.legs_part_number
        )
    }
}

/// 单次提交的结果，只存在于提交循环内部
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// 确认页已出现
    Confirmed,
    /// 页面显示了错误提示
    Rejected,
}

/// 订单已确认
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub order_number: String,
    /// 包含成功那一次在内的提交次数
    pub attempts: u32,
}

/// 单个订单的产物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptArtifacts {
    pub order_number: String,
    pub screenshot_path: PathBuf,
    pub receipt_pdf_path: PathBuf,
}
