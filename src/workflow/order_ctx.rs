//! 订单处理上下文
//!
//! 封装"正在处理第几个订单、订单号是多少"这一信息，仅用于日志

use std::fmt::Display;

use crate::models::OrderRecord;

/// 订单处理上下文
#[derive(Debug, Clone)]
pub struct OrderCtx {
    /// 订单号
    pub order_number: String,

    /// 订单在本次运行中的序号（从1开始）
    pub order_index: usize,

    /// 本次运行的订单总数
    pub total_orders: usize,
}

impl OrderCtx {
    pub fn new(order: &OrderRecord, order_index: usize, total_orders: usize) -> Self {
        Self {
            order_number: order.order_number.clone(),
            order_index,
            total_orders,
        }
    }
}

impl Display for OrderCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[订单 {} ({}/{})]",
            self.order_number, self.order_index, self.total_orders
        )
    }
}
