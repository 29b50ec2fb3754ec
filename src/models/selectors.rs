//! 下单页面上需要操作的元素

/// 页面元素选择器（CSS）
#[derive(Debug, Clone)]
pub struct Selectors {
    /// 头部型号下拉框
    pub head_select: String,
    /// 躯干型号单选框的 label，`{}` 会被替换成型号
    pub body_option_template: String,
    /// 腿部零件号输入框
    pub legs_input: String,
    /// 收货地址输入框
    pub address_input: String,
    /// 提交按钮
    pub submit_button: String,
    /// “再下一单”按钮
    pub order_another_button: String,
    /// 订单确认区域（回执 HTML）
    pub confirmation: String,
    /// 机器人预览图
    pub preview_image: String,
    /// 提交失败时出现的错误提示
    pub error_banner: String,
    /// cookie 弹窗的关闭按钮
    pub modal_dismiss: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            head_select: "#head".to_string(),
            body_option_template: r#"div.stacked label[for="id-body-{}"]"#.to_string(),
            legs_input: r#"input[placeholder="Enter the part number for the legs"]"#.to_string(),
            address_input: "#address".to_string(),
            submit_button: "#order".to_string(),
            order_another_button: "#order-another".to_string(),
            confirmation: "#order-completion".to_string(),
            preview_image: "#robot-preview-image".to_string(),
            error_banner: "div.alert.alert-danger".to_string(),
            modal_dismiss: "button.btn.btn-dark".to_string(),
        }
    }
}

impl Selectors {
    /// 指定躯干型号对应的单选项
    pub fn body_option(&self, body_id: &str) -> String {
        self.body_option_template.replace("{}", body_id)
    }
}
