//! JS 执行器 - 基础设施层
//!
//! 持有下单页面，只暴露"执行 JS"的能力

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::AppResult;

/// JS 执行器
///
/// 职责：
/// - 持有唯一的下单 Page
/// - 暴露 eval() 能力
/// - 不认识订单，不处理业务流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于截图、查找元素等原生操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 对选择器命中的元素执行一段 JS，`el` 为元素变量
    ///
    /// 选择器通过 JSON 编码注入，元素不存在时脚本返回 `null`
    pub async fn with_element<T: DeserializeOwned>(
        &self,
        selector: &str,
        body: &str,
    ) -> AppResult<Option<T>> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) {{
                    return null;
                }}
                {}
            }})()
            "#,
            serde_json::to_string(selector)?,
            body
        );
        self.eval_as(js_code).await
    }
}
