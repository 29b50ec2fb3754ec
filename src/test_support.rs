//! 单元测试用的假商店、假 PDF 工具和假下载器
//!
//! 三者共享一条事件日志，便于断言调用顺序

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::infrastructure::{BrowserDriver, Downloader, PdfToolkit};
use crate::models::Selectors;

pub(crate) type EventLog = Arc<Mutex<Vec<String>>>;

pub(crate) fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

fn record(log: &EventLog, event: impl Into<String>) {
    log.lock().unwrap().push(event.into());
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> AppResult<()> {
    std::fs::write(path, contents)
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 单个订单的提交表现
#[derive(Debug, Clone, Copy)]
pub(crate) enum Plan {
    /// 先拒绝 n 次再确认
    RejectTimes(u32),
    /// 永远拒绝
    AlwaysReject,
}

#[derive(Debug)]
struct PageState {
    plans: VecDeque<Plan>,
    current: Plan,
    modal_visible: bool,
    banner_visible: bool,
    confirmed: bool,
    missing_preview: bool,
    missing_confirmation: bool,
    submit_clicks: u32,
    close_count: u32,
    fields: HashMap<String, String>,
}

/// 模拟下单页面的状态机
pub(crate) struct FakeStorefront {
    selectors: Selectors,
    state: Mutex<PageState>,
    events: EventLog,
}

impl FakeStorefront {
    /// 按顺序为每个订单指定提交表现，未指定的订单一次成功
    pub(crate) fn new(plans: impl IntoIterator<Item = Plan>, events: EventLog) -> Self {
        Self {
            selectors: Selectors::default(),
            state: Mutex::new(PageState {
                plans: plans.into_iter().collect(),
                current: Plan::RejectTimes(0),
                modal_visible: true,
                banner_visible: false,
                confirmed: false,
                missing_preview: false,
                missing_confirmation: false,
                submit_clicks: 0,
                close_count: 0,
                fields: HashMap::new(),
            }),
            events,
        }
    }

    pub(crate) fn without_modal(self) -> Self {
        self.state.lock().unwrap().modal_visible = false;
        self
    }

    pub(crate) fn without_preview(self) -> Self {
        self.state.lock().unwrap().missing_preview = true;
        self
    }

    pub(crate) fn without_confirmation(self) -> Self {
        self.state.lock().unwrap().missing_confirmation = true;
        self
    }

    /// 直接进入确认页，用于单独测试回执采集
    pub(crate) fn confirmed(self, address: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.confirmed = true;
            state.modal_visible = false;
            state
                .fields
                .insert(self.selectors.address_input.clone(), address.to_string());
        }
        self
    }

    pub(crate) fn submit_clicks(&self) -> u32 {
        self.state.lock().unwrap().submit_clicks
    }

    pub(crate) fn close_count(&self) -> u32 {
        self.state.lock().unwrap().close_count
    }

    pub(crate) fn field(&self, selector: &str) -> Option<String> {
        self.state.lock().unwrap().fields.get(selector).cloned()
    }

    fn present(&self, state: &PageState, selector: &str) -> bool {
        let s = &self.selectors;
        if selector == s.modal_dismiss {
            state.modal_visible
        } else if selector == s.error_banner {
            state.banner_visible
        } else if selector == s.preview_image {
            state.confirmed && !state.missing_preview
        } else if selector == s.confirmation {
            state.confirmed && !state.missing_confirmation
        } else if selector == s.order_another_button {
            state.confirmed
        } else if selector == s.submit_button {
            !state.confirmed
        } else {
            true
        }
    }
}

#[async_trait]
impl BrowserDriver for FakeStorefront {
    async fn goto(&self, url: &str) -> AppResult<()> {
        record(&self.events, format!("goto:{}", url));
        Ok(())
    }

    async fn is_present(&self, selector: &str) -> AppResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(self.present(&state, selector))
    }

    async fn is_visible(&self, selector: &str) -> AppResult<bool> {
        let state = self.state.lock().unwrap();
        Ok(self.present(&state, selector))
    }

    async fn click(&self, selector: &str) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        if !self.present(&state, selector) {
            return Err(AppError::element_not_found(selector));
        }
        let s = &self.selectors;
        if selector == s.modal_dismiss {
            state.modal_visible = false;
            record(&self.events, "dismiss_modal");
        } else if selector == s.submit_button {
            state.submit_clicks += 1;
            let reject = match state.current {
                Plan::AlwaysReject => true,
                Plan::RejectTimes(0) => false,
                Plan::RejectTimes(n) => {
                    state.current = Plan::RejectTimes(n - 1);
                    true
                }
            };
            state.banner_visible = reject;
            state.confirmed = !reject;
            record(&self.events, if reject { "submit:rejected" } else { "submit:confirmed" });
        } else if selector == s.order_another_button {
            state.confirmed = false;
            state.banner_visible = false;
            state.modal_visible = true;
            record(&self.events, "order_another");
        } else {
            state.fields.insert("body".to_string(), selector.to_string());
            record(&self.events, format!("click:{}", selector));
        }
        Ok(())
    }

    async fn select_by_value(&self, selector: &str, value: &str) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        if selector == self.selectors.head_select {
            // 选择头部型号意味着开始填写一个新订单
            state.current = state.plans.pop_front().unwrap_or(Plan::RejectTimes(0));
        }
        state.fields.insert(selector.to_string(), value.to_string());
        record(&self.events, format!("select:{}={}", selector, value));
        Ok(())
    }

    async fn input_text(&self, selector: &str, text: &str) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.fields.insert(selector.to_string(), text.to_string());
        record(&self.events, format!("type:{}={}", selector, text));
        Ok(())
    }

    async fn scroll_into_view(&self, selector: &str) -> AppResult<()> {
        record(&self.events, format!("scroll:{}", selector));
        Ok(())
    }

    async fn capture_page_screenshot(&self, path: &Path) -> AppResult<()> {
        write_file(path, b"page")?;
        record(&self.events, format!("page_screenshot:{}", file_name(path)));
        Ok(())
    }

    async fn capture_element_screenshot(&self, selector: &str, path: &Path) -> AppResult<()> {
        let address = {
            let state = self.state.lock().unwrap();
            if !self.present(&state, selector) {
                return Err(AppError::element_not_found(selector));
            }
            state
                .fields
                .get(&self.selectors.address_input)
                .cloned()
                .unwrap_or_default()
        };
        write_file(path, format!("PNG {}", address))?;
        record(&self.events, format!("element_screenshot:{}", file_name(path)));
        Ok(())
    }

    async fn outer_html(&self, selector: &str) -> AppResult<Option<String>> {
        let state = self.state.lock().unwrap();
        if !self.present(&state, selector) {
            return Ok(None);
        }
        let address = state
            .fields
            .get(&self.selectors.address_input)
            .cloned()
            .unwrap_or_default();
        Ok(Some(format!(
            "<div id=\"order-completion\"><p>{}</p></div>",
            address
        )))
    }

    async fn close(&self) -> AppResult<()> {
        self.state.lock().unwrap().close_count += 1;
        record(&self.events, "close");
        Ok(())
    }
}

/// 把 HTML 原样写进文件的假 PDF 工具
pub(crate) struct FakePdf {
    events: EventLog,
}

impl FakePdf {
    pub(crate) fn new(events: EventLog) -> Self {
        Self { events }
    }
}

#[async_trait]
impl PdfToolkit for FakePdf {
    async fn html_to_pdf(&self, html: &str, output: &Path) -> AppResult<()> {
        write_file(output, format!("%PDF {}", html))?;
        record(&self.events, format!("render_pdf:{}", file_name(output)));
        Ok(())
    }

    async fn overlay_image(&self, pdf: &Path, image: &Path) -> AppResult<()> {
        let mut content = std::fs::read_to_string(pdf)
            .map_err(|e| AppError::file_read_failed(pdf.display().to_string(), e))?;
        content.push_str(&format!("\n%overlay {}", file_name(image)));
        write_file(pdf, content)?;
        record(&self.events, format!("overlay:{}", file_name(pdf)));
        Ok(())
    }
}

/// 返回固定内容的假下载器，`None` 表示网络不可用
pub(crate) struct FakeDownloader {
    content: Option<String>,
    events: EventLog,
}

impl FakeDownloader {
    pub(crate) fn new(content: Option<&str>, events: EventLog) -> Self {
        Self {
            content: content.map(str::to_string),
            events,
        }
    }
}

#[async_trait]
impl Downloader for FakeDownloader {
    async fn download(&self, url: &str, target: &Path) -> AppResult<()> {
        record(&self.events, "download");
        match &self.content {
            Some(content) => {
                write_file(target, content)?;
                Ok(())
            }
            None => Err(AppError::download_failed(
                url,
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "offline"),
            )),
        }
    }
}

/// 事件日志的快照
pub(crate) fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}
