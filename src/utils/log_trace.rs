//! 時系列トレースログシステム
//! ホバー操作やデータ読込のイベントを記録し、後から確認できるようにする

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const MAX_LOG_ENTRIES: usize = 1000;
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "product_pill_popover_log_trace";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String, // "info", "warn", "error", "debug"
    pub category: String, // "hover", "fixture", "app", etc.
    pub message: String,
    pub data: Option<serde_json::Value>,
}

pub struct LogTrace {
    logs: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogTrace {
    pub fn new() -> Self {
        let mut trace = LogTrace::with_capacity(MAX_LOG_ENTRIES);
        trace.load_from_storage();
        trace
    }

    fn with_capacity(capacity: usize) -> Self {
        LogTrace {
            logs: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn log(&mut self, level: &str, category: &str, message: &str, data: Option<serde_json::Value>) {
        let entry = LogEntry {
            timestamp: now_iso(),
            level: level.to_string(),
            category: category.to_string(),
            message: message.to_string(),
            data,
        };

        // コンソールにも出力
        emit_console(level, category, message);

        if self.logs.len() >= self.capacity {
            self.logs.pop_front();
        }
        self.logs.push_back(entry);

        self.save_to_storage();
    }

    pub fn debug(&mut self, category: &str, message: &str) {
        self.log("debug", category, message, None);
    }

    pub fn info(&mut self, category: &str, message: &str) {
        self.log("info", category, message, None);
    }

    pub fn info_with_data(&mut self, category: &str, message: &str, data: serde_json::Value) {
        self.log("info", category, message, Some(data));
    }

    pub fn warn(&mut self, category: &str, message: &str) {
        self.log("warn", category, message, None);
    }

    pub fn error(&mut self, category: &str, message: &str) {
        self.log("error", category, message, None);
    }

    pub fn get_logs(&self) -> Vec<LogEntry> {
        self.logs.iter().cloned().collect()
    }

    pub fn get_logs_json(&self) -> String {
        let logs: Vec<&LogEntry> = self.logs.iter().collect();
        serde_json::to_string_pretty(&logs).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn clear(&mut self) {
        self.logs.clear();
        self.save_to_storage();
    }

    #[cfg(target_arch = "wasm32")]
    fn load_from_storage(&mut self) {
        use gloo::storage::{LocalStorage, Storage};

        if let Ok(logs) = LocalStorage::get::<Vec<LogEntry>>(STORAGE_KEY) {
            let skip = logs.len().saturating_sub(self.capacity);
            self.logs = logs.into_iter().skip(skip).collect();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_from_storage(&mut self) {}

    #[cfg(target_arch = "wasm32")]
    fn save_to_storage(&self) {
        use gloo::storage::{LocalStorage, Storage};

        let _ = LocalStorage::set(STORAGE_KEY, &self.logs);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_to_storage(&self) {}

    #[cfg(target_arch = "wasm32")]
    pub fn download_logs(&self) {
        use wasm_bindgen::{JsCast, JsValue};

        let json_str = self.get_logs_json();
        let filename = format!("log_trace_{}.json", now_iso().replace(':', "-").replace('.', "-"));

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let blob_parts = js_sys::Array::new();
        blob_parts.push(&JsValue::from_str(&json_str));

        let options = web_sys::BlobPropertyBag::new();
        options.set_type("application/json");

        if let Ok(blob) = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &options) {
            if let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) {
                if let Ok(a) = document.create_element("a") {
                    let _ = a.set_attribute("href", &url);
                    let _ = a.set_attribute("download", &filename);
                    if let Some(element) = a.dyn_ref::<web_sys::HtmlElement>() {
                        element.click();
                    }
                }
                let _ = web_sys::Url::revoke_object_url(&url);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn download_logs(&self) {}
}

impl Default for LogTrace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().as_string().unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_iso() -> String {
    String::new()
}

#[cfg(target_arch = "wasm32")]
fn emit_console(level: &str, category: &str, message: &str) {
    let line = format!("[{}] {}", category, message);
    match level {
        "error" => gloo::console::error!(line),
        "warn" => gloo::console::warn!(line),
        "debug" => gloo::console::debug!(line),
        _ => gloo::console::log!(line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit_console(_level: &str, _category: &str, _message: &str) {}

// グローバルなログトレースインスタンス
// スレッド終了中（破棄済み）の呼び出しは記録せず捨てる
thread_local! {
    static LOG_TRACE: std::cell::RefCell<LogTrace> = std::cell::RefCell::new(LogTrace::new());
}

pub fn log_debug(category: &str, message: &str) {
    let _ = LOG_TRACE.try_with(|trace| {
        trace.borrow_mut().debug(category, message);
    });
}

pub fn log_info(category: &str, message: &str) {
    let _ = LOG_TRACE.try_with(|trace| {
        trace.borrow_mut().info(category, message);
    });
}

pub fn log_info_with_data(category: &str, message: &str, data: serde_json::Value) {
    let _ = LOG_TRACE.try_with(|trace| {
        trace.borrow_mut().info_with_data(category, message, data);
    });
}

pub fn log_warn(category: &str, message: &str) {
    let _ = LOG_TRACE.try_with(|trace| {
        trace.borrow_mut().warn(category, message);
    });
}

pub fn log_error(category: &str, message: &str) {
    let _ = LOG_TRACE.try_with(|trace| {
        trace.borrow_mut().error(category, message);
    });
}

pub fn download_logs() {
    let _ = LOG_TRACE.try_with(|trace| {
        trace.borrow().download_logs();
    });
}

pub fn clear_logs() {
    let _ = LOG_TRACE.try_with(|trace| {
        trace.borrow_mut().clear();
    });
}

pub fn get_logs_json() -> String {
    LOG_TRACE
        .try_with(|trace| trace.borrow().get_logs_json())
        .unwrap_or_else(|_| "[]".to_string())
}
