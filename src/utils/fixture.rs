//! 商品サンプルデータの読み込み

use gloo::net::http::Request;
use gloo::storage::{LocalStorage, Storage};

use crate::error::{PopoverError, Result};
use crate::models::ProductInfo;

const FIXTURE_URL_KEY: &str = "product_pill_popover_fixture_url";
pub const DEFAULT_FIXTURE_URL: &str = "data/sample_products.json";

/// サンプルデータURLを保存
pub fn save_fixture_url(url: &str) {
    let _ = LocalStorage::set(FIXTURE_URL_KEY, url);
}

/// サンプルデータURLを取得（未設定なら None）
pub fn get_fixture_url() -> Option<String> {
    let url: String = LocalStorage::get(FIXTURE_URL_KEY).ok()?;
    if url.is_empty() { None } else { Some(url) }
}

/// サンプルデータURLをクリア
pub fn clear_fixture_url() {
    LocalStorage::delete(FIXTURE_URL_KEY);
}

/// 実際に読みに行くURL
pub fn fixture_url() -> String {
    get_fixture_url().unwrap_or_else(|| DEFAULT_FIXTURE_URL.to_string())
}

/// JSON文字列から商品一覧を解析
pub fn parse_products(json: &str) -> Result<Vec<ProductInfo>> {
    serde_json::from_str(json).map_err(|e| PopoverError::Parse(e.to_string()))
}

/// 商品一覧をfetch
pub async fn fetch_products(url: &str) -> Result<Vec<ProductInfo>> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| PopoverError::Fetch(e.to_string()))?;

    if !resp.ok() {
        return Err(PopoverError::Fetch(format!("HTTP {} ({})", resp.status(), url)));
    }

    let text = resp
        .text()
        .await
        .map_err(|e| PopoverError::Fetch(e.to_string()))?;
    parse_products(&text)
}
