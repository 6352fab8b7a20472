//! エラー型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PopoverError {
    #[error("windowが利用できません")]
    NoWindow,

    #[error("タイマー登録失敗: {0}")]
    Timer(String),

    #[error("商品データ取得失敗: {0}")]
    Fetch(String),

    #[error("商品データ解析失敗: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, PopoverError>;
