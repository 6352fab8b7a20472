//! ユーティリティモジュール

pub mod fixture;
pub mod hover;
pub mod log_trace;
#[cfg(test)]
pub mod manual_clock;
