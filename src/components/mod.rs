//! UIコンポーネントモジュール

pub mod product_pill_popover;

pub use product_pill_popover::ProductPillPopover;
