//! データ構造体モジュール

use serde::{Deserialize, Serialize};

// ============================================
// 商品データ
// ============================================

/// ポップオーバーの表示位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopoverPosition {
    Below,
    /// 未知の値もすべて上側扱い
    #[default]
    #[serde(other)]
    Above,
}

impl PopoverPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            PopoverPosition::Above => "above",
            PopoverPosition::Below => "below",
        }
    }
}

/// 商品情報（サンプルJSONの1レコード）
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProductInfo {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub popover_position: PopoverPosition,
}

// ============================================
// 表示用モデル
// ============================================

/// ピル＋ポップオーバーの表示内容
///
/// 入力はすべて外部から渡される読み取り専用の値。
/// 表示状態とタイマーは `HoverController` 側が持つ。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopoverViewModel {
    pub product_name: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_price: f64,
    pub description: String,
    pub popover_position: PopoverPosition,
}

impl PopoverViewModel {
    /// ラベルに表示する商品名（未指定・空なら空文字）
    pub fn display_name(&self) -> String {
        self.product_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    /// ポップオーバーコンテナのCSSクラス
    pub fn container_class(&self) -> String {
        match self.popover_position {
            PopoverPosition::Below => "popover-container popover-below".to_string(),
            PopoverPosition::Above => "popover-container popover-above".to_string(),
        }
    }
}

impl From<ProductInfo> for PopoverViewModel {
    fn from(product: ProductInfo) -> Self {
        PopoverViewModel {
            product_name: product.product_name,
            quantity: product.quantity,
            unit_price: product.unit_price,
            total_price: product.total_price,
            description: product.description,
            popover_position: product.popover_position,
        }
    }
}

// ============================================
// 数値フォーマット
// ============================================

/// 金額表示（3桁区切り、小数2桁）
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

/// 数量表示（整数ならそのまま、端数は小数2桁まで）
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    if value.fract() == 0.0 {
        return format!("{}", value as i64);
    }
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_named(name: Option<&str>) -> PopoverViewModel {
        PopoverViewModel {
            product_name: name.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn display_name_returns_name_verbatim() {
        assert_eq!(model_named(Some("Widget Pro")).display_name(), "Widget Pro");
        assert_eq!(model_named(Some("  spaced ")).display_name(), "  spaced ");
    }

    #[test]
    fn display_name_is_empty_when_missing() {
        assert_eq!(model_named(None).display_name(), "");
        assert_eq!(model_named(Some("")).display_name(), "");
    }

    #[test]
    fn container_class_follows_position() {
        let mut model = PopoverViewModel::default();
        assert_eq!(model.container_class(), "popover-container popover-above");

        model.popover_position = PopoverPosition::Below;
        let class = model.container_class();
        assert!(class.contains("popover-container"));
        assert!(class.contains("popover-below"));
        assert!(!class.contains("popover-above"));
    }

    #[test]
    fn position_deserializes_unknown_as_above() {
        let below: PopoverPosition = serde_json::from_str("\"below\"").unwrap();
        let sideways: PopoverPosition = serde_json::from_str("\"sideways\"").unwrap();
        assert_eq!(below, PopoverPosition::Below);
        assert_eq!(sideways, PopoverPosition::Above);
    }

    #[test]
    fn position_defaults_to_above_and_serializes_lowercase() {
        assert_eq!(PopoverPosition::default(), PopoverPosition::Above);
        assert_eq!(serde_json::to_string(&PopoverPosition::Above).unwrap(), "\"above\"");
        assert_eq!(serde_json::to_string(&PopoverPosition::Below).unwrap(), "\"below\"");
    }

    #[test]
    fn product_info_with_unknown_position_falls_back_to_above() {
        let product: ProductInfo =
            serde_json::from_str(r#"{ "product_name": "Lamp", "popover_position": "left" }"#).unwrap();
        assert_eq!(product.popover_position, PopoverPosition::Above);
    }

    #[test]
    fn product_info_converts_into_view_model() {
        let product = ProductInfo {
            product_name: Some("Cable".to_string()),
            quantity: 3.0,
            unit_price: 2.5,
            total_price: 7.5,
            description: "USB-C".to_string(),
            popover_position: PopoverPosition::Below,
        };
        let model = PopoverViewModel::from(product);
        assert_eq!(model.display_name(), "Cable");
        assert_eq!(model.total_price, 7.5);
        assert_eq!(model.popover_position, PopoverPosition::Below);
    }

    #[test]
    fn format_price_groups_thousands() {
        assert_eq!(format_price(0.0), "0.00");
        assert_eq!(format_price(1234.5), "1,234.50");
        assert_eq!(format_price(1234567.891), "1,234,567.89");
        assert_eq!(format_price(-1000.0), "-1,000.00");
        assert_eq!(format_price(f64::NAN), "-");
    }

    #[test]
    fn format_quantity_trims_fraction() {
        assert_eq!(format_quantity(3.0), "3");
        assert_eq!(format_quantity(1.5), "1.5");
        assert_eq!(format_quantity(0.25), "0.25");
        assert_eq!(format_quantity(f64::INFINITY), "-");
    }
}
