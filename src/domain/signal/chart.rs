//! Charting widget embed

use serde::Serialize;

use super::entity::pad_symbol;
use crate::domain::DomainError;

const WIDGET_SCRIPT_SRC: &str = "https://s3.tradingview.com/tv.js";

/// Exchange a mainland A-share code is listed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Exchange {
    /// Shanghai
    Sse,
    /// Shenzhen
    Szse,
}

impl Exchange {
    /// Listing exchange by code prefix; unknown prefixes fall back to Shanghai
    pub fn for_code(code: &str) -> Self {
        const SZSE_PREFIXES: [&str; 6] = ["000", "001", "002", "003", "300", "301"];

        if SZSE_PREFIXES.iter().any(|p| code.starts_with(p)) {
            Self::Szse
        } else {
            Self::Sse
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sse => "SSE",
            Self::Szse => "SZSE",
        }
    }
}

/// Exchange-qualified symbol understood by the charting widget
pub fn chart_symbol(code: &str) -> String {
    let code = pad_symbol(code);
    format!("{}:{}", Exchange::for_code(&code).as_str(), code)
}

/// Accept 1 to 6 digits and pad to a full stock code
pub fn parse_stock_code(input: &str) -> Result<String, DomainError> {
    let trimmed = input.trim();

    if trimmed.is_empty() || trimmed.len() > 6 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation(format!(
            "Invalid stock code '{}': expected up to 6 digits",
            trimmed
        )));
    }

    Ok(pad_symbol(trimmed))
}

/// Configuration handed to the third-party charting widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartWidget {
    pub script_src: &'static str,
    pub container_id: String,
    pub symbol: String,
    pub width: &'static str,
    pub height: u32,
    pub interval: &'static str,
    pub timezone: &'static str,
    pub theme: &'static str,
    pub style: &'static str,
    pub locale: &'static str,
    pub toolbar_bg: &'static str,
    pub enable_publishing: bool,
    pub allow_symbol_change: bool,
}

impl ChartWidget {
    /// Daily chart for a stock code
    pub fn for_code(code: &str) -> Self {
        Self {
            script_src: WIDGET_SCRIPT_SRC,
            container_id: "tradingview_widget".to_string(),
            symbol: chart_symbol(code),
            width: "100%",
            height: 480,
            interval: "D",
            timezone: "Asia/Shanghai",
            theme: "light",
            style: "1",
            locale: "zh_CN",
            toolbar_bg: "#f1f3f6",
            enable_publishing: false,
            allow_symbol_change: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shanghai_prefixes() {
        for code in ["600519", "601318", "603259", "605499", "688981"] {
            assert_eq!(chart_symbol(code), format!("SSE:{}", code));
        }
    }

    #[test]
    fn test_shenzhen_prefixes() {
        for code in ["000001", "001979", "002594", "003816", "300750", "301269"] {
            assert_eq!(chart_symbol(code), format!("SZSE:{}", code));
        }
    }

    #[test]
    fn test_unknown_prefix_defaults_to_shanghai() {
        assert_eq!(chart_symbol("830799"), "SSE:830799");
    }

    #[test]
    fn test_short_code_is_padded_before_lookup() {
        assert_eq!(chart_symbol("1"), "SZSE:000001");
    }

    #[test]
    fn test_parse_stock_code() {
        assert_eq!(parse_stock_code("519").unwrap(), "000519");
        assert_eq!(parse_stock_code(" 600519 ").unwrap(), "600519");
        assert!(parse_stock_code("").is_err());
        assert!(parse_stock_code("6005190").is_err());
        assert!(parse_stock_code("60A519").is_err());
    }

    #[test]
    fn test_widget_config() {
        let widget = ChartWidget::for_code("300750");
        assert_eq!(widget.symbol, "SZSE:300750");
        assert_eq!(widget.height, 480);

        let json = serde_json::to_value(&widget).unwrap();
        assert_eq!(json["interval"], "D");
        assert_eq!(json["timezone"], "Asia/Shanghai");
        assert_eq!(json["enable_publishing"], false);
    }
}
