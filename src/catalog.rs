//! Fixed page catalogs and the device/report selectors.
//!
//! Catalog order is the display order of a report and never depends on the
//! order in which pages appear in a payload.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One page category covered by a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKey {
    Home,
    Category,
    Product,
    Cart,
    Checkout,
    Footer,
    General,
    Navigation,
    Search,
    CartWidget,
}

/// Pages evaluated by every report.
pub const BASE_CATALOG: &[PageKey] = &[
    PageKey::Home,
    PageKey::Category,
    PageKey::Product,
    PageKey::Cart,
    PageKey::Checkout,
    PageKey::Footer,
];

/// Pages only evaluated by deep reports. Displayed ahead of the base pages.
pub const DEEP_EXTENSION: &[PageKey] = &[
    PageKey::General,
    PageKey::Navigation,
    PageKey::Search,
    PageKey::CartWidget,
];

const DEEP_CATALOG: &[PageKey] = &[
    PageKey::General,
    PageKey::Navigation,
    PageKey::Search,
    PageKey::CartWidget,
    PageKey::Home,
    PageKey::Category,
    PageKey::Product,
    PageKey::Cart,
    PageKey::Checkout,
    PageKey::Footer,
];

impl PageKey {
    /// Snake-case key used by structured payloads.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Category => "category",
            Self::Product => "product",
            Self::Cart => "cart",
            Self::Checkout => "checkout",
            Self::Footer => "footer",
            Self::General => "general",
            Self::Navigation => "navigation",
            Self::Search => "search",
            Self::CartWidget => "cart_widget",
        }
    }

    /// Section title shown to the reader.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "HOME PAGE",
            Self::Category => "CATEGORY PAGE",
            Self::Product => "PRODUCT PAGE",
            Self::Cart => "CART PAGE",
            Self::Checkout => "CHECKOUT PAGE",
            Self::Footer => "FOOTER",
            Self::General => "GENERAL",
            Self::Navigation => "NAVIGATION",
            Self::Search => "SEARCH",
            Self::CartWidget => "CART WIDGET",
        }
    }

    /// Match a free-form page name ("Home Page", "cart-widget", "CHECKOUT")
    /// against the known pages.
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
            .filter(|w| !w.is_empty())
            .collect();
        let words = match words.split_last() {
            Some((&"page", rest)) if !rest.is_empty() => rest,
            _ => &words[..],
        };

        match words.join(" ").as_str() {
            "home" | "homepage" => Some(Self::Home),
            "category" | "collection" => Some(Self::Category),
            "product" => Some(Self::Product),
            "cart" => Some(Self::Cart),
            "checkout" => Some(Self::Checkout),
            "footer" => Some(Self::Footer),
            "general" => Some(Self::General),
            "navigation" => Some(Self::Navigation),
            "search" => Some(Self::Search),
            "cart widget" | "mini cart" => Some(Self::CartWidget),
            _ => None,
        }
    }
}

impl std::fmt::Display for PageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Evaluation context; every page is scored independently per device.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DeviceView {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceView {
    pub fn all() -> &'static [DeviceView] {
        &[DeviceView::Desktop, DeviceView::Mobile]
    }

    /// Capitalised name as it appears in report text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Desktop => "Desktop",
            Self::Mobile => "Mobile",
        }
    }
}

impl std::fmt::Display for DeviceView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Desktop => write!(f, "desktop"),
            Self::Mobile => write!(f, "mobile"),
        }
    }
}

impl std::str::FromStr for DeviceView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "mobile" => Ok(Self::Mobile),
            _ => Err(format!(
                "Unknown view: '{}'. Valid options: desktop, mobile",
                s
            )),
        }
    }
}

/// Which catalog a report covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Basic,
    Deep,
}

impl ReportType {
    /// Pages in display order for this report type.
    pub fn catalog(&self) -> &'static [PageKey] {
        match self {
            Self::Basic => BASE_CATALOG,
            Self::Deep => DEEP_CATALOG,
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Deep => write!(f, "deep"),
        }
    }
}

impl std::str::FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "deep" => Ok(Self::Deep),
            _ => Err(format!(
                "Unknown report type: '{}'. Valid options: basic, deep",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_catalog_puts_extension_first() {
        let deep = ReportType::Deep.catalog();
        assert_eq!(&deep[..DEEP_EXTENSION.len()], DEEP_EXTENSION);
        assert_eq!(&deep[DEEP_EXTENSION.len()..], BASE_CATALOG);
    }

    #[test]
    fn basic_catalog_is_base() {
        assert_eq!(ReportType::Basic.catalog(), BASE_CATALOG);
        assert_eq!(BASE_CATALOG.len(), 6);
    }

    #[test]
    fn page_names_match_catalog() {
        assert_eq!(PageKey::from_name("Home Page"), Some(PageKey::Home));
        assert_eq!(PageKey::from_name("CHECKOUT PAGE"), Some(PageKey::Checkout));
        assert_eq!(PageKey::from_name("footer"), Some(PageKey::Footer));
        assert_eq!(PageKey::from_name("Cart Widget"), Some(PageKey::CartWidget));
        assert_eq!(PageKey::from_name("cart_widget"), Some(PageKey::CartWidget));
        assert_eq!(PageKey::from_name("cart"), Some(PageKey::Cart));
        assert_eq!(PageKey::from_name("Pricing Page"), None);
        assert_eq!(PageKey::from_name("page"), None);
    }

    #[test]
    fn page_key_serializes_snake_case() {
        let json = serde_json::to_string(&PageKey::CartWidget).unwrap();
        assert_eq!(json, "\"cart_widget\"");
        assert_eq!(PageKey::CartWidget.to_string(), "cart_widget");
    }

    #[test]
    fn device_view_parse() {
        assert_eq!("Mobile".parse::<DeviceView>().unwrap(), DeviceView::Mobile);
        assert_eq!(" desktop ".parse::<DeviceView>().unwrap(), DeviceView::Desktop);
        assert!("tablet".parse::<DeviceView>().is_err());
    }

    #[test]
    fn report_type_parse() {
        assert_eq!("DEEP".parse::<ReportType>().unwrap(), ReportType::Deep);
        assert!("full".parse::<ReportType>().is_err());
    }
}
