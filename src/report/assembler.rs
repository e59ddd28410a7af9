//! Orders canonical sections into the display sequence for one device.

use clap::ValueEnum;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::{DeviceView, ReportType};
use crate::report::color::ColorClass;
use crate::report::types::{CanonicalReport, SectionRef};
use crate::report::ReportError;

/// Message shown when a strict render aborts.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load report data";

/// What to do when a catalog page/device is missing from the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Omit the section and keep going.
    #[default]
    Lenient,
    /// Abort the whole render.
    Strict,
}

impl std::fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for MissingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(format!(
                "Unknown policy: '{}'. Valid options: lenient, strict",
                s
            )),
        }
    }
}

/// Final render unit for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySection {
    pub title: String,
    pub content: String,
    pub score: i64,
    pub color_class: ColorClass,
}

/// Assembled view handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    /// Shown once above all sections.
    pub cached: bool,
    pub sections: Vec<DisplaySection>,
    /// Entries the payload named but did not carry (lenient only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SectionRef>,
    /// User-visible failure message (strict only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportView {
    pub fn failed(cached: bool) -> Self {
        Self {
            cached,
            sections: Vec::new(),
            skipped: Vec::new(),
            error: Some(LOAD_FAILURE_MESSAGE.to_string()),
        }
    }

    /// Whether any named entry was skipped during catalog traversal.
    pub fn incomplete(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Builds display sections in catalog order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Assembler {
    report_type: ReportType,
    policy: MissingPolicy,
}

impl Assembler {
    pub fn new(report_type: ReportType, policy: MissingPolicy) -> Self {
        Self {
            report_type,
            policy,
        }
    }

    pub fn policy(&self) -> MissingPolicy {
        self.policy
    }

    /// Sections for `view`. Under strict policy every catalog page must be
    /// present for both devices.
    pub fn assemble(
        &self,
        canonical: &CanonicalReport,
        view: DeviceView,
    ) -> Result<Vec<DisplaySection>, ReportError> {
        let catalog = self.report_type.catalog();

        if self.policy == MissingPolicy::Strict {
            self.check_complete(canonical)?;
        }

        let mut sections = Vec::new();
        for page in catalog {
            let Some(body) = canonical.get(*page, view) else {
                debug!("No {} section for '{}', omitting", view, page);
                continue;
            };
            sections.push(DisplaySection {
                title: page.title().to_string(),
                content: body.content(),
                score: body.score,
                color_class: ColorClass::for_score(body.score),
            });
        }

        Ok(sections)
    }

    fn check_complete(&self, canonical: &CanonicalReport) -> Result<(), ReportError> {
        for page in self.report_type.catalog() {
            for &device in DeviceView::all() {
                if canonical.get(*page, device).is_none() {
                    let missing = SectionRef {
                        page: *page,
                        device,
                    };
                    warn!("Strict render aborted: missing section {}", missing);
                    return Err(ReportError::MissingSection(missing));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PageKey, BASE_CATALOG};
    use crate::report::types::SectionBody;

    fn body(score: i64) -> SectionBody {
        SectionBody {
            explanation: "• Finding".to_string(),
            average: String::new(),
            recommendations: String::new(),
            score,
        }
    }

    fn full_report() -> CanonicalReport {
        let mut canonical = CanonicalReport::default();
        for page in BASE_CATALOG {
            for &device in DeviceView::all() {
                canonical.insert(*page, device, body(4));
            }
        }
        canonical
    }

    #[test]
    fn follows_catalog_order_not_insertion_order() {
        let mut canonical = CanonicalReport::default();
        canonical.insert(PageKey::Footer, DeviceView::Desktop, body(2));
        canonical.insert(PageKey::Home, DeviceView::Desktop, body(5));
        canonical.insert(PageKey::Cart, DeviceView::Desktop, body(3));

        let sections = Assembler::default()
            .assemble(&canonical, DeviceView::Desktop)
            .unwrap();
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();

        assert_eq!(titles, vec!["HOME PAGE", "CART PAGE", "FOOTER"]);
        assert_eq!(sections[0].color_class, ColorClass::Excellent);
        assert_eq!(sections[2].color_class, ColorClass::Bad);
    }

    #[test]
    fn deep_pages_come_first() {
        let mut canonical = full_report();
        canonical.insert(PageKey::Navigation, DeviceView::Mobile, body(3));

        let sections = Assembler::new(ReportType::Deep, MissingPolicy::Lenient)
            .assemble(&canonical, DeviceView::Mobile)
            .unwrap();

        assert_eq!(sections.len(), 7);
        assert_eq!(sections[0].title, "NAVIGATION");
        assert_eq!(sections[1].title, "HOME PAGE");
    }

    #[test]
    fn basic_mode_ignores_deep_pages() {
        let mut canonical = CanonicalReport::default();
        canonical.insert(PageKey::Search, DeviceView::Desktop, body(4));

        let sections = Assembler::default()
            .assemble(&canonical, DeviceView::Desktop)
            .unwrap();
        assert!(sections.is_empty());
    }

    #[test]
    fn strict_aborts_on_any_missing_combination() {
        let mut canonical = full_report();
        canonical.sections.remove(&(PageKey::Checkout, DeviceView::Mobile));

        let result = Assembler::new(ReportType::Basic, MissingPolicy::Strict)
            .assemble(&canonical, DeviceView::Desktop);

        assert!(matches!(
            result,
            Err(ReportError::MissingSection(SectionRef {
                page: PageKey::Checkout,
                device: DeviceView::Mobile
            }))
        ));
    }

    #[test]
    fn strict_passes_complete_report() {
        let assembler = Assembler::new(ReportType::Basic, MissingPolicy::Strict);
        assert_eq!(assembler.policy(), MissingPolicy::Strict);

        let sections = assembler
            .assemble(&full_report(), DeviceView::Mobile)
            .unwrap();
        assert_eq!(sections.len(), BASE_CATALOG.len());
    }

    #[test]
    fn display_section_serializes_camel_case() {
        let section = DisplaySection {
            title: "FOOTER".to_string(),
            content: String::new(),
            score: 0,
            color_class: ColorClass::Neutral,
        };
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["colorClass"], "bg-gray-300");
    }

    #[test]
    fn failed_view_carries_message() {
        let view = ReportView::failed(true);
        assert!(view.sections.is_empty());
        assert!(view.cached);
        assert_eq!(view.error.as_deref(), Some(LOAD_FAILURE_MESSAGE));
        assert!(!view.incomplete());
    }

    #[test]
    fn policy_parse() {
        assert_eq!("STRICT".parse::<MissingPolicy>().unwrap(), MissingPolicy::Strict);
        assert!("loose".parse::<MissingPolicy>().is_err());
    }
}
