//! Core types for report extraction.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{DeviceView, PageKey};

/// Discrete quality rating attached to a page/device evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Excellent,
    Good,
    #[serde(rename = "Can Be Improved")]
    CanBeImproved,
    Bad,
}

impl Label {
    /// Fixed numeric score for this label.
    pub fn score(&self) -> i64 {
        match self {
            Self::Excellent => 5,
            Self::Good => 4,
            Self::CanBeImproved => 3,
            Self::Bad => 2,
        }
    }

    /// Label for a numeric average. Bands do not overlap.
    pub fn from_average(average: f64) -> Self {
        if average >= 4.5 {
            Self::Excellent
        } else if average >= 3.5 {
            Self::Good
        } else if average >= 2.5 {
            Self::CanBeImproved
        } else {
            Self::Bad
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::CanBeImproved => "Can Be Improved",
            Self::Bad => "Bad",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect();
        match normalized.split_whitespace().collect::<Vec<_>>().join(" ").as_str() {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "can be improved" => Ok(Self::CanBeImproved),
            "bad" => Ok(Self::Bad),
            _ => Err(format!("Unknown label: {}", s)),
        }
    }
}

/// A single evaluated finding within a page/device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    #[serde(default, alias = "criterion", alias = "title")]
    pub name: String,
    #[serde(default, alias = "observation")]
    pub finding: String,
    #[serde(default, with = "score_serde")]
    pub score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "suggestion")]
    pub improvement: Option<String>,
}

/// Criterion scores arrive as integers, floats or numeric strings. Floats are
/// rounded; anything unreadable is 0.
mod score_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(score: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(*score)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let number = match &value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(round)),
            Value::String(s) => s.trim().parse::<f64>().ok().map(round),
            _ => None,
        };
        Ok(number.unwrap_or(0))
    }

    fn round(value: f64) -> i64 {
        value.round() as i64
    }
}

/// Evaluation of one page on one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDeviceRecord {
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub average_score: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl PageDeviceRecord {
    /// Label as declared, falling back to the band of the average score.
    pub fn resolved_label(&self) -> Option<Label> {
        self.label
            .as_deref()
            .and_then(|l| l.parse().ok())
            .or_else(|| self.average_score.map(Label::from_average))
    }

    /// Aggregate score used for coloring; 0 when nothing is known.
    pub fn score(&self) -> i64 {
        self.resolved_label().map(|l| l.score()).unwrap_or(0)
    }
}

/// Desktop and mobile evaluations of one page. `None` means the payload
/// named the page but carried no usable record for that device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DevicePair {
    pub desktop: Option<PageDeviceRecord>,
    pub mobile: Option<PageDeviceRecord>,
}

impl DevicePair {
    pub fn get(&self, device: DeviceView) -> Option<&PageDeviceRecord> {
        match device {
            DeviceView::Desktop => self.desktop.as_ref(),
            DeviceView::Mobile => self.mobile.as_ref(),
        }
    }

    fn from_value(page: PageKey, value: &Value) -> Self {
        let record = |device: DeviceView| -> Option<PageDeviceRecord> {
            let raw = value.get(device.to_string())?;
            if raw.is_null() {
                return None;
            }
            match serde_json::from_value(raw.clone()) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Malformed {} record for page '{}': {}", device, page, e);
                    None
                }
            }
        };
        Self {
            desktop: record(DeviceView::Desktop),
            mobile: record(DeviceView::Mobile),
        }
    }
}

/// Typed report keyed by page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredReport {
    pub pages: BTreeMap<PageKey, DevicePair>,
}

impl StructuredReport {
    /// Whether a JSON value has the shape of a typed report, either bare or
    /// wrapped under `pages`.
    pub fn looks_structured(value: &Value) -> bool {
        let Some(map) = Self::page_map(value) else {
            return false;
        };
        map.keys().any(|k| parse_page_key(k).is_some())
    }

    /// Build a report from JSON. Unknown page keys are skipped; pages given as
    /// `null` are kept with both devices absent.
    pub fn from_value(value: &Value) -> Self {
        let mut pages = BTreeMap::new();
        let Some(map) = Self::page_map(value) else {
            return Self { pages };
        };

        for (key, entry) in map {
            let Some(page) = parse_page_key(key) else {
                debug!("Ignoring unknown page key '{}'", key);
                continue;
            };
            pages.insert(page, DevicePair::from_value(page, entry));
        }

        Self { pages }
    }

    pub fn get(&self, page: PageKey, device: DeviceView) -> Option<&PageDeviceRecord> {
        self.pages.get(&page).and_then(|pair| pair.get(device))
    }

    fn page_map(value: &Value) -> Option<&serde_json::Map<String, Value>> {
        match value.get("pages") {
            Some(Value::Object(pages)) => Some(pages),
            _ => value.as_object(),
        }
    }
}

fn parse_page_key(key: &str) -> Option<PageKey> {
    serde_json::from_value(Value::String(key.to_string())).ok()
}

/// Display blocks for one page/device, in the shape both payload paths
/// produce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionBody {
    /// Criteria/findings block.
    pub explanation: String,
    /// Average-score summary line(s).
    pub average: String,
    /// Recommendations header and its bullets.
    pub recommendations: String,
    /// Aggregate score; 0 means unknown.
    pub score: i64,
}

impl SectionBody {
    /// Explanation, average line and recommendations, skipping empty blocks,
    /// separated by a blank line.
    pub fn content(&self) -> String {
        [&self.explanation, &self.average, &self.recommendations]
            .iter()
            .map(|block| block.trim())
            .filter(|block| !block.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A page/device entry the payload named but did not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SectionRef {
    pub page: PageKey,
    pub device: DeviceView,
}

impl std::fmt::Display for SectionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.page, self.device)
    }
}

/// Canonical per-(page, device) sections produced by either payload path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalReport {
    pub sections: BTreeMap<(PageKey, DeviceView), SectionBody>,
    /// Entries claimed by the payload but structurally absent.
    pub gaps: Vec<SectionRef>,
}

impl CanonicalReport {
    pub fn get(&self, page: PageKey, device: DeviceView) -> Option<&SectionBody> {
        self.sections.get(&(page, device))
    }

    pub fn insert(&mut self, page: PageKey, device: DeviceView, body: SectionBody) {
        self.sections.insert((page, device), body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn label_scores() {
        assert_eq!(Label::Excellent.score(), 5);
        assert_eq!(Label::Good.score(), 4);
        assert_eq!(Label::CanBeImproved.score(), 3);
        assert_eq!(Label::Bad.score(), 2);
    }

    #[test]
    fn label_parse_variants() {
        assert_eq!("can be improved".parse::<Label>().unwrap(), Label::CanBeImproved);
        assert_eq!("Can-Be-Improved".parse::<Label>().unwrap(), Label::CanBeImproved);
        assert_eq!(" GOOD ".parse::<Label>().unwrap(), Label::Good);
        assert!("Mediocre".parse::<Label>().is_err());
    }

    #[test]
    fn label_bands_do_not_overlap() {
        assert_eq!(Label::from_average(5.0), Label::Excellent);
        assert_eq!(Label::from_average(4.5), Label::Excellent);
        assert_eq!(Label::from_average(4.49), Label::Good);
        assert_eq!(Label::from_average(3.5), Label::Good);
        assert_eq!(Label::from_average(3.0), Label::CanBeImproved);
        assert_eq!(Label::from_average(2.49), Label::Bad);
        assert_eq!(Label::from_average(0.0), Label::Bad);
    }

    #[test]
    fn record_score_prefers_declared_label() {
        let record = PageDeviceRecord {
            criteria: vec![],
            average_score: Some(2.0),
            label: Some("Excellent".to_string()),
            recommendations: vec![],
        };
        assert_eq!(record.score(), 5);
    }

    #[test]
    fn record_score_falls_back_to_average() {
        let record = PageDeviceRecord {
            criteria: vec![],
            average_score: Some(3.8),
            label: Some("???".to_string()),
            recommendations: vec![],
        };
        assert_eq!(record.score(), 4);

        let empty = PageDeviceRecord {
            criteria: vec![],
            average_score: None,
            label: None,
            recommendations: vec![],
        };
        assert_eq!(empty.score(), 0);
    }

    #[test]
    fn structured_report_from_wrapped_pages() {
        let value = json!({
            "pages": {
                "home": {
                    "desktop": {
                        "criteria": [{ "name": "CTA", "finding": "Clear", "score": 4 }],
                        "average_score": 4,
                        "label": "Good",
                        "recommendations": ["Add reviews"]
                    },
                    "mobile": null
                },
                "pricing": { "desktop": {}, "mobile": {} }
            }
        });
        let report = StructuredReport::from_value(&value);

        assert_eq!(report.pages.len(), 1);
        let desktop = report.get(PageKey::Home, DeviceView::Desktop).unwrap();
        assert_eq!(desktop.criteria[0].name, "CTA");
        assert!(report.get(PageKey::Home, DeviceView::Mobile).is_none());
    }

    #[test]
    fn malformed_record_is_absent() {
        let value = json!({ "cart": { "desktop": { "criteria": "oops" } } });
        let report = StructuredReport::from_value(&value);
        assert!(report.pages.contains_key(&PageKey::Cart));
        assert!(report.get(PageKey::Cart, DeviceView::Desktop).is_none());
    }

    #[test]
    fn criterion_scores_are_tolerant() {
        let value = json!({
            "home": {
                "desktop": {
                    "criteria": [
                        { "name": "CTA", "finding": "ok", "score": 4.5 },
                        { "finding": "Unnamed finding", "score": "3" },
                        { "name": "Trust", "score": null }
                    ],
                    "average_score": 4.5,
                    "label": "Excellent",
                    "recommendations": []
                },
                "mobile": { "criteria": [{ "name": "Menu", "score": 2.4 }] }
            }
        });
        let report = StructuredReport::from_value(&value);

        let desktop = report.get(PageKey::Home, DeviceView::Desktop).unwrap();
        let scores: Vec<_> = desktop.criteria.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![5, 3, 0]);
        assert_eq!(desktop.criteria[1].name, "");
        assert_eq!(desktop.score(), 5);

        let mobile = report.get(PageKey::Home, DeviceView::Mobile).unwrap();
        assert_eq!(mobile.criteria[0].score, 2);
    }

    #[test]
    fn section_body_skips_empty_blocks() {
        let body = SectionBody {
            explanation: "• One".to_string(),
            average: String::new(),
            recommendations: "**Recommendations:**\n• Two".to_string(),
            score: 0,
        };
        assert_eq!(body.content(), "• One\n\n**Recommendations:**\n• Two");
        assert_eq!(SectionBody::default().content(), "");
    }
}
