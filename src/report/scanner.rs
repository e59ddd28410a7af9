//! Line grammar and segment scanner for free-text reports.
//!
//! Every line is classified once by an ordered list of classifiers; the
//! scanner is a single forward pass over the classified lines that routes
//! content into (page, device) buckets.
//!
//! Two marker encodings are understood:
//! - `<!-- DEVICE:desktop -->` opens the desktop block of the *next* catalog
//!   page, `<!-- DEVICE:mobile -->` the mobile block of the same page.
//! - Bold or heading lines naming a page and a device, such as
//!   `**Cart Page – Mobile**`, select the page by name.

use std::collections::BTreeMap;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::{DeviceView, PageKey};

static DEVICE_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^<!--\s*DEVICE\s*:\s*(desktop|mobile)\s*-->$").unwrap()
});

static COMMENT_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<!--.*-->$").unwrap());

static BOLD_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:#{1,6}\s*)?\*\*(.+?)\*\*\s*:?$").unwrap());

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+(.+?)\s*$").unwrap());

static PAGE_DEVICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)\s*(?:[-–—:|/(]\s*)+(desktop|mobile)(?:\s+view)?\s*\)?\s*:?$").unwrap()
});

static SUMMARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:Average\s+Score\b|Rating\s*:|Score\s*:)").unwrap());

static RECOMMENDATIONS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Recommendations?\s*(?:\([^)]*\))?\s*[:\-–—]").unwrap()
});

static EXPLANATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Explanation\s*(?:\([^)]*\))?\s*(?:[:\-–—].*)?$").unwrap()
});

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[•\-*]|\d+[.)])\s+\S").unwrap());

/// Kind of a single report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// `<!-- DEVICE:... -->` marker.
    DeviceMarker(DeviceView),
    /// Bold/heading line naming a known page and a device.
    PageHeader { page: PageKey, device: DeviceView },
    /// Page/device header naming a page no catalog knows. Closes the
    /// active block so its content is dropped.
    UnknownPageHeader,
    /// Any other marker-like line; ignored.
    UnknownMarker,
    /// "Average Score", "Rating:" or "Score:" line.
    Summary,
    RecommendationsHeader,
    ExplanationHeader,
    Bullet,
    Narrative,
}

impl LineKind {
    /// Whether the line is kept in a section body.
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            Self::Summary | Self::RecommendationsHeader | Self::ExplanationHeader | Self::Bullet
        )
    }
}

type Classifier = fn(&str) -> Option<LineKind>;

/// Evaluated in order; the first match wins.
const CLASSIFIERS: &[Classifier] = &[
    classify_blank,
    classify_device_marker,
    classify_comment_marker,
    classify_summary,
    classify_recommendations,
    classify_explanation,
    classify_page_header,
    classify_bullet,
];

/// Classify one trimmed line.
pub fn classify(line: &str) -> LineKind {
    CLASSIFIERS
        .iter()
        .find_map(|classifier| classifier(line))
        .unwrap_or(LineKind::Narrative)
}

/// Remove markdown bold markers.
pub fn strip_bold(line: &str) -> String {
    line.replace("**", "")
}

fn classify_blank(line: &str) -> Option<LineKind> {
    line.trim().is_empty().then_some(LineKind::Blank)
}

fn classify_device_marker(line: &str) -> Option<LineKind> {
    let caps = DEVICE_MARKER_RE.captures(line)?;
    caps[1].parse().ok().map(LineKind::DeviceMarker)
}

fn classify_comment_marker(line: &str) -> Option<LineKind> {
    COMMENT_MARKER_RE
        .is_match(line)
        .then_some(LineKind::UnknownMarker)
}

fn classify_summary(line: &str) -> Option<LineKind> {
    SUMMARY_RE
        .is_match(strip_bold(line).trim_start())
        .then_some(LineKind::Summary)
}

fn classify_recommendations(line: &str) -> Option<LineKind> {
    RECOMMENDATIONS_RE
        .is_match(strip_bold(line).trim_start())
        .then_some(LineKind::RecommendationsHeader)
}

fn classify_explanation(line: &str) -> Option<LineKind> {
    EXPLANATION_RE
        .is_match(strip_bold(line).trim())
        .then_some(LineKind::ExplanationHeader)
}

fn classify_page_header(line: &str) -> Option<LineKind> {
    let inner = BOLD_HEADER_RE
        .captures(line)
        .or_else(|| HEADING_RE.captures(line))?
        .get(1)?
        .as_str()
        .to_string();
    let plain = strip_bold(&inner);
    let caps = PAGE_DEVICE_RE.captures(plain.trim())?;
    let device: DeviceView = caps[2].parse().ok()?;
    match PageKey::from_name(&caps[1]) {
        Some(page) => Some(LineKind::PageHeader { page, device }),
        None => Some(LineKind::UnknownPageHeader),
    }
}

fn classify_bullet(line: &str) -> Option<LineKind> {
    BULLET_RE.is_match(line).then_some(LineKind::Bullet)
}

/// Scanned text per (page, device), each joined and trimmed.
pub type Segments = BTreeMap<(PageKey, DeviceView), String>;

/// Single-pass scanner partitioning normalized text by catalog page and device.
pub struct SegmentScanner<'a> {
    catalog: &'a [PageKey],
}

impl<'a> SegmentScanner<'a> {
    pub fn new(catalog: &'a [PageKey]) -> Self {
        Self { catalog }
    }

    /// Scan normalized text (see [`crate::payload::normalize_text`]).
    pub fn scan(&self, text: &str) -> Segments {
        let mut buckets: BTreeMap<(PageKey, DeviceView), Vec<&str>> = BTreeMap::new();
        let mut page_index: Option<usize> = None;
        let mut active: Option<(PageKey, DeviceView)> = None;

        for (line_no, line) in text.lines().enumerate() {
            match classify(line) {
                LineKind::DeviceMarker(DeviceView::Desktop) => {
                    let index = page_index.map_or(0, |i| i + 1);
                    page_index = Some(index);
                    active = self.open(&mut buckets, index, DeviceView::Desktop, line_no);
                }
                LineKind::DeviceMarker(DeviceView::Mobile) => match page_index {
                    Some(index) => {
                        active = self.open(&mut buckets, index, DeviceView::Mobile, line_no);
                    }
                    None => {
                        debug!("Line {}: mobile marker before any page, ignoring", line_no + 1);
                        active = None;
                    }
                },
                LineKind::PageHeader { page, device } => {
                    match self.catalog.iter().position(|p| *p == page) {
                        Some(index) => {
                            page_index = Some(index);
                            buckets.insert((page, device), Vec::new());
                            active = Some((page, device));
                        }
                        None => {
                            debug!(
                                "Line {}: page '{}' not in this report's catalog, dropping block",
                                line_no + 1,
                                page
                            );
                            active = None;
                        }
                    }
                }
                LineKind::UnknownPageHeader => {
                    debug!("Line {}: unknown page header '{}', dropping block", line_no + 1, line);
                    active = None;
                }
                LineKind::UnknownMarker => {
                    debug!("Line {}: ignoring unknown marker '{}'", line_no + 1, line);
                }
                kind if kind.is_content() => {
                    if let Some(key) = active {
                        buckets.entry(key).or_default().push(line);
                    }
                }
                _ => {}
            }
        }

        buckets
            .into_iter()
            .map(|(key, lines)| (key, lines.join("\n").trim().to_string()))
            .collect()
    }

    /// Open the bucket for the page at `index`, replacing any earlier block.
    fn open<'t>(
        &self,
        buckets: &mut BTreeMap<(PageKey, DeviceView), Vec<&'t str>>,
        index: usize,
        device: DeviceView,
        line_no: usize,
    ) -> Option<(PageKey, DeviceView)> {
        let Some(page) = self.catalog.get(index).copied() else {
            warn!(
                "Line {}: {} marker for page #{} exceeds catalog of {} pages, dropping block",
                line_no + 1,
                device,
                index + 1,
                self.catalog.len()
            );
            return None;
        };
        buckets.insert((page, device), Vec::new());
        Some((page, device))
    }
}
