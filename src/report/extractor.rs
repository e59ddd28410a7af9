//! Splits one page/device text blob into display blocks and a score.
//!
//! Extraction never fails: unrecognised score syntax yields score 0.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::PageKey;
use crate::payload::normalize_text;
use crate::report::scanner::{classify, strip_bold, LineKind, SegmentScanner};
use crate::report::types::{CanonicalReport, Label, SectionBody};
use crate::report::SectionSource;

const LABEL_PATTERN: &str = r"(Excellent|Good|Can\s+Be\s+Improved|Bad)";

static AVERAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)Average\s+Score\s*\(\s*(?:Desktop|Mobile)\s*\)\s*:\s*[^→]*?(?:→|->)\s*{}",
        LABEL_PATTERN
    ))
    .unwrap()
});

static RATING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)^Rating\s*:\s*{}\b", LABEL_PATTERN)).unwrap());

static SCORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^Score\s*:\s*(-?\d+)\s*$").unwrap());

/// Section source backed by free text: normalize, scan, then extract each
/// segment.
pub struct TextSource<'a> {
    text: &'a str,
}

impl<'a> TextSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl SectionSource for TextSource<'_> {
    fn collect(&self, catalog: &[PageKey]) -> CanonicalReport {
        let normalized = normalize_text(self.text);
        let segments = SegmentScanner::new(catalog).scan(&normalized);
        debug!("Scanned {} page/device segments", segments.len());

        let mut canonical = CanonicalReport::default();
        for ((page, device), blob) in segments {
            canonical.insert(page, device, extract(&blob));
        }
        canonical
    }

    fn name(&self) -> &'static str {
        "text"
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Block {
    Explanation,
    Recommendations,
}

/// Separate a blob into explanation, average line and recommendations, and
/// derive its score.
pub fn extract(blob: &str) -> SectionBody {
    let mut explanation: Vec<String> = Vec::new();
    let mut average: Vec<String> = Vec::new();
    let mut recommendations: Vec<String> = Vec::new();
    let mut block = Block::Explanation;

    for line in blob.lines().map(str::trim) {
        match classify(line) {
            LineKind::ExplanationHeader => {
                block = Block::Explanation;
                if let Some(rest) = inline_text(line) {
                    explanation.push(rest);
                }
            }
            LineKind::RecommendationsHeader => {
                block = Block::Recommendations;
                recommendations.push(line.to_string());
            }
            LineKind::Summary => average.push(line.to_string()),
            LineKind::Bullet => match block {
                Block::Explanation => explanation.push(line.to_string()),
                Block::Recommendations => recommendations.push(line.to_string()),
            },
            _ => {}
        }
    }

    SectionBody {
        explanation: explanation.join("\n"),
        average: average.join("\n"),
        recommendations: recommendations.join("\n"),
        score: extract_score(blob),
    }
}

/// Score from the first matching rule: average line with label, rating
/// line, bare score line, else 0.
pub fn extract_score(blob: &str) -> i64 {
    let plain: Vec<String> = blob.lines().map(|l| strip_bold(l.trim())).collect();

    let label_score = |re: &Regex| {
        plain.iter().find_map(|line| {
            let caps = re.captures(line)?;
            caps[1].parse::<Label>().ok().map(|l| l.score())
        })
    };

    label_score(&*AVERAGE_RE)
        .or_else(|| label_score(&*RATING_RE))
        .or_else(|| {
            plain.iter().find_map(|line| {
                let caps = SCORE_RE.captures(line)?;
                caps[1].parse::<i64>().ok()
            })
        })
        .unwrap_or(0)
}

/// Text after the header's colon, if any.
fn inline_text(line: &str) -> Option<String> {
    let plain = strip_bold(line);
    let (_, rest) = plain.split_once(':')?;
    let rest = rest.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}
