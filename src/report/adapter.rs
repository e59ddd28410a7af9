//! Maps typed reports straight into display blocks, without pattern matching.

use log::debug;

use crate::catalog::{DeviceView, PageKey};
use crate::report::types::{
    CanonicalReport, Criterion, PageDeviceRecord, SectionBody, SectionRef, StructuredReport,
};
use crate::report::SectionSource;

/// Section source backed by a [`StructuredReport`].
pub struct StructuredSource<'a> {
    report: &'a StructuredReport,
}

impl<'a> StructuredSource<'a> {
    pub fn new(report: &'a StructuredReport) -> Self {
        Self { report }
    }
}

impl SectionSource for StructuredSource<'_> {
    fn collect(&self, catalog: &[PageKey]) -> CanonicalReport {
        let mut canonical = CanonicalReport::default();

        for page in catalog {
            let Some(pair) = self.report.pages.get(page) else {
                continue;
            };
            for &device in DeviceView::all() {
                match pair.get(device) {
                    Some(record) => canonical.insert(*page, device, section_body(record, device)),
                    None => {
                        debug!("Structured report has no {} record for '{}'", device, page);
                        canonical.gaps.push(SectionRef {
                            page: *page,
                            device,
                        });
                    }
                }
            }
        }

        canonical
    }

    fn name(&self) -> &'static str {
        "structured"
    }
}

/// Display blocks for one typed record.
pub fn section_body(record: &PageDeviceRecord, device: DeviceView) -> SectionBody {
    SectionBody {
        explanation: record
            .criteria
            .iter()
            .map(format_criterion)
            .collect::<Vec<_>>()
            .join("\n"),
        average: format_average(record, device),
        recommendations: format_recommendations(&record.recommendations),
        score: record.score(),
    }
}

fn format_criterion(criterion: &Criterion) -> String {
    let name = criterion.name.trim();
    let finding = criterion.finding.trim();
    let mut line = match (name.is_empty(), finding.is_empty()) {
        (false, false) => format!("• {}: {} (Score: {})", name, finding, criterion.score),
        (true, false) => format!("• {} (Score: {})", finding, criterion.score),
        _ => format!("• {} (Score: {})", name, criterion.score),
    };

    let extras = [
        ("Rationale", &criterion.rationale),
        ("Improvement", &criterion.improvement),
    ];
    for (heading, text) in extras {
        if let Some(text) = text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            line.push_str(&format!("\n  {}: {}", heading, text));
        }
    }

    line
}

fn format_average(record: &PageDeviceRecord, device: DeviceView) -> String {
    let Some(label) = record.resolved_label() else {
        return String::new();
    };
    match record.average_score {
        Some(average) => format!(
            "**Average Score ({}):** {} → {}",
            device.label(),
            format_number(average),
            label
        ),
        None => format!("**Average Score ({}):** {}", device.label(), label),
    }
}

fn format_recommendations(recommendations: &[String]) -> String {
    let items: Vec<String> = recommendations
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .map(|r| format!("• {}", r))
        .collect();
    if items.is_empty() {
        return String::new();
    }
    format!("**Recommendations:**\n{}", items.join("\n"))
}

/// Two decimals at most, integers without a fraction.
fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded)
}
