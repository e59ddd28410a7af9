//! Shared test utilities for creating test fixtures.
//!
//! This module provides helper functions for creating report records
//! used across multiple test modules.

use crate::catalog::PageKey;
use crate::report::types::{Criterion, DevicePair, PageDeviceRecord, StructuredReport};

/// Create a criterion without rationale or improvement text
pub fn make_criterion(name: &str, finding: &str, score: i64) -> Criterion {
    Criterion {
        name: name.to_string(),
        finding: finding.to_string(),
        score,
        rationale: None,
        improvement: None,
    }
}

/// Create a record with one criterion and the given summary
pub fn make_record(average: f64, label: &str, recommendations: &[&str]) -> PageDeviceRecord {
    PageDeviceRecord {
        criteria: vec![make_criterion("Clear CTA", "Prominent button", 4)],
        average_score: Some(average),
        label: Some(label.to_string()),
        recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
    }
}

/// Create a typed report carrying "Good" records for both devices of each page
pub fn structured_report(pages: &[PageKey]) -> StructuredReport {
    let mut report = StructuredReport::default();
    for page in pages {
        report.pages.insert(
            *page,
            DevicePair {
                desktop: Some(make_record(4.0, "Good", &["Add reviews"])),
                mobile: Some(make_record(4.0, "Good", &[])),
            },
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DeviceView;

    #[test]
    fn test_make_record() {
        let record = make_record(3.0, "Can Be Improved", &["One"]);
        assert_eq!(record.criteria.len(), 1);
        assert_eq!(record.score(), 3);
    }

    #[test]
    fn test_structured_report() {
        let report = structured_report(&[PageKey::Home, PageKey::Footer]);
        assert_eq!(report.pages.len(), 2);
        assert!(report.get(PageKey::Footer, DeviceView::Mobile).is_some());
    }
}
