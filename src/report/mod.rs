//! Report extraction engine.
//!
//! Turns an analysis payload into an ordered, per-device sequence of display
//! sections. Free text and typed reports are two [`SectionSource`]
//! implementations producing the same [`CanonicalReport`]; coloring and
//! assembly never see the payload shape.

pub mod adapter;
pub mod assembler;
pub mod color;
pub mod extractor;
pub mod format;
pub mod scanner;
pub mod types;

pub use adapter::StructuredSource;
pub use assembler::{
    Assembler, DisplaySection, MissingPolicy, ReportView, LOAD_FAILURE_MESSAGE,
};
pub use color::ColorClass;
pub use extractor::TextSource;
pub use types::{
    CanonicalReport, Criterion, DevicePair, Label, PageDeviceRecord, SectionBody, SectionRef,
    StructuredReport,
};

use log::{debug, info};

use crate::catalog::{DeviceView, PageKey, ReportType};
use crate::payload::RawPayload;

/// Errors that abort a render.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Missing report section: {0}")]
    MissingSection(SectionRef),
}

/// Produces canonical sections from one payload shape.
pub trait SectionSource {
    /// Sections for the pages of `catalog` that the payload carries.
    fn collect(&self, catalog: &[PageKey]) -> CanonicalReport;

    /// Human-readable name for this source.
    fn name(&self) -> &'static str;
}

/// Selected device, report type and missing-section policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub view: DeviceView,
    pub report_type: ReportType,
    pub policy: MissingPolicy,
}

impl RenderOptions {
    pub fn new(view: DeviceView, report_type: ReportType) -> Self {
        Self {
            view,
            report_type,
            policy: MissingPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MissingPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Pick the source for a payload.
pub fn source_for(payload: &RawPayload) -> Box<dyn SectionSource + '_> {
    match payload {
        RawPayload::Text(text) => Box::new(TextSource::new(text)),
        RawPayload::Structured(report) => Box::new(StructuredSource::new(report)),
    }
}

/// Render a payload, surfacing a strict-policy abort as an error.
pub fn try_render(
    payload: &RawPayload,
    options: &RenderOptions,
    cached: bool,
) -> Result<ReportView, ReportError> {
    let source = source_for(payload);
    let canonical = source.collect(options.report_type.catalog());
    debug!(
        "Collected {} sections from {} payload ({} gaps)",
        canonical.sections.len(),
        source.name(),
        canonical.gaps.len()
    );

    let assembler = Assembler::new(options.report_type, options.policy);
    debug!("Assembling with {} policy", assembler.policy());
    let sections = assembler.assemble(&canonical, options.view)?;

    info!(
        "Rendered {} {} sections for {} view",
        sections.len(),
        options.report_type,
        options.view
    );

    Ok(ReportView {
        cached,
        sections,
        skipped: canonical.gaps,
        error: None,
    })
}

/// Render a payload. A strict-policy abort yields an empty view carrying
/// [`LOAD_FAILURE_MESSAGE`].
pub fn render(payload: &RawPayload, options: &RenderOptions, cached: bool) -> ReportView {
    try_render(payload, options, cached).unwrap_or_else(|_| ReportView::failed(cached))
}
