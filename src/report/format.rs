//! Text and JSON dumps of an assembled report view.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::catalog::{DeviceView, ReportType};
use crate::report::assembler::{DisplaySection, ReportView};

const CACHED_BANNER: &str = "This report was previously generated and loaded from cache.";

/// Output format for rendered reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable formatted output.
    #[default]
    Pretty,
    /// JSON view model.
    Json,
    /// Markdown report.
    Markdown,
    /// One line per section.
    Compact,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "compact" => Ok(Self::Compact),
            _ => Err(format!(
                "Unknown format: '{}'. Valid options: pretty, json, markdown, compact",
                s
            )),
        }
    }
}

/// Format a report view for output.
pub fn format_view(
    view: &ReportView,
    device: DeviceView,
    report_type: ReportType,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Pretty => format_pretty(view, device, report_type),
        OutputFormat::Json => format_json(view),
        OutputFormat::Markdown => format_markdown(view, device, report_type),
        OutputFormat::Compact => format_compact(view),
    }
}

fn format_pretty(view: &ReportView, device: DeviceView, report_type: ReportType) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "CRO Report ({}, {} view)\n",
        report_type,
        device
    ));
    if view.cached {
        output.push_str(&format!("\x1b[2m{}\x1b[0m\n", CACHED_BANNER));
    }
    output.push('\n');

    if let Some(error) = &view.error {
        output.push_str(&format!("{}\n", error));
        return output;
    }

    if view.sections.is_empty() {
        output.push_str("No sections available.\n");
        return output;
    }

    for section in &view.sections {
        output.push_str(&format_section_pretty(section));
        output.push('\n');
    }

    output
}

fn format_section_pretty(section: &DisplaySection) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} \x1b[1m{}\x1b[0m  score {} [{}]\n",
        score_badge(section.score),
        section.title,
        section.score,
        section.color_class
    ));
    for line in section.content.lines() {
        output.push_str(&format!("    {}\n", line));
    }

    output
}

/// Colored dot matching the section's color class.
fn score_badge(score: i64) -> &'static str {
    match score {
        5 => "\x1b[32m●\x1b[0m",
        4 => "\x1b[92m●\x1b[0m",
        3 => "\x1b[33m●\x1b[0m",
        2 => "\x1b[31m●\x1b[0m",
        _ => "\x1b[90m●\x1b[0m",
    }
}

fn format_json(view: &ReportView) -> String {
    serde_json::to_string_pretty(view).unwrap_or_else(|e| format!("Error: {}", e))
}

fn format_markdown(view: &ReportView, device: DeviceView, report_type: ReportType) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "# CRO Report\n\n**View**: {}\n**Report type**: {}\n\n",
        device, report_type
    ));
    if view.cached {
        output.push_str(&format!("> {}\n\n", CACHED_BANNER));
    }

    if let Some(error) = &view.error {
        output.push_str(&format!("**Error**: {}\n", error));
        return output;
    }

    output.push_str("| Section | Score | Color |\n|---------|-------|-------|\n");
    for section in &view.sections {
        output.push_str(&format!(
            "| {} | {} | `{}` |\n",
            section.title, section.score, section.color_class
        ));
    }
    output.push('\n');

    for section in &view.sections {
        output.push_str(&format!("## {}\n\n", section.title));
        if !section.content.is_empty() {
            output.push_str(&section.content);
            output.push_str("\n\n");
        }
    }

    output
}

fn format_compact(view: &ReportView) -> String {
    let mut output = String::new();

    if let Some(error) = &view.error {
        output.push_str(&format!("error: {}\n", error));
        return output;
    }
    if view.cached {
        output.push_str("(cached)\n");
    }
    for section in &view.sections {
        output.push_str(&format!(
            "{} {} {}\n",
            section.score, section.color_class, section.title
        ));
    }

    output
}
