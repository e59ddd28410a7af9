//! Application layer wiring payload loading, configuration and rendering.

use std::io::{self, Write};

use log::{info, warn};

use crate::cli::Cli;
use crate::config::RenderConfig;
use crate::payload::{read_response, PayloadError};
use crate::report::format::format_view;
use crate::report::{try_render, ReportError, ReportView};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Load the payload named on the command line, render it and write the
/// formatted view to `out`. A strict-policy abort still writes the failure
/// view before returning the error.
pub fn run<W: Write>(cli: &Cli, config: RenderConfig, out: &mut W) -> Result<(), AppError> {
    let response = read_response(cli.payload.as_deref())?;
    let cached = response.cached || cli.cached;
    info!(
        "Loaded {} payload (cached: {})",
        if response.payload.is_structured() {
            "structured"
        } else {
            "text"
        },
        cached
    );

    let options = config.render_options();
    let result = try_render(&response.payload, &options, cached);
    let view = match &result {
        Ok(view) => view.clone(),
        Err(e) => {
            warn!("{}", e);
            ReportView::failed(cached)
        }
    };

    let formatted = format_view(&view, config.view, config.report_type, config.format);
    out.write_all(formatted.as_bytes())?;
    if !formatted.ends_with('\n') {
        writeln!(out)?;
    }

    result.map(|_| ()).map_err(AppError::from)
}
