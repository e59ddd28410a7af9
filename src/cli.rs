use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::catalog::{DeviceView, ReportType};
use crate::report::format::OutputFormat;
use crate::report::MissingPolicy;

/// Command line interface definition for cro-report.
#[derive(Parser, Debug)]
#[command(name = "cro-report")]
#[command(about = "Render a CRO analysis payload as an ordered per-device report")]
#[command(version)]
pub struct Cli {
    /// Payload file: response envelope, typed report JSON or free text.
    /// Reads stdin when omitted or `-`.
    #[arg(value_name = "PAYLOAD")]
    pub payload: Option<PathBuf>,

    /// Device view to render [env: CRO_REPORT_VIEW]
    #[arg(long, value_enum)]
    pub view: Option<DeviceView>,

    /// Report type selecting the page catalog [env: CRO_REPORT_TYPE]
    #[arg(short = 't', long, value_enum)]
    pub report_type: Option<ReportType>,

    /// Handling of missing page/device sections [env: CRO_REPORT_POLICY]
    #[arg(long, value_enum)]
    pub policy: Option<MissingPolicy>,

    /// Output format [env: CRO_REPORT_FORMAT]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Show the cached-report banner even if the payload does not say so
    #[arg(long)]
    pub cached: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbosity: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "cro-report",
            "report.json",
            "--view",
            "mobile",
            "-t",
            "deep",
            "--policy",
            "strict",
            "--format",
            "json",
            "--cached",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.payload, Some(PathBuf::from("report.json")));
        assert_eq!(cli.view, Some(DeviceView::Mobile));
        assert_eq!(cli.report_type, Some(ReportType::Deep));
        assert_eq!(cli.policy, Some(MissingPolicy::Strict));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(cli.cached);
        assert_eq!(cli.verbosity, 2);
    }

    #[test]
    fn defaults_leave_settings_unset() {
        let cli = Cli::try_parse_from(["cro-report"]).unwrap();
        assert!(cli.payload.is_none());
        assert!(cli.view.is_none());
        assert!(!cli.quiet);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["cro-report", "-q", "-v"]).is_err());
    }
}
