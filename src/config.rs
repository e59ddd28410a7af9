//! Render configuration.
//!
//! Settings can be configured via:
//! - CLI arguments: `--view`, `--report-type`, `--policy`, `--format`
//! - Environment variables: `CRO_REPORT_VIEW`, `CRO_REPORT_TYPE`,
//!   `CRO_REPORT_POLICY`, `CRO_REPORT_FORMAT`
//!
//! CLI arguments take precedence over environment variables.

use std::env;
use std::str::FromStr;

use log::warn;

use crate::catalog::{DeviceView, ReportType};
use crate::report::format::OutputFormat;
use crate::report::{MissingPolicy, RenderOptions};

pub const VIEW_ENV: &str = "CRO_REPORT_VIEW";
pub const REPORT_TYPE_ENV: &str = "CRO_REPORT_TYPE";
pub const POLICY_ENV: &str = "CRO_REPORT_POLICY";
pub const FORMAT_ENV: &str = "CRO_REPORT_FORMAT";

/// Configuration for one render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderConfig {
    pub view: DeviceView,
    pub report_type: ReportType,
    pub policy: MissingPolicy,
    pub format: OutputFormat,
}

impl RenderConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables. Unknown values are logged
    /// and replaced by defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            view: parse_setting(&lookup, VIEW_ENV),
            report_type: parse_setting(&lookup, REPORT_TYPE_ENV),
            policy: parse_setting(&lookup, POLICY_ENV),
            format: parse_setting(&lookup, FORMAT_ENV),
        }
    }

    /// Merge with CLI overrides. CLI values take precedence.
    pub fn with_overrides(
        mut self,
        view: Option<DeviceView>,
        report_type: Option<ReportType>,
        policy: Option<MissingPolicy>,
        format: Option<OutputFormat>,
    ) -> Self {
        if let Some(v) = view {
            self.view = v;
        }
        if let Some(t) = report_type {
            self.report_type = t;
        }
        if let Some(p) = policy {
            self.policy = p;
        }
        if let Some(f) = format {
            self.format = f;
        }
        self
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(self.view, self.report_type).with_policy(self.policy)
    }
}

fn parse_setting<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> T
where
    T: FromStr<Err = String> + Default,
{
    match lookup(key) {
        Some(value) => value.parse().unwrap_or_else(|e| {
            warn!("Ignoring {}: {}", key, e);
            T::default()
        }),
        None => T::default(),
    }
}
