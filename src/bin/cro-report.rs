use clap::Parser;
use log::LevelFilter;

use cro_report::app;
use cro_report::cli::Cli;
use cro_report::config::RenderConfig;

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_target(false)
        .format_timestamp(None)
        .init();

    // Build config from environment, then apply CLI overrides
    let config = RenderConfig::from_env().with_overrides(
        cli.view,
        cli.report_type,
        cli.policy,
        cli.format,
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = app::run(&cli, config, &mut out) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
