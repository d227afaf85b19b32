use anyhow::Result;
use std::io;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

pub fn init_logging(verbose_level: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    // 0 = warn (command output goes to stdout), 1 = debug, 2+ = trace
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose_level > 0 {
        let filter_str = match verbose_level {
            1 => "debug,hyper=warn,reqwest=info",
            _ => "trace",
        };
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_str))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let json = std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or(false);

    let registry = Registry::default().with(filter);

    if let Some(log_path) = log_file {
        let log_dir = log_path.parent()
            .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
        std::fs::create_dir_all(log_dir)?;
        let log_filename = log_path.file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;

        // nexttowatch.log rotates into nexttowatch.2026-01-17 etc.
        let log_prefix = log_filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(log_filename);

        let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, log_prefix);

        if json {
            let json_layer = fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(file_appender);

            registry.with(json_layer).init();
        } else {
            let fmt_layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(file_appender);

            registry.with(fmt_layer).init();
        }
    } else if json {
        let json_layer = fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);

        registry.with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(io::stderr().is_terminal())
            .with_writer(io::stderr);

        registry.with(fmt_layer).init();
    }

    Ok(())
}
