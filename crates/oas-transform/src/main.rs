//! `oas-transform` command-line entry point.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use oas_transform::{OpenApiParser, RunOptions, Runner, DEFAULT_CONFIG_PATH, DEFAULT_DOCS_DIR};
use oas_transform_telemetry::{init_logging, LogFormat, TelemetryConfig};

#[derive(Parser, Debug)]
#[command(
    name = "oas-transform",
    about = "Filter, sanitize and parse a directory of OpenAPI documents",
    version
)]
struct Cli {
    /// Filter configuration file (JSON with `ignoreFiles` / `whitelist`).
    #[arg(long, env = "OAS_TRANSFORM_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory holding the OpenAPI documents (not searched recursively).
    #[arg(long, env = "OAS_TRANSFORM_DOCS_DIR", default_value = DEFAULT_DOCS_DIR)]
    docs_dir: PathBuf,

    /// Print servers, paths and parameters of each parsed document.
    #[arg(long)]
    show_endpoints: bool,

    /// Log level filter. `RUST_LOG` takes precedence when set.
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format (json or pretty).
    #[arg(long, default_value = "pretty", value_parser = parse_log_format)]
    log_format: LogFormat,
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    LogFormat::parse(s).ok_or_else(|| format!("unknown log format '{}' (expected json or pretty)", s))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = TelemetryConfig::new()
        .with_service_name(env!("CARGO_PKG_NAME"))
        .with_log_level(cli.log_level)
        .with_log_format(cli.log_format);
    if let Err(e) = init_logging(&telemetry) {
        eprintln!("warning: {}", e);
    }
    tracing::debug!(service = %telemetry.service_name, version = env!("CARGO_PKG_VERSION"), "startup");

    let options = RunOptions {
        config_path: cli.config,
        docs_dir: cli.docs_dir,
        show_endpoints: cli.show_endpoints,
    };

    match Runner::new(options, OpenApiParser).run(io::stdout().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}
