use std::process::ExitCode;

mod cli;
mod sample_events;

use calgrid::storage::config::Config;
use cli::{USAGE, parse_cli_mode, run};

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let options = match parse_cli_mode() {
        Ok(Some(options)) => options,
        Ok(None) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(view = %options.view, date = %options.date, "rendering calendar");

    if let Err(e) = run(options).await {
        eprintln!("Error: {:#}", e);
        tracing::error!("calgrid failed: {:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging() {
    let log_dir = Config::config_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "calgrid.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("calgrid started");
}
