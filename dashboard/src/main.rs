//! Recording dashboard - Entry Point
//!
//! Polls a remote recording service and mirrors its health, devices and
//! recordings into a local panel that operators drive through commands.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use recdash::app::options::AppOptions;
use recdash::app::run::{run, run_once};
use recdash::logs::{init_logging, LogLevel, LogOptions};
use recdash::settings::Settings;
use recdash::utils::version_info;

#[derive(Parser, Debug)]
#[command(name = "recdash")]
#[command(about = "Recording device dashboard", long_about = None)]
struct Args {
    /// Path to the JSON settings file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Recorder API base URL, overrides the settings file
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Poll everything once, print the panel as JSON and exit
    #[arg(long)]
    once: bool,

    /// Print version information and exit
    #[arg(long)]
    version: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Print version and exit
    if args.version {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to serialize version info: {e}"),
        }
        return ExitCode::SUCCESS;
    }

    // Retrieve the settings file
    let mut settings = match &args.config {
        Some(path) => match Settings::load(path).await {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Unable to read settings file {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    if let Some(base_url) = args.base_url {
        settings.backend.base_url = base_url;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level,
        json_format: settings.log_json,
        log_dir: settings.log_dir.clone(),
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let options = AppOptions::from(&settings);

    if args.once {
        return match run_once(options).await {
            Ok(panel) => match serde_json::to_string_pretty(&panel) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("Failed to serialize panel: {e}");
                    ExitCode::FAILURE
                }
            },
            Err(e) => {
                error!("Single poll failed: {e}");
                ExitCode::FAILURE
            }
        };
    }

    info!("Running recording dashboard with options: {:?}", options);
    match run(options, await_shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to run the dashboard: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("Failed to listen for SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to listen for SIGINT");

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("Ctrl+C received, shutting down...");
    }
}
