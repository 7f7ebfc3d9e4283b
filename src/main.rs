use actix_web::{web, App, HttpServer};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};
mod api;
use crate::api::{
    health::health_config,
    settings::{settings_config, PluginSettings},
    storage::handlers::storage_config,
    validation,
    vertex::handlers::vertex_config,
};
mod cli;
mod config;
mod shutdown;
use crate::cli::{Cli, Command};
use crate::shutdown::ShutdownCoordinator;

fn init_logging(log_dir: &str) -> std::io::Result<()> {
    // Create logs directory if it doesn't exist
    std::fs::create_dir_all(log_dir)?;

    // Log files will be created as: logs/info.log.2025-01-01, logs/error.log.2025-01-01, etc.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    // Create daily rotating file appenders for each log level
    let info_file = tracing_appender::rolling::daily(log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(log_dir, "error.log");

    // Create layers for each log level
    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    // Create console/stdout layer for terminal output
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    // Initialize the subscriber with all layers (including console)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .init();

    Ok(())
}

/// Offline validation commands print to stdout/stderr and set the exit code
fn run_check(result: Result<String, String>) -> std::io::Result<()> {
    match result {
        Ok(out) => {
            println!("{}", out);
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Cli::parse();

    // Validation commands run offline; no command (or `serve`) starts the server

    match args.command {
        Some(Command::Check { mode, file }) => return run_check(cli::check_job(mode, &file)),
        Some(Command::CheckBucket { file }) => return run_check(cli::check_bucket(&file)),
        Some(Command::Serve) | None => {}
    }

    // Load configuration from environment
    let config::Config {
        host,
        port,
        max_payload_size,
        log_dir,
        log_path,
    } = config::Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    init_logging(&log_dir)?;

    info!("Starting scheduler-plugin");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", max_payload_size);
    info!("  - Log directory: {}", log_dir);
    info!("  - Reported log path: {:?}", log_path);

    let settings = web::Data::new(PluginSettings::new(&log_path));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(settings.clone())
            .app_data(validation::json_config(max_payload_size)) // Global JSON limit and error format
            .configure(health_config)
            .configure(settings_config)
            .configure(vertex_config)
            .configure(storage_config)
    });

    info!("Server starting on http://{}:{}", host, port);

    let server = match server.bind((host.as_str(), port)) {
        Ok(server) => server.run(),
        Err(e) => {
            error!("Failed to bind {}:{}: {}", host, port, e);
            return Err(e);
        }
    };

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    // Spawn server in background
    let server_task = tokio::spawn(server);

    // Wait for shutdown signal

    ShutdownCoordinator::new(server_handle, server_task)
        .wait_for_shutdown()
        .await
}
