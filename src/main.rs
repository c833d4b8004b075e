use std::sync::Arc;

use anyhow::Context;
use seguro_defeso::{core::biometry::DetectorUnavailable, utils::config::Config, Application};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = Config::new().context("Failed to load configuration")?;

    let _log_guard = init_tracing(&config);

    info!("Starting Seguro-Defeso v{}", env!("CARGO_PKG_VERSION"));

    // Face detection runs in the front end for this build
    let app = Application::new(config, Arc::new(DetectorUnavailable))
        .await
        .map_err(|e| {
            error!("Failed to initialize application: {}", e);
            e
        })?;

    app.start().await.map_err(|e| {
        error!("Failed to start application: {}", e);
        e
    })?;

    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(err) => error!("Failed to listen for shutdown signal: {}", err),
    }

    if let Err(e) = app.shutdown().await {
        error!("Error during shutdown: {}", e);
    }

    Ok(())
}

fn init_tracing(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true);

    match &config.server.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "seguro-defeso.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder.with_ansi(false).with_writer(writer).init();
            Some(guard)
        }
        None => {
            builder.init();
            None
        }
    }
}
