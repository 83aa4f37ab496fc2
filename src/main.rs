//! Config binder demo.
//!
//! Binds a sample settings object to a directory of namespace files and
//! logs its live values until interrupted.
//!
//! ```text
//! config/app.svc.toml:
//!     maxRetries = 5
//!     greeting = "hi"
//!     upstreams = [{ host = "10.0.0.1", port = 8080 }]
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use config_binder::config::validation::validate_config;
use config_binder::config::{load_config, BinderConfig, ConfigError};
use config_binder::observability::{logging, metrics};
use config_binder::{remote_config, Binder, FileSource, Live};

#[derive(Parser)]
#[command(name = "config-binder")]
#[command(about = "Bind a sample settings object to live namespace files", long_about = None)]
struct Cli {
    /// Binder settings file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the project prefix.
    #[arg(short, long)]
    project: Option<String>,

    /// Override the namespace directory.
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Seconds between value reports.
    #[arg(long, default_value_t = 10)]
    report_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Upstream {
    host: String,
    port: u16,
}

#[derive(Default)]
struct ServiceSettings {
    max_retries: Live<u32>,
    greeting: Live<String>,
    upstreams: Live<Vec<Upstream>>,
    maintenance: Live<bool>,
}

remote_config!(ServiceSettings {
    max_retries => ("svc", "maxRetries", "3"),
    greeting => ("svc", "greeting", "hello"),
    upstreams => ("svc", "upstreams", "[]"),
    maintenance => ("svc", "maintenance", "false"),
});

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BinderConfig::default(),
    };
    if let Some(project) = cli.project {
        config.project = project;
    }
    if let Some(dir) = cli.dir {
        config.source.dir = dir;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("config-binder v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let source = Arc::new(FileSource::open(&config.source.dir)?);
    let _watcher = if config.source.watch {
        Some(source.watch(Duration::from_secs(config.source.poll_interval_secs))?)
    } else {
        None
    };

    let binder = Binder::new(config.project.clone(), source.clone());
    let settings = binder.bind(Arc::new(ServiceSettings::default()))?;

    // Edits landing between open and the first subscription reach no listener.
    if config.source.watch {
        source.reload_all()?;
    }

    tracing::info!(
        project = %config.project,
        dir = ?config.source.dir,
        items = binder.registry().len(),
        "Settings bound"
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(cli.report_secs.max(1)));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let upstreams: Vec<String> = settings
                    .upstreams
                    .load()
                    .iter()
                    .map(|u| format!("{}:{}", u.host, u.port))
                    .collect();
                tracing::info!(
                    max_retries = settings.max_retries.get(),
                    greeting = %settings.greeting.load(),
                    upstreams = ?upstreams,
                    maintenance = settings.maintenance.get(),
                    "Current settings"
                );
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received");
                break;
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
