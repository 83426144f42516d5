use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::app::Api;
use crate::logging::init_logging;
use crate::runtime_config::AppConfig;
use crate::server::{AppService, HttpServer};

/// Command-line interface for a kahless application
#[derive(Parser)]
#[command(name = "kahless")]
#[command(about = "Kahless application CLI", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// YAML configuration file
    #[arg(short, long, env = "KAHLESS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory templates are loaded from
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Directory static assets are served from
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

impl ConfigArgs {
    /// Resolve the configuration: file (or defaults), then environment, then flags.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be loaded.
    pub fn load(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AppConfig::from_env()?,
        };
        if let Some(dir) = &self.templates {
            config.templates_dir = dir.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.static_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Serve the application over HTTP
    Serve {
        #[command(flatten)]
        config: ConfigArgs,

        /// Listen address (overrides the configuration)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Print registered routes in lookup order
    Routes {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Parse arguments and run the selected command against the application produced by `build`.
///
/// # Errors
///
/// Configuration, route registration, bind and server failures.
pub fn run_cli<F>(build: F) -> Result<()>
where
    F: FnOnce(AppConfig) -> Result<Api>,
{
    run(Cli::parse(), build)
}

/// Run an already parsed [`Cli`].
///
/// # Errors
///
/// See [`run_cli`].
pub fn run<F>(cli: Cli, build: F) -> Result<()>
where
    F: FnOnce(AppConfig) -> Result<Api>,
{
    match cli.command {
        Commands::Serve { config, addr } => {
            let mut config = config.load()?;
            if let Some(addr) = addr {
                config.addr = addr;
            }
            init_logging(&config.log)?;
            may::config().set_stack_size(config.stack_size);

            let addr = config.addr.clone();
            let stack_size = config.stack_size;
            let api = build(config)?;
            info!(
                addr = %addr,
                stack_size = stack_size,
                routes_count = api.router().len(),
                routes = ?api.router().templates(),
                "Starting kahless server"
            );

            let handle = HttpServer(AppService::new(Arc::new(api))).start(addr.as_str())?;
            handle
                .join()
                .map_err(|e| anyhow::anyhow!("server coroutine panicked: {e:?}"))?;
            Ok(())
        }
        Commands::Routes { config } => {
            let api = build(config.load()?)?;
            api.router().dump_routes();
            Ok(())
        }
    }
}
