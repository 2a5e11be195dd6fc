use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use plugin_status::api::{self, AppState};
use plugin_status::types::{state, ComponentDescriptor};
use plugin_status::{Config, StatusRegistry};

#[derive(Parser)]
#[command(name = "plugin-status")]
#[command(about = "Component health registry and status API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the status API
    Serve {
        #[arg(
            long,
            help = "TOML config file; when given, PLUGIN_STATUS_* variables are ignored"
        )]
        config: Option<PathBuf>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long = "component", help = "Register a component up front, as id@version")]
        components: Vec<ComponentDescriptor>,
    },
    /// Print the state catalog as JSON
    States,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            components,
        } => {
            let (mut config, warnings) = match config {
                Some(path) => (Config::from_file(&path)?, Vec::new()),
                None => Config::from_env(),
            };
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(config.log_level.as_str()),
            )
            .init();
            for warning in &warnings {
                log::warn!("{}", warning);
            }

            serve(&config, &components).await?
        }
        Commands::States => {
            println!("{}", serde_json::to_string_pretty(state::all())?);
        }
    }

    Ok(())
}

async fn serve(config: &Config, components: &[ComponentDescriptor]) -> Result<()> {
    let registry = Arc::new(StatusRegistry::new());
    let server = registry.create(&ComponentDescriptor::new(
        "server",
        env!("CARGO_PKG_VERSION"),
    ))?;

    for descriptor in components {
        registry
            .create(descriptor)
            .with_context(|| format!("Failed to register {}", descriptor))?;
    }

    let address = config.bind_address();
    server.yellow(Some(format!("Binding {}", address).as_str()));
    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            server.red(Some(format!("Unable to bind {}: {}", address, e).as_str()));
            return Err(e).with_context(|| format!("Failed to bind {}", address));
        }
    };
    server.green(Some("Ready"));

    api::serve(AppState { registry }, listener).await
}
