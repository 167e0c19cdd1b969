use clap::{Parser, Subcommand};
use serde_json::Value as Json;
use std::path::PathBuf;
use swos_provider::config::Config;
use swos_provider::lifecycle::tracing::setup_tracing;
use swos_provider::lifecycle::Provider;
use swos_provider::switch::JsonFile;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "swos-provider", version, about = "Declarative SwOS switch configuration")]
struct Cli {
    /// Provider configuration file
    #[arg(short, long, default_value = "swos-provider.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the schema of every resource
    Schema,
    /// Print the current state of a resource
    Read { resource: String, model: String },
    /// Create the resource, or update it if it exists
    Apply { resource: String, model: String },
    /// Delete the resource
    Delete { resource: String, model: String },
}

fn parse_model(model: &str) -> Result<Json, String> {
    serde_json::from_str(model).map_err(|e| format!("invalid model JSON: {e}"))
}

async fn execute(provider: &Provider<JsonFile>, command: Command) -> Result<Json, String> {
    match command {
        Command::Schema => {
            serde_json::to_value(provider.registry().schemas()).map_err(|e| e.to_string())
        }
        Command::Read { resource, model } => {
            let handle = provider.resource(&resource).map_err(|e| e.to_string())?;
            handle
                .read(parse_model(&model)?)
                .await
                .map_err(|e| e.to_string())
        }
        Command::Apply { resource, model } => provider
            .apply(&resource, parse_model(&model)?)
            .await
            .map_err(|e| e.to_string()),
        Command::Delete { resource, model } => {
            let handle = provider.resource(&resource).map_err(|e| e.to_string())?;
            handle
                .delete(parse_model(&model)?)
                .await
                .map_err(|e| e.to_string())?;
            Ok(Json::Null)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();

    let config = Config::load_or_default(&cli.config).map_err(|e| e.to_string())?;
    setup_tracing(&config.log.filter);
    info!(config = %cli.config.display(), "Starting swos-provider");

    let provider = Provider::open(&config).map_err(|e| e.to_string())?;
    let result = execute(&provider, cli.command).await;
    provider.shutdown().await.map_err(|e| e.to_string())?;

    match result {
        Ok(output) => {
            let text = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
            println!("{text}");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            Err(e)
        }
    }
}
