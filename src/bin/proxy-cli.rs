use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

use fallback_proxy::config::{load_config, FallbackConfig};
use fallback_proxy::observability::logging;
use fallback_proxy::FallbackClient;

#[derive(Parser)]
#[command(name = "proxy-cli")]
#[command(about = "Fetch upstream API URLs directly, falling back to the proxy", long_about = None)]
struct Cli {
    /// Proxy endpoint URL (overrides the config file).
    #[arg(short, long)]
    proxy_url: Option<String>,

    /// Path to a TOML configuration file; only `[fallback]` is used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a URL with proxy fallback and print the JSON payload
    Fetch {
        url: String,

        /// Extra request header as `Name: value` (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },
    /// GET a URL through the proxy only
    Proxy { url: String },
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got `{raw}`"))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let mut config = match &cli.config {
        Some(path) => load_config(path)?.fallback,
        None => FallbackConfig::default(),
    };
    if let Some(proxy_url) = cli.proxy_url {
        config.proxy_url = proxy_url;
    }

    let client = FallbackClient::new(&config)?;

    let payload = match cli.command {
        Commands::Fetch { url, headers } => {
            let headers: HashMap<String, String> = headers.into_iter().collect();
            client.fetch_with_fallback(&url, &headers).await?
        }
        Commands::Proxy { url } => client.fetch_via_proxy(&url).await?,
    };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
