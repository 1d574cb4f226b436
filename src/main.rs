use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use codemate::connector::api::{Container, ContainerConfig, Router};
use codemate::{ClientConfig, Commands, Theme};

#[derive(Parser)]
#[command(name = "codemate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// API key; defaults to $GEMINI_API_KEY
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model id; defaults to $GEMINI_MODEL or gemini-2.0-flash
    #[arg(long, global = true)]
    model: Option<String>,

    /// API base URL; defaults to $GEMINI_BASE_URL or the public endpoint
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[arg(long, global = true, default_value = "1024")]
    max_tokens: u32,

    /// Request timeout in seconds; no timeout when omitted
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Answer locally without calling the API
    #[arg(long, global = true)]
    mock: bool,

    #[arg(long, global = true)]
    no_color: bool,

    /// Start with the light theme
    #[arg(long, global = true)]
    light: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env().with_max_output_tokens(self.max_tokens);

        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_request_timeout_secs(secs);
        }

        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        client: cli.client_config(),
        mock: cli.mock,
        theme: if cli.light { Theme::Light } else { Theme::Dark },
        color: !cli.no_color,
    });
    let router = Router::new(&container);

    let output = router.route(cli.command).await?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
