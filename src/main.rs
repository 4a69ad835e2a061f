use clap::Parser;
use tracing_subscriber::EnvFilter;
use websentry_functional::cli::Cli;

#[tokio::main]
async fn main() {
    // Load .env if present so WEBSENTRY_BIN and friends can live next to the repo
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = websentry_functional::config::settings();
    tracing::debug!(?settings, "Harness settings");

    if !websentry_functional::cli::run(cli, settings).await {
        std::process::exit(1);
    }
}
