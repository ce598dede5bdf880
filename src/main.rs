use clap::Parser;
use tracing_subscriber::EnvFilter;

use relsnap::{run, Cli};
use relsnap_utils::FetchConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    run(&cli, &FetchConfig::default()).await?;
    Ok(())
}
