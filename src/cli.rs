use clap::Parser;

use relsnap_core::{collect_all, write_output, FetchConfig, OutputTarget};

#[derive(Parser, Debug)]
#[command(name = "relsnap")]
#[command(about = "Collect latest OS/browser release info for stable and beta channels.")]
pub struct Cli {
    /// Output JSON file path, or '-' for stdout
    #[arg(short, long, default_value = "-")]
    pub output: String,
}

impl Cli {
    pub fn target(&self) -> OutputTarget {
        OutputTarget::from_arg(Some(self.output.as_str()))
    }
}

/// Collects a snapshot and writes it where `cli` asks.
pub async fn run(cli: &Cli, config: &FetchConfig) -> relsnap_core::Result<()> {
    let snapshot = collect_all(config).await?;
    let json = snapshot.to_json_pretty()?;
    write_output(&json, &cli.target())
}
