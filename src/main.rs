use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use tempo_osd::{config::Config, logger, overlay};

#[derive(Parser)]
#[command(name = "tempo-osd")]
#[command(about = "Transient status overlay for the Tempo music player")]
#[command(version)]
struct Cli {
    /// Status text to display
    text: String,

    /// Hide automatically after this many seconds (0 = stay until closed)
    #[arg(long, default_value = "0")]
    timeout: u64,

    /// Font family for the status text
    #[arg(long)]
    font: Option<String>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(font) = cli.font {
        config.font_family = Some(font);
    }

    overlay::run(&config, &cli.text, cli.timeout)
}
