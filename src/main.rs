use clap::Parser;
use roadgexf::{Config, NodeStrategy};
use std::path::PathBuf;
use anyhow::Result;

#[derive(Parser, Debug)]
#[command(name = "roadgexf")]
#[command(about = "Export an osm2po routing table as a GEXF graph document")]
struct Args {
    /// Config file (defaults to $ROADGEXF_CONFIG, then ./config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override output.path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override export.nodes
    #[arg(long, value_enum)]
    nodes: Option<NodeStrategy>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the progress lines
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    log::info!("Starting roadgexf v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(output) = args.output {
        config.output.path = output;
    }
    if let Some(nodes) = args.nodes {
        config.export.nodes = nodes;
    }
    config.validate()?;

    log::info!("Database path: {}", config.db_path().display());
    log::info!("Output path: {}", config.output_path().display());
    log::info!("Node strategy: {:?}", config.export.nodes);

    let summary = roadgexf::run(&config).await?;
    log::info!(
        "Exported {} nodes and {} edges ({} bytes)",
        summary.nodes,
        summary.edges,
        summary.bytes
    );
    println!("Done!");

    Ok(())
}
