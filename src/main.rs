// Command-line entry point for Loopnest Graph.

use anyhow::{Context, Result};
use clap::Parser;
use loopnest_graph::api::dto::GraphDto;
use loopnest_graph::application::ExtractUsecase;
use loopnest_graph::config::{ExtractConfig, OutputFormat};
use loopnest_graph::domain::program::Stmt;
use loopnest_graph::infrastructure::logging::init_logging;
use loopnest_graph::infrastructure::FeatureScanner;
use loopnest_graph::ports::graph_exporter::GraphExporter;
use std::fs;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Program representation (JSON)
    #[arg(short, long)]
    input: String,

    /// Output file path
    #[arg(short, long)]
    output: String,

    /// Output format (binary, json, dot); overrides the config file
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Print header, child-id rows, labels and tree to stdout
    #[arg(long)]
    dump: bool,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ExtractConfig::load(Path::new(path))
            .with_context(|| format!("Cannot read config file: {}", path))?,
        None => ExtractConfig::default(),
    };
    if let Some(format) = cli.format {
        config.format = format;
    }
    config.dump |= cli.dump;

    init_logging(&config.log_filter)?;

    let src = fs::read_to_string(&cli.input)
        .with_context(|| format!("Cannot read input file: {}", cli.input))?;
    let stmt = Stmt::from_json(&src)
        .with_context(|| format!("Invalid program representation: {}", cli.input))?;

    let usecase = ExtractUsecase {
        scanner: &FeatureScanner,
    };
    let extraction = if config.dump {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        usecase.run(&stmt, Some(&mut lock))?
    } else {
        usecase.run(&stmt, None)?
    };

    match config.format {
        OutputFormat::Binary => fs::write(&cli.output, &extraction.buffer)?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&GraphDto::from(&extraction.tables))?;
            fs::write(&cli.output, json)?
        }
        OutputFormat::Dot => GraphExporter::export_dot(&extraction.tables, &cli.output)?,
    }

    println!(
        "Extraction completed! {} nodes, output written to {} (format: {:?})",
        extraction.tables.node_count(),
        cli.output,
        config.format
    );
    Ok(())
}
