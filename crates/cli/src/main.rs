//! archgraph CLI
//!
//! Turns a technical write-up into a layered architecture diagram.

use anyhow::{Context, Result};
use archgraph_core::{ComponentRole, Graph};
use archgraph_pipeline::{Diagram, GraphLayout, Pipeline, PipelineConfig, ProviderKind, RelevanceFilter};
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// archgraph - architecture diagrams from prose
#[derive(Parser)]
#[command(name = "archgraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and print the diagram
    Generate {
        /// Text file to read (reads from stdin if not provided)
        path: Option<PathBuf>,

        /// Suggestion provider: disabled, tgi, ollama or gemini
        #[arg(short, long)]
        provider: Option<ProviderKind>,

        /// Number of sentences the relevance filter keeps
        #[arg(short, long)]
        top: Option<usize>,

        /// Print the diagram as JSON
        #[arg(long)]
        json: bool,

        /// Write the diagram JSON to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the text that survives the relevance filter
    Filter {
        /// Text file to read (reads from stdin if not provided)
        path: Option<PathBuf>,

        /// Number of sentences to keep
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Print the canonical graph as JSON
    Extract {
        /// Text file to read (reads from stdin if not provided)
        path: Option<PathBuf>,

        /// Suggestion provider: disabled, tgi, ollama or gemini
        #[arg(short, long)]
        provider: Option<ProviderKind>,
    },

    /// Lay out a canonical graph JSON file
    Layout {
        /// Path to a `{components, relationships}` JSON file
        graph: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging; stdout is reserved for command output
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Generate {
            path,
            provider,
            top,
            json,
            output,
        } => {
            cmd_generate(path, provider, top, json, output).await?;
        }
        Commands::Filter { path, top } => {
            cmd_filter(path, top)?;
        }
        Commands::Extract { path, provider } => {
            cmd_extract(path, provider).await?;
        }
        Commands::Layout { graph } => {
            cmd_layout(graph)?;
        }
    }

    Ok(())
}

/// Environment configuration with command-line overrides applied
fn load_config(provider: Option<ProviderKind>, top: Option<usize>) -> Result<PipelineConfig> {
    let mut config =
        PipelineConfig::from_env(provider).context("Invalid pipeline configuration")?;
    if let Some(top) = top {
        config.filter = config.filter.with_top_sentences(top);
    }
    Ok(config)
}

/// Read the whole input from `path`, or from stdin when no path is given
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut stdin = io::stdin();
            if stdin.is_terminal() {
                eprintln!("Enter text (Ctrl+D to finish):");
            }
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

async fn cmd_generate(
    path: Option<PathBuf>,
    provider: Option<ProviderKind>,
    top: Option<usize>,
    json: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let text = read_input(path.as_deref())?;
    let pipeline = Pipeline::new(load_config(provider, top)?)?;
    info!("Using suggestion provider: {}", pipeline.provider().kind());

    let diagram = pipeline.run(&text).await;
    let rendered = serde_json::to_string_pretty(&diagram)?;

    if let Some(output) = output {
        std::fs::write(&output, &rendered)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("✓ Wrote diagram to {}", output.display());
    } else if json {
        println!("{}", rendered);
    } else {
        print_summary(&diagram);
    }

    Ok(())
}

fn print_summary(diagram: &Diagram) {
    let graph = &diagram.graph;
    println!(
        "✓ Generated diagram: {} components, {} relationships",
        graph.components().len(),
        graph.relationships().len()
    );

    println!("\nComponents:");
    for name in graph.components() {
        let roles: Vec<String> = ComponentRole::classify(name)
            .iter()
            .map(ToString::to_string)
            .collect();
        let roles = if roles.is_empty() {
            String::new()
        } else {
            format!(" [{}]", roles.join(", "))
        };
        match diagram.layout.position(name) {
            Some(pos) => println!("  • {}{} ({}, {})", name, roles, pos.x, pos.y),
            None => println!("  • {}{}", name, roles),
        }
    }

    if graph.relationships().is_empty() {
        println!("\nNo relationships.");
    } else {
        println!("\nRelationships:");
        for rel in graph.relationships() {
            println!("  • {}", rel);
        }
    }
}

fn cmd_filter(path: Option<PathBuf>, top: Option<usize>) -> Result<()> {
    let text = read_input(path.as_deref())?;
    let config = load_config(Some(ProviderKind::Disabled), top)?;
    let filter = RelevanceFilter::new(config.filter)?;
    println!("{}", filter.filter(&text));
    Ok(())
}

async fn cmd_extract(path: Option<PathBuf>, provider: Option<ProviderKind>) -> Result<()> {
    let text = read_input(path.as_deref())?;
    let pipeline = Pipeline::new(load_config(provider, None)?)?;
    let graph = pipeline.extract_graph(&text).await;
    println!("{}", serde_json::to_string_pretty(&graph)?);
    Ok(())
}

fn cmd_layout(path: PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let graph = Graph::from_json(&raw)
        .with_context(|| format!("Invalid graph in {}", path.display()))?;
    let positioned = GraphLayout::default().layout(&graph);
    println!("{}", serde_json::to_string_pretty(&positioned)?);
    Ok(())
}
