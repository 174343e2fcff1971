//! Populate Graph - CLI
//!
//! Loads the manufacturing dataset into Neo4j and runs the query catalog.

use anyhow::Result;
use clap::{Parser, Subcommand};
use populate_graph::embeddings::{EmbeddingProvider, HttpEmbeddingProvider};
use populate_graph::neo4j::Neo4jClient;
use populate_graph::{pipeline, queries, Config};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "populate-graph")]
#[command(about = "Manufacturing knowledge graph loader for Neo4j")]
struct Cli {
    /// Optional YAML config file (default: ./config.yaml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create schema, load all CSV tables, embed descriptions, verify
    Load,

    /// Print node and relationship counts
    Verify,

    /// Delete every node and relationship
    Clean,

    /// Run the sample query catalog
    Samples,

    /// Run the semantic and hybrid search test queries
    TestQueries {
        /// Nearest neighbours requested from the vector index
        #[arg(long, default_value = "5")]
        top_k: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    populate_graph::load_dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,populate_graph=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Load => run_load(&config).await,
        Commands::Verify => {
            let client = connect(&config).await?;
            let report = pipeline::verify(&client).await?;
            println!("{}", report);
            Ok(())
        }
        Commands::Clean => {
            let client = connect(&config).await?;
            let deleted = pipeline::clear_database(&client).await?;
            println!("Deleted {} nodes.", deleted);
            Ok(())
        }
        Commands::Samples => {
            let client = connect(&config).await?;
            queries::samples::run_samples(&client, config.sample_size, &mut std::io::stdout())
                .await
        }
        Commands::TestQueries { top_k } => {
            let client = connect(&config).await?;
            let provider = HttpEmbeddingProvider::from_config(&config.embedding)?;
            queries::semantic::run_test_queries(&client, &provider, top_k, &mut std::io::stdout())
                .await?;
            Ok(())
        }
    }
}

async fn connect(config: &Config) -> Result<Neo4jClient> {
    tracing::info!("Connecting to {}", config.neo4j_uri);
    match Neo4jClient::connect(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
    )
    .await
    {
        Ok(client) => {
            tracing::info!("Connected to Neo4j");
            Ok(client)
        }
        Err(e) => {
            let e = anyhow::Error::from(e);
            println!("{}", fail_line(&e));
            Err(e)
        }
    }
}

async fn run_load(config: &Config) -> Result<()> {
    let start = Instant::now();
    let client = connect(config).await?;
    let provider = HttpEmbeddingProvider::from_config(&config.embedding)?;

    tracing::info!("Creating constraints and indexes");
    pipeline::create_constraints(&client).await?;
    pipeline::create_indexes(&client).await?;

    let loader = pipeline::GraphLoader::new(&client, &config.data_dir);
    let nodes = loader.load_nodes().await?;
    let relationships = loader.load_relationships().await?;
    tracing::info!(
        "Loaded {} node rows and {} relationship rows from {}",
        nodes.total_rows(),
        relationships.total_rows(),
        config.data_dir.display()
    );

    pipeline::embed_descriptions(&client, &provider).await?;
    pipeline::create_vector_indexes(&client, provider.dimensions()).await?;

    let report = pipeline::verify(&client).await?;
    println!("{}", report);
    println!("Done in {}", fmt_elapsed(start.elapsed()));
    Ok(())
}

/// Operator-facing failure line with the full cause chain.
fn fail_line(e: &anyhow::Error) -> String {
    format!("[FAIL] {:#}", e)
}

/// `1m 05s` from a minute on, `42s` below.
fn fmt_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_elapsed() {
        assert_eq!(fmt_elapsed(Duration::from_secs(42)), "42s");
        assert_eq!(fmt_elapsed(Duration::from_millis(59_900)), "59s");
        assert_eq!(fmt_elapsed(Duration::from_secs(65)), "1m 05s");
        assert_eq!(fmt_elapsed(Duration::from_secs(600)), "10m 00s");
    }

    #[test]
    fn test_fail_line_includes_root_cause() {
        let cause = anyhow::anyhow!("Connection refused (os error 111)")
            .context("Failed to create Neo4j driver");
        let e = anyhow::Error::from(populate_graph::error::PipelineError::Connection {
            uri: "bolt://db:7687".to_string(),
            source: cause,
        });
        assert_eq!(
            fail_line(&e),
            "[FAIL] Cannot connect to bolt://db:7687: Failed to create Neo4j driver: \
             Connection refused (os error 111)"
        );
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["populate-graph", "test-queries", "--top-k", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::TestQueries { top_k: 3 }));

        let cli =
            Cli::try_parse_from(["populate-graph", "load", "--config", "/etc/pg.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Load));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/pg.yaml")));

        let cli = Cli::try_parse_from(["populate-graph", "test-queries"]).unwrap();
        assert!(matches!(cli.command, Commands::TestQueries { top_k: 5 }));
    }
}
