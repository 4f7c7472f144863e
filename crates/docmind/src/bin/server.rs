//! DocMind server binary
//!
//! Run with: cargo run -p docmind --bin docmind-server -- --config docmind.toml

use clap::Parser;
use docmind::{config::RagConfig, server::RagServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docmind-server", about = "Chat with your PDFs over HTTP", version)]
struct Cli {
    /// Path to a TOML config file (also read from DOCMIND_CONFIG)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(long, short)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docmind=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                          DocMind                          ║
║          Chat with your PDFs, grounded answers            ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let mut config = RagConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {} ({} dims)", config.embeddings.model, config.embeddings.dimensions);
    tracing::info!("  - LLM: {:?} / {}", config.llm.provider, config.llm.model_name());
    tracing::info!("  - Vector store: {:?} (index {})", config.vector_db.provider, config.vector_db.index_name);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!(
        "  - Retrieval: top {} above {}",
        config.retrieval.top_k,
        config.retrieval.similarity_threshold
    );

    let server = RagServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/ingest - Upload a PDF");
    println!("  POST /api/chat   - Ask questions (streamed)");
    println!("  GET  /api/seed   - Index sample sentences");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
