use std::path::PathBuf;

use clap::Parser;

/// Generate per-page text embeddings for a static site's markdown content.
///
/// Scans the content directory, strips markup, and writes a JSON map from
/// page URL to title, cleaned text, and embedding vector for client-side
/// semantic search.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Content root directory
    #[clap(short = 'd', long)]
    pub content_dir: Option<PathBuf>,

    /// Output JSON file
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Embedding model name
    #[clap(short, long)]
    pub model: Option<String>,

    /// Config file (default: embeddings.yaml when present)
    #[clap(short, long)]
    pub config: Option<PathBuf>,
}
