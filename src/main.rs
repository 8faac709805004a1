use clap::Parser;

mod cli;
mod config;
mod embeddings;
mod extract;
mod output;
mod pipeline;
mod scan;
#[cfg(test)]
mod tests;

use config::Config;

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr; stdout is reserved for progress and summary
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = cli::Args::parse();
    let config = Config::load(&args)?;

    let summary = pipeline::run(&config)?;

    println!("Generated embeddings for {} documents.", summary.documents);
    if summary.skipped > 0 {
        println!(
            "Skipped {} of {} files with errors.",
            summary.skipped, summary.files_found
        );
    }
    println!(
        "Embeddings saved to {} ({:.2} MB)",
        summary.output_path.display(),
        summary.output_bytes as f64 / 1024.0 / 1024.0
    );

    Ok(())
}
