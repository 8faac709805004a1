//! End-to-end embedding pipeline.
//!
//! One synchronous pass: scan the content tree, extract documents with
//! per-file error skipping, embed the surviving texts in a single batched
//! call, and write the URL-keyed JSON mapping.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

use crate::config::Config;
use crate::embeddings::{EmbeddingError, EmbeddingModel};
use crate::extract::{self, Document};
use crate::output::{self, OutputError, PageRecord};
use crate::scan::{self, ScanError};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// What a completed run produced, for the summary line.
#[derive(Debug)]
pub struct RunSummary {
    pub files_found: usize,
    pub documents: usize,
    pub skipped: usize,
    pub output_path: PathBuf,
    pub output_bytes: u64,
}

/// Run the whole pipeline. Fatal preconditions (missing content dir,
/// unloadable model) surface as errors; per-file failures are logged and
/// skipped.
pub fn run(config: &Config) -> Result<RunSummary, PipelineError> {
    let files = scan::scan_content(&config.content_dir, &config.excluded_files)?;
    println!("Found {} markdown files to process...", files.len());

    let (documents, skipped) = collect_documents(&files, &config.content_dir);

    if documents.is_empty() {
        log::warn!("no content found to process");
        let output_bytes = output::write_embeddings(&config.output_file, &BTreeMap::new())?;
        return Ok(RunSummary {
            files_found: files.len(),
            documents: 0,
            skipped,
            output_path: config.output_file.clone(),
            output_bytes,
        });
    }

    println!("Loading embedding model '{}'...", config.embedding.model);
    let model = EmbeddingModel::new(&config.embedding.model, config.embedding.cache_dir.clone())?;

    println!("Generating embeddings for {} documents...", documents.len());
    let texts: Vec<String> = documents
        .iter()
        .map(|(_, doc)| format!("{} {}", doc.title, doc.content))
        .collect();
    let embeddings = model.embed_batch(&texts)?;

    let mapping = build_mapping(documents, embeddings);
    let output_bytes = output::write_embeddings(&config.output_file, &mapping)?;

    Ok(RunSummary {
        files_found: files.len(),
        documents: mapping.len(),
        skipped,
        output_path: config.output_file.clone(),
        output_bytes,
    })
}

/// Extract every scanned file, logging and skipping the ones that fail.
/// Documents whose cleaned content is empty are dropped without a warning.
pub(crate) fn collect_documents(
    files: &[PathBuf],
    root: &Path,
) -> (Vec<(PathBuf, Document)>, usize) {
    let progress = ProgressBar::new(files.len() as u64);
    let mut documents = Vec::with_capacity(files.len());
    let mut skipped = 0;

    for path in files {
        progress.inc(1);
        match extract::extract_document(path, root) {
            Ok(doc) if doc.content.is_empty() => {}
            Ok(doc) => documents.push((path.clone(), doc)),
            Err(err) => {
                log::warn!("error processing {}: {err}", path.display());
                skipped += 1;
            }
        }
    }
    progress.finish_and_clear();

    (documents, skipped)
}

/// Pair each document with its embedding and key the result by URL.
/// On duplicate URLs the later file wins; both files are named in a warning.
pub(crate) fn build_mapping(
    documents: Vec<(PathBuf, Document)>,
    embeddings: Vec<Vec<f32>>,
) -> BTreeMap<String, PageRecord> {
    let mut sources: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut mapping = BTreeMap::new();

    for ((path, doc), embedding) in documents.into_iter().zip(embeddings) {
        if let Some(previous) = sources.insert(doc.url.clone(), path.clone()) {
            log::warn!(
                "duplicate url {}: {} overwrites {}",
                doc.url,
                path.display(),
                previous.display()
            );
        }

        mapping.insert(
            doc.url.clone(),
            PageRecord {
                title: doc.title,
                url: doc.url,
                content: doc.content,
                embedding,
            },
        );
    }

    mapping
}
