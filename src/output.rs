//! JSON output for the embeddings mapping.
//!
//! The output file is a single JSON object keyed by URL:
//!
//! ```json
//! {
//!   "/posts/article/": {
//!     "title": "...",
//!     "url": "/posts/article/",
//!     "content": "...",
//!     "embedding": [0.12, 0.34]
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

/// One page's record in the output mapping.
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    pub title: String,
    pub url: String,
    pub content: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write the URL -> record mapping as pretty-printed UTF-8 JSON.
///
/// Creates the parent directory if absent. Non-ASCII characters are kept
/// as-is rather than escaped. Returns the number of bytes written.
pub fn write_embeddings(
    path: &Path,
    records: &BTreeMap<String, PageRecord>,
) -> Result<u64, OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, &json)?;

    Ok(json.len() as u64)
}
