use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::cli::Args;

/// Config file looked up in the working directory when --config is not given
const DEFAULT_CONFIG_FILE: &str = "embeddings.yaml";

const DEFAULT_CONTENT_DIR: &str = "content";
const DEFAULT_OUTPUT_FILE: &str = "static/embeddings.json";
/// Multilingual model so mixed-language sites embed into one space
const DEFAULT_MODEL: &str = "paraphrase-multilingual-minilm-l12-v2";
const DEFAULT_CACHE_DIR: &str = ".cache";

/// Configuration for the embedding model
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name (e.g., "paraphrase-multilingual-minilm-l12-v2")
    #[serde(default = "default_model")]
    pub model: String,

    /// Directory where downloaded model files are cached
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIR)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Root directory holding the site's markdown content
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Where the embeddings JSON is written
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// File names excluded from processing (section indexes, error pages)
    #[serde(default = "default_excluded_files")]
    pub excluded_files: Vec<String>,

    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            output_file: default_output_file(),
            excluded_files: default_excluded_files(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

fn default_content_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONTENT_DIR)
}

fn default_output_file() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

fn default_excluded_files() -> Vec<String> {
    vec!["_index.md".to_string(), "404.md".to_string()]
}

impl Config {
    /// Load the configuration, layering CLI flags on top of the optional
    /// YAML file. A missing default config file is fine; a missing file
    /// passed via --config is an error.
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(content_dir) = &args.content_dir {
            config.content_dir = content_dir.clone();
        }
        if let Some(output) = &args.output {
            config.output_file = output.clone();
        }
        if let Some(model) = &args.model {
            config.embedding.model = model.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_yml::from_str(&raw)
            .with_context(|| format!("config {} is malformed", path.display()))?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        // Exclusions match on bare file names, not paths
        for name in &self.excluded_files {
            if name.contains('/') || name.contains('\\') {
                bail!("excluded_files entries must be bare file names, got '{name}'");
            }
        }

        if self.embedding.model.trim().is_empty() {
            bail!("embedding.model must not be empty");
        }

        Ok(())
    }
}
