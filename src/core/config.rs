//! Configuration: filesystem layout plus pipeline settings.
//!
//! Settings are read from an optional `cityassist.toml` in the data
//! directory (or `CITYASSIST_CONFIG_PATH`), with defaults matching the
//! indexing scripts this tool grew out of.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::AssistantError;

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Village corpus index (cosine over normalised vectors).
    pub village_db_path: PathBuf,
    /// Problem/solution corpus index (L2).
    pub problems_db_path: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let data_dir = discover_data_dir();
        let log_dir = data_dir.join("logs");

        for dir in [&data_dir, &log_dir] {
            let _ = fs::create_dir_all(dir);
        }

        AppPaths {
            village_db_path: data_dir.join("villages.db"),
            problems_db_path: data_dir.join("problems.db"),
            log_dir,
            data_dir,
        }
    }

    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        let log_dir = data_dir.join("logs");
        AppPaths {
            village_db_path: data_dir.join("villages.db"),
            problems_db_path: data_dir.join("problems.db"),
            log_dir,
            data_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("CITYASSIST_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if cfg!(debug_assertions) {
        return env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let xdg = env::var("XDG_DATA_HOME").unwrap_or_else(|_| {
        home_dir()
            .join(".local/share")
            .to_string_lossy()
            .to_string()
    });
    PathBuf::from(xdg).join("cityassist")
}

fn home_dir() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Pipeline settings, all optional in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Words per chunk.
    pub chunk_size: usize,
    /// Overlapping words between consecutive chunks.
    pub chunk_overlap: usize,
    /// Default number of neighbours per search.
    pub top_k: usize,
    /// Embedding vector length. 384 matches MiniLM-class models.
    pub embedding_dimension: usize,
    /// Base URL of an OpenAI-compatible server for embeddings and
    /// generation. Empty = run fully offline with the hash embedder.
    pub endpoint_base_url: String,
    pub embedding_model: String,
    pub generation_model: String,
    /// Request timeout in seconds for the endpoint.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            top_k: 5,
            embedding_dimension: 384,
            endpoint_base_url: String::new(),
            embedding_model: "all-minilm-l6-v2".to_string(),
            generation_model: "flan-t5-base".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load from the config file if present, otherwise defaults.
    /// Environment variables override the file.
    pub fn load(paths: &AppPaths) -> Result<Self, AssistantError> {
        let path = config_path(paths);
        let mut config = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(AssistantError::internal)?;
            toml::from_str(&raw).map_err(|err| {
                AssistantError::BadRequest(format!("invalid config {}: {}", path.display(), err))
            })?
        } else {
            Self::default()
        };

        if let Ok(url) = env::var("CITYASSIST_ENDPOINT") {
            config.endpoint_base_url = url;
        }
        if let Ok(model) = env::var("CITYASSIST_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AssistantError> {
        if self.chunk_size == 0 {
            return Err(AssistantError::BadRequest(
                "chunk_size must be positive".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(AssistantError::BadRequest(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.embedding_dimension == 0 {
            return Err(AssistantError::BadRequest(
                "embedding_dimension must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn config_path(paths: &AppPaths) -> PathBuf {
    if let Ok(path) = env::var("CITYASSIST_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    paths.data_dir.join("cityassist.toml")
}

#[allow(dead_code)]
pub fn save_config(paths: &AppPaths, config: &AppConfig) -> Result<(), AssistantError> {
    let raw = toml::to_string_pretty(config).map_err(AssistantError::internal)?;
    write_atomic(&config_path(paths), raw.as_bytes())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AssistantError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).map_err(AssistantError::internal)?;
    fs::rename(&tmp, path).map_err(AssistantError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn overlap_must_stay_below_chunk_size() {
        let config = AppConfig {
            chunk_size: 50,
            chunk_overlap: 50,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn paths_derive_from_data_dir() {
        let paths = AppPaths::with_data_dir(PathBuf::from("/tmp/ca-test"));
        assert_eq!(paths.log_dir, PathBuf::from("/tmp/ca-test/logs"));
        assert!(paths.village_db_path.ends_with("villages.db"));
    }
}
