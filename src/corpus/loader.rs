use std::fs;
use std::path::Path;

use crate::core::errors::AssistantError;

/// A source document, one per entity.
#[derive(Debug, Clone)]
pub struct Document {
    /// File name without directory components.
    pub filename: String,
    pub text: String,
}

/// Load every `.txt` file from a directory.
///
/// Empty files are skipped with a warning. It is an error if the
/// directory does not exist, contains no `.txt` files, or contains
/// nothing non-empty.
pub fn load_documents(dir: &Path) -> Result<Vec<Document>, AssistantError> {
    if !dir.is_dir() {
        return Err(AssistantError::NotFound(format!(
            "document folder {} does not exist",
            dir.display()
        )));
    }

    let mut files: Vec<_> = fs::read_dir(dir)
        .map_err(AssistantError::internal)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(AssistantError::BadRequest(format!(
            "no .txt files found in {}",
            dir.display()
        )));
    }

    let mut docs = Vec::new();
    for path in files {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        match fs::read_to_string(&path) {
            Ok(raw) => {
                let text = raw.trim().to_string();
                if text.is_empty() {
                    tracing::warn!("skipping empty file {}", path.display());
                } else {
                    docs.push(Document { filename, text });
                }
            }
            Err(err) => {
                tracing::warn!("error reading {}: {}", path.display(), err);
            }
        }
    }

    if docs.is_empty() {
        return Err(AssistantError::BadRequest(
            "no valid documents found".to_string(),
        ));
    }

    tracing::info!("loaded {} documents from {}", docs.len(), dir.display());
    Ok(docs)
}
