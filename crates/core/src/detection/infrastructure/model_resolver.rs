use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("model file not found: {0}")]
    Missing(PathBuf),
    #[error("model {name} not found in {searched:?}")]
    NotFound { name: String, searched: Vec<PathBuf> },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Resolve the weights file to load.
///
/// Resolution order:
/// 1. Explicit path (must exist)
/// 2. User cache directory (platform-specific)
/// 3. Bundled directory (the working directory for the CLI)
pub fn resolve(
    name: &str,
    explicit: Option<&Path>,
    bundled_dir: Option<&Path>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(ModelResolveError::Missing(path.to_path_buf()))
        };
    }

    let mut searched = Vec::new();
    match model_cache_dir() {
        Ok(dir) => searched.push(dir.join(name)),
        Err(e) => log::debug!("Skipping model cache lookup: {e}"),
    }
    if let Some(dir) = bundled_dir {
        searched.push(dir.join(name));
    }

    let found = searched.iter().find(|candidate| candidate.is_file()).cloned();
    found.ok_or_else(|| ModelResolveError::NotFound {
        name: name.to_string(),
        searched,
    })
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/Webcam Detect/models/`
/// - Linux: `$XDG_CACHE_HOME/Webcam Detect/models/` or `~/.cache/Webcam Detect/models/`
/// - Windows: `%LOCALAPPDATA%/Webcam Detect/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("Webcam Detect").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("Webcam Detect").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}
