use std::path::PathBuf;

/// Overrides the platform cache location when set.
pub const CACHE_DIR_ENV: &str = "MODEL_DIRECTORY_CACHE";

const CACHE_SUBDIR: &str = "model-directory";

/// Directory holding synced datasets: `$MODEL_DIRECTORY_CACHE`, else
/// `<platform cache>/model-directory`. Created on first use.
pub fn cache_dir() -> Option<PathBuf> {
    let dir = match std::env::var_os(CACHE_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::cache_dir()?.join(CACHE_SUBDIR),
    };
    if !dir.exists() {
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::debug!("cannot create cache dir {}: {e}", dir.display());
            return None;
        }
    }
    Some(dir)
}

pub fn cache_path(filename: &str) -> Option<PathBuf> {
    Some(cache_dir()?.join(filename))
}

/// Path of `filename` in the cache, only if it has been written.
pub fn cached_file(filename: &str) -> Option<PathBuf> {
    cache_path(filename).filter(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_cached() {
        assert!(cached_file("no-such-dataset-7f3a.json").is_none());
    }
}
