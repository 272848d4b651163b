use crate::cache;
use crate::catalog;
use crate::error::{CatalogError, Result};

const DATASET_URL: &str =
    "https://raw.githubusercontent.com/BerriAI/litellm/main/model_prices_and_context_window.json";

/// File name of the synced dataset inside the cache dir.
pub const DATASET_FILE: &str = "models.json";

pub struct SyncResult {
    pub model_count: usize,
    pub provider_count: usize,
}

/// Download the upstream pricing dataset, validate it, and write it to cache.
pub async fn sync_dataset() -> Result<SyncResult> {
    let client = reqwest::Client::new();
    let cache_dir =
        cache::cache_dir().ok_or_else(|| CatalogError::Io("cannot determine cache directory".into()))?;

    let text = client
        .get(DATASET_URL)
        .send()
        .await
        .map_err(|e| CatalogError::Io(format!("failed to download pricing dataset: {e}")))?
        .error_for_status()
        .map_err(|e| CatalogError::Io(format!("failed to download pricing dataset: {e}")))?
        .text()
        .await
        .map_err(|e| CatalogError::Io(format!("failed to read pricing dataset response: {e}")))?;

    // Validate by parsing before writing.
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let models = catalog::parse_dataset(&value)?;
    if models.is_empty() {
        return Err(CatalogError::Other("pricing dataset has no usable models".into()));
    }
    tracing::debug!("parsed {} models from {DATASET_URL}", models.len());

    std::fs::write(cache_dir.join(DATASET_FILE), &text)
        .map_err(|e| CatalogError::Io(format!("failed to write {DATASET_FILE} cache: {e}")))?;

    let mut providers: Vec<&str> = models.iter().map(|m| m.provider.as_str()).collect();
    providers.sort_unstable();
    providers.dedup();

    Ok(SyncResult {
        model_count: models.len(),
        provider_count: providers.len(),
    })
}
