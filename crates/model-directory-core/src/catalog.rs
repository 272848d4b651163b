use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::model::{ModelData, ProcessedModel};

/// Key of the documentation entry at the top of LiteLLM's pricing file.
const SAMPLE_SPEC_KEY: &str = "sample_spec";

/// One model as stored in a pricing file.
#[derive(Debug, Deserialize)]
struct RawEntry {
    litellm_provider: Option<String>,
    #[serde(flatten)]
    data: ModelData,
}

impl RawEntry {
    fn into_model(self, key: &str) -> ProcessedModel {
        ProcessedModel::from_entry(key, self.litellm_provider.as_deref(), self.data)
    }
}

#[derive(Debug, Deserialize)]
struct ModelsFile {
    model: BTreeMap<String, RawEntry>,
}

/// Parse the bundled TOML format (`[model."<key>"]` tables). Strict: any bad
/// entry fails the whole file.
pub fn parse_models(toml_str: &str) -> Result<Vec<ProcessedModel>> {
    let file: ModelsFile =
        toml::from_str(toml_str).map_err(|e| CatalogError::Io(format!("bad models.toml: {e}")))?;
    Ok(file
        .model
        .into_iter()
        .map(|(key, entry)| entry.into_model(&key))
        .collect())
}

/// Parse LiteLLM's `model_prices_and_context_window.json` map. Lenient:
/// entries that don't deserialize are skipped.
pub fn parse_dataset(data: &Value) -> Result<Vec<ProcessedModel>> {
    let obj = data
        .as_object()
        .ok_or_else(|| CatalogError::Other("pricing dataset is not a JSON object".into()))?;

    let mut models: Vec<ProcessedModel> = obj
        .iter()
        .filter(|(key, _)| key.as_str() != SAMPLE_SPEC_KEY)
        .filter_map(|(key, entry)| parse_entry(key, entry))
        .collect();
    models.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(models)
}

/// Parse a single dataset entry, `None` if it is malformed.
pub fn parse_entry(key: &str, entry: &Value) -> Option<ProcessedModel> {
    match RawEntry::deserialize(entry) {
        Ok(raw) => Some(raw.into_model(key)),
        Err(e) => {
            tracing::debug!("skipping dataset entry {key}: {e}");
            None
        }
    }
}

/// Load models from a JSON dataset file on disk.
#[cfg(feature = "network")]
pub fn load_dataset(path: &std::path::Path) -> Result<Vec<ProcessedModel>> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io(e.to_string()))?;
    let value: Value = serde_json::from_str(&content)?;
    parse_dataset(&value)
}

/// Load the bundled models.toml from the data/ directory.
pub fn load_bundled_models() -> Result<Vec<ProcessedModel>> {
    let toml_str = include_str!("../../../data/models.toml");
    parse_models(toml_str)
}

/// Load models: synced cache file if available, otherwise bundled.
#[cfg(feature = "network")]
pub fn load_models_cached() -> Result<Vec<ProcessedModel>> {
    if let Some(path) = crate::cache::cached_file(crate::sync::DATASET_FILE) {
        match load_dataset(&path) {
            Ok(models) if !models.is_empty() => return Ok(models),
            Ok(_) => tracing::debug!("cached dataset {} is empty", path.display()),
            Err(e) => tracing::debug!("ignoring cached dataset {}: {e}", path.display()),
        }
    }
    load_bundled_models()
}

/// Find a model by id, then by slug, then by case-insensitive display name.
pub fn find_model<'a>(models: &'a [ProcessedModel], input: &str) -> Option<&'a ProcessedModel> {
    let needle = input.trim();
    models
        .iter()
        .find(|m| m.id == needle)
        .or_else(|| models.iter().find(|m| m.slug == needle))
        .or_else(|| {
            models
                .iter()
                .find(|m| m.display_name.eq_ignore_ascii_case(needle))
        })
}
