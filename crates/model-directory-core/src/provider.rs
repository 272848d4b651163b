use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::ProcessedModel;

/// Static provider registry entry.
#[derive(Debug, Clone)]
pub struct Provider {
    pub id: &'static str,
    pub display_name: &'static str,
    pub kind: ProviderKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    /// Model vendor serving its own API.
    FirstParty,
    /// Cloud platform reselling several vendors' models.
    Cloud,
    /// Hosted open-weights inference.
    OpenWeights,
}

pub const PROVIDERS: &[Provider] = &[
    Provider { id: "anthropic",   display_name: "Anthropic",    kind: ProviderKind::FirstParty },
    Provider { id: "azure",       display_name: "Azure OpenAI", kind: ProviderKind::Cloud },
    Provider { id: "azure_ai",    display_name: "Azure AI",     kind: ProviderKind::Cloud },
    Provider { id: "bedrock",     display_name: "AWS Bedrock",  kind: ProviderKind::Cloud },
    Provider { id: "cohere",      display_name: "Cohere",       kind: ProviderKind::FirstParty },
    Provider { id: "deepseek",    display_name: "DeepSeek",     kind: ProviderKind::FirstParty },
    Provider { id: "fireworks_ai", display_name: "Fireworks",   kind: ProviderKind::OpenWeights },
    Provider { id: "gemini",      display_name: "Google Gemini", kind: ProviderKind::FirstParty },
    Provider { id: "groq",        display_name: "Groq",         kind: ProviderKind::OpenWeights },
    Provider { id: "mistral",     display_name: "Mistral AI",   kind: ProviderKind::FirstParty },
    Provider { id: "openai",      display_name: "OpenAI",       kind: ProviderKind::FirstParty },
    Provider { id: "text-completion-openai", display_name: "OpenAI Text Completion", kind: ProviderKind::FirstParty },
    Provider { id: "together_ai", display_name: "Together AI",  kind: ProviderKind::OpenWeights },
    Provider { id: "vertex_ai",   display_name: "Vertex AI",    kind: ProviderKind::Cloud },
    Provider { id: "voyage",      display_name: "Voyage AI",    kind: ProviderKind::FirstParty },
    Provider { id: "xai",         display_name: "xAI",          kind: ProviderKind::FirstParty },
];

pub fn lookup(id: &str) -> Option<&'static Provider> {
    PROVIDERS.iter().find(|p| p.id == id)
}

/// Registry display name, or the raw id for providers we don't list.
pub fn display_name(id: &str) -> &str {
    lookup(id).map(|p| p.display_name).unwrap_or(id)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSummary {
    pub id: String,
    pub display_name: String,
    pub model_count: usize,
}

/// Every provider present in `models` with its model count, sorted by id.
pub fn provider_summaries(models: &[ProcessedModel]) -> Vec<ProviderSummary> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for m in models {
        *counts.entry(m.provider.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(id, model_count)| ProviderSummary {
            id: id.to_string(),
            display_name: display_name(id).to_string(),
            model_count,
        })
        .collect()
}
