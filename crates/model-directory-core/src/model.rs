use serde::{Deserialize, Serialize};

use crate::mode::Mode;
use crate::provider;
use crate::route;

/// Pricing, capability and limit metadata for one model, as found in the
/// pricing dataset. Every price is optional; a missing price means the
/// corresponding usage is not billed for this model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    #[serde(default)]
    pub mode: Mode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_cost_per_token: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_cost_per_token: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_cost_per_image: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_cost_per_image: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_cost_per_second: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_cost_per_second: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_cost_per_page: Option<f64>,

    #[serde(default)]
    pub supports_vision: bool,
    #[serde(default)]
    pub supports_function_calling: bool,
    #[serde(default)]
    pub supports_reasoning: bool,
    #[serde(default)]
    pub supports_web_search: bool,
    #[serde(default)]
    pub supports_audio_input: bool,
    #[serde(default)]
    pub supports_audio_output: bool,
    #[serde(default)]
    pub supports_prompt_caching: bool,
    #[serde(default)]
    pub supports_parallel_function_calling: bool,
    #[serde(default)]
    pub supports_system_messages: bool,
    #[serde(default)]
    pub supports_response_schema: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_input_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_query_tokens: Option<u64>,
}

impl ModelData {
    /// Labels for every capability flag that is set, in a fixed order.
    pub fn capabilities(&self) -> Vec<&'static str> {
        [
            (self.supports_vision, "vision"),
            (self.supports_function_calling, "function calling"),
            (self.supports_parallel_function_calling, "parallel function calling"),
            (self.supports_reasoning, "reasoning"),
            (self.supports_web_search, "web search"),
            (self.supports_audio_input, "audio input"),
            (self.supports_audio_output, "audio output"),
            (self.supports_prompt_caching, "prompt caching"),
            (self.supports_system_messages, "system messages"),
            (self.supports_response_schema, "response schema"),
        ]
        .into_iter()
        .filter_map(|(on, label)| on.then_some(label))
        .collect()
    }

    /// Input context size: `max_input_tokens`, falling back to `max_tokens`.
    pub fn context_window(&self) -> Option<u64> {
        self.max_input_tokens.or(self.max_tokens)
    }

    /// True when no price field at all is set.
    pub fn is_unpriced(&self) -> bool {
        [
            self.input_cost_per_token,
            self.output_cost_per_token,
            self.input_cost_per_image,
            self.output_cost_per_image,
            self.input_cost_per_second,
            self.output_cost_per_second,
            self.ocr_cost_per_page,
        ]
        .iter()
        .all(Option::is_none)
    }
}

/// A dataset entry with the identity the site uses for display and routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedModel {
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub provider: String,
    pub slug: String,
    #[serde(flatten)]
    pub data: ModelData,
}

impl ProcessedModel {
    /// Build from a dataset key (e.g. `gpt-4o` or `bedrock/amazon.nova-pro-v1:0`)
    /// and the entry's `litellm_provider`, if any.
    pub fn from_entry(key: &str, litellm_provider: Option<&str>, data: ModelData) -> Self {
        let provider = litellm_provider
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .or_else(|| key.split_once('/').map(|(p, _)| p.to_string()))
            .unwrap_or_else(|| "unknown".to_string());
        let display_name = key
            .strip_prefix(&format!("{provider}/"))
            .unwrap_or(key)
            .to_string();
        let slug = model_slug(&display_name, key);
        Self {
            id: key.to_string(),
            display_name,
            provider,
            slug,
            data,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.data.mode
    }

    pub fn provider_name(&self) -> &str {
        provider::display_name(&self.provider)
    }

    /// Detail page for this model.
    pub fn route(&self) -> String {
        route::model_route(&self.provider, &self.slug)
    }

    /// Gateway model name, `provider/displayName`.
    pub fn gateway_name(&self) -> String {
        format!("{}/{}", self.provider, self.display_name)
    }
}

/// Lowercase, collapse every run of non-alphanumerics into `-`, trim dashes.
/// Non-ASCII letters and digits are kept.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if dash && !out.is_empty() {
                out.push('-');
            }
            dash = false;
            out.extend(c.to_lowercase());
        } else {
            dash = true;
        }
    }
    out
}

/// Slug for a model page. Never empty, so the route always parses back.
fn model_slug(display_name: &str, key: &str) -> String {
    [display_name, key]
        .into_iter()
        .map(slugify)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_SLUG.to_string())
}

const FALLBACK_SLUG: &str = "model";

/// Format a dollar amount with precision scaled to its size:
/// "$1234", "$12.50", "$0.005", "$0.0000125".
pub fn fmt_cost(v: f64) -> String {
    if v == 0.0 {
        "$0".to_string()
    } else if v >= 100.0 {
        format!("${:.0}", v)
    } else if v >= 1.0 {
        format!("${:.2}", v)
    } else {
        let digits = if v >= 0.01 { 4 } else { 8 };
        let s = format!("{:.*}", digits, v);
        format!("${}", s.trim_end_matches('0').trim_end_matches('.'))
    }
}

/// Per-token price as dollars per million tokens, e.g. "$2.50 / 1M".
pub fn fmt_per_million(cost_per_token: f64) -> String {
    format!("{} / 1M", fmt_cost(cost_per_token * 1_000_000.0))
}

/// Format a token limit as "128K", "1M", "8.2K".
pub fn fmt_tokens(n: u64) -> String {
    fn trim(s: String) -> String {
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s
        }
    }
    let f = n as f64;
    if f >= 1e6 {
        format!("{}M", trim(format!("{:.1}", f / 1e6)))
    } else if f >= 1e4 {
        format!("{:.0}K", f / 1e3)
    } else if f >= 1e3 {
        format!("{}K", trim(format!("{:.1}", f / 1e3)))
    } else {
        n.to_string()
    }
}
