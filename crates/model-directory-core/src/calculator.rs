//! Usage cost calculation.
//!
//! Each mode maps to a list of [`Charge`]s: a priced quantity feeding one
//! breakdown line. [`calculate_cost`] multiplies them out and
//! [`visible_fields`] lists the quantities a form should ask for, so both
//! always agree on what a model bills for.

use serde::{Deserialize, Deserializer, Serialize};

use crate::mode::Mode;
use crate::model::ModelData;

/// A usage quantity the user can enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputField {
    InputTokens,
    OutputTokens,
    Images,
    Seconds,
    Pages,
}

impl InputField {
    pub fn label(self) -> &'static str {
        match self {
            InputField::InputTokens => "input tokens",
            InputField::OutputTokens => "output tokens",
            InputField::Images => "images",
            InputField::Seconds => "seconds",
            InputField::Pages => "pages",
        }
    }
}

/// A line of the cost breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Input,
    Output,
    Images,
    Audio,
    Video,
    Ocr,
}

impl Component {
    pub fn label(self) -> &'static str {
        match self {
            Component::Input => "input",
            Component::Output => "output",
            Component::Images => "images",
            Component::Audio => "audio",
            Component::Video => "video",
            Component::Ocr => "ocr",
        }
    }
}

/// One priced quantity: `field` units at `unit_price` each, billed to `component`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Charge {
    pub component: Component,
    pub field: InputField,
    pub unit_price: f64,
}

/// Usage quantities entered in the calculator.
///
/// Deserializing never fails on a quantity: missing, null, negative or
/// non-numeric values become 0 and fractions are truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    #[serde(default, deserialize_with = "quantity")]
    pub input_tokens: u64,
    #[serde(default, deserialize_with = "quantity")]
    pub output_tokens: u64,
    #[serde(default, deserialize_with = "quantity")]
    pub images: u64,
    #[serde(default, deserialize_with = "quantity")]
    pub seconds: u64,
    #[serde(default, deserialize_with = "quantity")]
    pub pages: u64,
}

/// A quantity as a form sends it: a number of any sign or size, or raw text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn quantity<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(match Option::<RawQuantity>::deserialize(d)? {
        Some(RawQuantity::Number(v)) => coerce_quantity(v),
        Some(RawQuantity::Text(s)) => parse_quantity(&s),
        Some(RawQuantity::Other(_)) | None => 0,
    })
}

impl Default for CalculationInput {
    fn default() -> Self {
        Self {
            input_tokens: 1000,
            output_tokens: 500,
            images: 1,
            seconds: 60,
            pages: 1,
        }
    }
}

impl CalculationInput {
    pub fn get(&self, field: InputField) -> u64 {
        match field {
            InputField::InputTokens => self.input_tokens,
            InputField::OutputTokens => self.output_tokens,
            InputField::Images => self.images,
            InputField::Seconds => self.seconds,
            InputField::Pages => self.pages,
        }
    }

    pub fn set(&mut self, field: InputField, value: u64) {
        match field {
            InputField::InputTokens => self.input_tokens = value,
            InputField::OutputTokens => self.output_tokens = value,
            InputField::Images => self.images = value,
            InputField::Seconds => self.seconds = value,
            InputField::Pages => self.pages = value,
        }
    }

    /// Set a field from raw text the way a form field does.
    pub fn set_raw(&mut self, field: InputField, raw: &str) {
        self.set(field, parse_quantity(raw));
    }
}

/// Parse a typed quantity. Anything that is not a non-negative number is 0;
/// fractions are truncated.
pub fn parse_quantity(raw: &str) -> u64 {
    raw.trim().parse::<f64>().map(coerce_quantity).unwrap_or(0)
}

/// Clamp a numeric quantity into a non-negative whole count.
pub fn coerce_quantity(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 {
        v.trunc() as u64
    } else {
        0
    }
}

/// Itemized cost. A line is `None` when nothing is billed for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr: Option<f64>,
}

impl Breakdown {
    fn slot(&mut self, component: Component) -> &mut Option<f64> {
        match component {
            Component::Input => &mut self.input,
            Component::Output => &mut self.output,
            Component::Images => &mut self.images,
            Component::Audio => &mut self.audio,
            Component::Video => &mut self.video,
            Component::Ocr => &mut self.ocr,
        }
    }

    fn add(&mut self, component: Component, amount: f64) {
        let slot = self.slot(component);
        *slot = Some(slot.unwrap_or(0.0) + amount);
    }

    pub fn get(&self, component: Component) -> Option<f64> {
        match component {
            Component::Input => self.input,
            Component::Output => self.output,
            Component::Images => self.images,
            Component::Audio => self.audio,
            Component::Video => self.video,
            Component::Ocr => self.ocr,
        }
    }

    /// Populated lines in display order.
    pub fn lines(&self) -> Vec<(Component, f64)> {
        [
            Component::Input,
            Component::Output,
            Component::Images,
            Component::Audio,
            Component::Video,
            Component::Ocr,
        ]
        .into_iter()
        .filter_map(|c| self.get(c).map(|v| (c, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }

    pub fn total(&self) -> f64 {
        self.lines().iter().map(|(_, v)| v).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    pub breakdown: Breakdown,
    #[serde(rename = "totalCost")]
    pub total_cost: f64,
}

/// Price `inputs` against `data`. Never fails: unpriced usage is simply left
/// out of the breakdown.
pub fn calculate_cost(data: &ModelData, inputs: &CalculationInput) -> CostResult {
    let mut breakdown = Breakdown::default();
    for c in charges(data) {
        breakdown.add(c.component, inputs.get(c.field) as f64 * c.unit_price);
    }
    CostResult {
        total_cost: breakdown.total(),
        breakdown,
    }
}

/// Quantity fields to show for `data`, in form order, without duplicates.
pub fn visible_fields(data: &ModelData) -> Vec<InputField> {
    let mut fields: Vec<InputField> = Vec::new();
    for c in charges(data) {
        if !fields.contains(&c.field) {
            fields.push(c.field);
        }
    }
    fields
}

/// Every priced quantity that applies to `data` under its mode.
pub fn charges(data: &ModelData) -> Vec<Charge> {
    let lines = match &data.mode {
        Mode::Chat | Mode::Responses => chat(data),
        Mode::Embedding => embedding(data),
        Mode::Rerank => rerank(data),
        Mode::Completion => tokens(data),
        Mode::ImageGeneration => image_generation(data),
        Mode::VideoGeneration => video_generation(data),
        Mode::AudioTranscription => audio_transcription(data),
        Mode::AudioSpeech => audio_speech(data),
        Mode::Ocr => ocr(data),
        Mode::Other(_) => tokens(data),
    };
    lines.into_iter().flatten().collect()
}

fn charge(component: Component, field: InputField, price: Option<f64>) -> Option<Charge> {
    price.map(|unit_price| Charge {
        component,
        field,
        unit_price,
    })
}

fn input_tokens(data: &ModelData) -> Option<Charge> {
    charge(Component::Input, InputField::InputTokens, data.input_cost_per_token)
}

fn output_tokens(data: &ModelData) -> Option<Charge> {
    charge(Component::Output, InputField::OutputTokens, data.output_cost_per_token)
}

fn tokens(data: &ModelData) -> Vec<Option<Charge>> {
    vec![input_tokens(data), output_tokens(data)]
}

fn chat(data: &ModelData) -> Vec<Option<Charge>> {
    let images = data
        .supports_vision
        .then(|| charge(Component::Images, InputField::Images, data.input_cost_per_image))
        .flatten();
    vec![input_tokens(data), output_tokens(data), images]
}

fn embedding(data: &ModelData) -> Vec<Option<Charge>> {
    vec![input_tokens(data)]
}

fn rerank(data: &ModelData) -> Vec<Option<Charge>> {
    tokens(data)
}

fn image_generation(data: &ModelData) -> Vec<Option<Charge>> {
    let per_image = data.output_cost_per_image.or(data.input_cost_per_image);
    vec![
        input_tokens(data),
        charge(Component::Images, InputField::Images, per_image),
    ]
}

fn video_generation(data: &ModelData) -> Vec<Option<Charge>> {
    vec![
        input_tokens(data),
        charge(Component::Video, InputField::Seconds, data.output_cost_per_second),
    ]
}

fn audio_transcription(data: &ModelData) -> Vec<Option<Charge>> {
    if data.input_cost_per_token.is_some() || data.output_cost_per_token.is_some() {
        tokens(data)
    } else {
        vec![charge(Component::Audio, InputField::Seconds, data.input_cost_per_second)]
    }
}

fn audio_speech(data: &ModelData) -> Vec<Option<Charge>> {
    vec![
        input_tokens(data),
        output_tokens(data),
        charge(Component::Audio, InputField::Seconds, data.output_cost_per_second),
    ]
}

fn ocr(data: &ModelData) -> Vec<Option<Charge>> {
    vec![
        charge(Component::Ocr, InputField::Pages, data.ocr_cost_per_page),
        input_tokens(data),
    ]
}
