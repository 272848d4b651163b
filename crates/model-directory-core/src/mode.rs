use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pricing category of a model. Selects which usage quantities apply and how
/// they are priced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mode {
    #[default]
    Chat,
    Responses,
    Embedding,
    Rerank,
    Completion,
    ImageGeneration,
    VideoGeneration,
    AudioTranscription,
    AudioSpeech,
    Ocr,
    /// Any mode the dataset carries that has no dedicated pricing formula.
    Other(String),
}

impl Mode {
    pub const KNOWN: &'static [Mode] = &[
        Mode::Chat,
        Mode::Responses,
        Mode::Embedding,
        Mode::Rerank,
        Mode::Completion,
        Mode::ImageGeneration,
        Mode::VideoGeneration,
        Mode::AudioTranscription,
        Mode::AudioSpeech,
        Mode::Ocr,
    ];

    /// Wire name, e.g. `image_generation`.
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Chat => "chat",
            Mode::Responses => "responses",
            Mode::Embedding => "embedding",
            Mode::Rerank => "rerank",
            Mode::Completion => "completion",
            Mode::ImageGeneration => "image_generation",
            Mode::VideoGeneration => "video_generation",
            Mode::AudioTranscription => "audio_transcription",
            Mode::AudioSpeech => "audio_speech",
            Mode::Ocr => "ocr",
            Mode::Other(s) => s,
        }
    }

    /// Human label, e.g. `Image Generation`.
    pub fn label(&self) -> String {
        match self {
            Mode::Ocr => "OCR".to_string(),
            other => other
                .as_str()
                .split('_')
                .filter(|w| !w.is_empty())
                .map(|w| {
                    let mut chars = w.chars();
                    match chars.next() {
                        Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl From<&str> for Mode {
    fn from(s: &str) -> Self {
        let lower = s.trim().to_ascii_lowercase();
        Mode::KNOWN
            .iter()
            .find(|m| m.as_str() == lower)
            .cloned()
            .unwrap_or(Mode::Other(lower))
    }
}

impl From<String> for Mode {
    fn from(s: String) -> Self {
        Mode::from(s.as_str())
    }
}

impl From<Mode> for String {
    fn from(m: Mode) -> Self {
        m.as_str().to_string()
    }
}

impl FromStr for Mode {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Mode::from(s))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
