use std::str::FromStr;

use serde_json::{json, Value};

use crate::mode::Mode;
use crate::model::ProcessedModel;

/// Where the snippets point: a locally running gateway.
pub const GATEWAY_BASE_URL: &str = "http://localhost:4000";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lang {
    Python,
    Curl,
    Javascript,
}

impl FromStr for Lang {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "curl" => Ok(Self::Curl),
            "js" | "javascript" => Ok(Self::Javascript),
            other => Err(format!("unknown lang: {other}")),
        }
    }
}

/// OpenAI-compatible path and JSON body for a model's mode.
fn request(mode: &Mode, model: &str) -> (&'static str, Value) {
    match mode {
        Mode::Responses => ("/v1/responses", json!({"model": model, "input": "Hello!"})),
        Mode::Completion => (
            "/v1/completions",
            json!({"model": model, "prompt": "Hello!", "max_tokens": 64}),
        ),
        Mode::Embedding => (
            "/v1/embeddings",
            json!({"model": model, "input": ["The quick brown fox"]}),
        ),
        Mode::Rerank => (
            "/v1/rerank",
            json!({
                "model": model,
                "query": "What is the capital of France?",
                "documents": ["Paris is the capital of France.", "Berlin is in Germany."]
            }),
        ),
        Mode::ImageGeneration => (
            "/v1/images/generations",
            json!({"model": model, "prompt": "A lighthouse at dusk", "n": 1}),
        ),
        Mode::VideoGeneration => (
            "/v1/videos",
            json!({"model": model, "prompt": "A lighthouse at dusk", "seconds": 8}),
        ),
        Mode::AudioTranscription => ("/v1/audio/transcriptions", json!({"model": model})),
        Mode::AudioSpeech => (
            "/v1/audio/speech",
            json!({"model": model, "input": "Hello!", "voice": "alloy"}),
        ),
        Mode::Ocr => (
            "/v1/ocr",
            json!({
                "model": model,
                "document": {"type": "document_url", "document_url": "https://example.com/invoice.pdf"}
            }),
        ),
        Mode::Chat | Mode::Other(_) => (
            "/v1/chat/completions",
            json!({"model": model, "messages": [{"role": "user", "content": "Hello!"}]}),
        ),
    }
}

/// Snippet calling `model` through the gateway.
pub fn generate(model: &ProcessedModel, lang: Lang) -> String {
    generate_simple(&model.gateway_name(), model.mode(), lang)
}

/// Like [`generate`], from a bare gateway model name.
pub fn generate_simple(model_name: &str, mode: &Mode, lang: Lang) -> String {
    let (path, body) = request(mode, model_name);
    match lang {
        Lang::Curl => curl(path, &body, mode),
        Lang::Python => python(model_name, path, &body, mode),
        Lang::Javascript => javascript(path, &body, mode),
    }
}

fn curl(path: &str, body: &Value, mode: &Mode) -> String {
    if *mode == Mode::AudioTranscription {
        let model = body["model"].as_str().unwrap_or_default();
        return format!(
            r#"curl -X POST {GATEWAY_BASE_URL}{path} \
  -H "Authorization: Bearer $GATEWAY_API_KEY" \
  -F model="{model}" \
  -F file="@audio.mp3""#
        );
    }
    format!(
        r#"curl -X POST {GATEWAY_BASE_URL}{path} \
  -H "Authorization: Bearer $GATEWAY_API_KEY" \
  -H "Content-Type: application/json" \
  -d '{body}'"#
    )
}

fn python(model: &str, path: &str, body: &Value, mode: &Mode) -> String {
    let header = format!(
        r#"import os
from openai import OpenAI

client = OpenAI(base_url="{GATEWAY_BASE_URL}", api_key=os.environ["GATEWAY_API_KEY"])
"#
    );
    let call = match mode {
        Mode::Chat | Mode::Other(_) => format!(
            r#"response = client.chat.completions.create(
    model="{model}",
    messages=[{{"role": "user", "content": "Hello!"}}]
)
print(response.choices[0].message.content)"#
        ),
        Mode::Responses => format!(
            r#"response = client.responses.create(model="{model}", input="Hello!")
print(response.output_text)"#
        ),
        Mode::Completion => format!(
            r#"response = client.completions.create(model="{model}", prompt="Hello!", max_tokens=64)
print(response.choices[0].text)"#
        ),
        Mode::Embedding => format!(
            r#"response = client.embeddings.create(model="{model}", input=["The quick brown fox"])
print(len(response.data[0].embedding))"#
        ),
        Mode::ImageGeneration => format!(
            r#"response = client.images.generate(model="{model}", prompt="A lighthouse at dusk", n=1)
print(response.data[0].url)"#
        ),
        Mode::AudioTranscription => format!(
            r#"with open("audio.mp3", "rb") as f:
    transcript = client.audio.transcriptions.create(model="{model}", file=f)
print(transcript.text)"#
        ),
        Mode::AudioSpeech => format!(
            r#"speech = client.audio.speech.create(model="{model}", voice="alloy", input="Hello!")
speech.write_to_file("speech.mp3")"#
        ),
        // No SDK helper for these; post the JSON body directly.
        Mode::Rerank | Mode::Ocr | Mode::VideoGeneration => {
            let pretty = serde_json::to_string_pretty(body).unwrap_or_default();
            return format!(
                r#"import os
import requests

response = requests.post(
    "{GATEWAY_BASE_URL}{path}",
    headers={{"Authorization": f"Bearer {{os.environ['GATEWAY_API_KEY']}}"}},
    json={pretty},
)
print(response.json())"#
            );
        }
    };
    format!("{header}{call}")
}

fn javascript(path: &str, body: &Value, mode: &Mode) -> String {
    if *mode == Mode::AudioTranscription {
        let model = body["model"].as_str().unwrap_or_default();
        return format!(
            r#"import {{ readFile }} from "node:fs/promises";

const form = new FormData();
form.append("model", "{model}");
form.append("file", new Blob([await readFile("audio.mp3")]), "audio.mp3");

const res = await fetch("{GATEWAY_BASE_URL}{path}", {{
  method: "POST",
  headers: {{ Authorization: `Bearer ${{process.env.GATEWAY_API_KEY}}` }},
  body: form,
}});
console.log(await res.json());"#
        );
    }
    let pretty = serde_json::to_string_pretty(body).unwrap_or_default();
    let read = if *mode == Mode::AudioSpeech {
        "await res.arrayBuffer()"
    } else {
        "await res.json()"
    };
    format!(
        r#"const res = await fetch("{GATEWAY_BASE_URL}{path}", {{
  method: "POST",
  headers: {{
    Authorization: `Bearer ${{process.env.GATEWAY_API_KEY}}`,
    "Content-Type": "application/json",
  }},
  body: JSON.stringify({pretty}),
}});
console.log({read});"#
    )
}
