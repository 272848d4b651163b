use model_directory_core::mode::Mode;
use model_directory_core::model::{ModelData, ProcessedModel};
use model_directory_core::snippet::{generate, generate_simple, Lang};

fn model(key: &str, provider: &str, mode: Mode) -> ProcessedModel {
    ProcessedModel::from_entry(
        key,
        Some(provider),
        ModelData {
            mode,
            ..Default::default()
        },
    )
}

#[test]
fn python_snippet_uses_gateway() {
    let code = generate(&model("claude-3-haiku", "anthropic", Mode::Chat), Lang::Python);
    assert!(code.contains("anthropic/claude-3-haiku"), "must contain gateway model name");
    assert!(code.contains("from openai import OpenAI"), "must use the OpenAI SDK");
    assert!(code.contains("chat.completions.create"));
    assert!(code.contains("GATEWAY_API_KEY"));
}

#[test]
fn curl_snippet_posts_json_to_mode_endpoint() {
    let code = generate(
        &model("text-embedding-3-small", "openai", Mode::Embedding),
        Lang::Curl,
    );
    assert!(code.contains("/v1/embeddings"));
    assert!(code.contains("$GATEWAY_API_KEY"));
    assert!(code.contains(r#""model":"openai/text-embedding-3-small""#));
}

#[test]
fn javascript_snippet_uses_fetch() {
    let code = generate(&model("dall-e-3", "openai", Mode::ImageGeneration), Lang::Javascript);
    assert!(code.contains("/v1/images/generations"));
    assert!(code.contains("openai/dall-e-3"));
    assert!(code.contains("process.env.GATEWAY_API_KEY"));
}

#[test]
fn transcription_uploads_a_file() {
    let m = model("whisper-1", "openai", Mode::AudioTranscription);
    assert!(generate(&m, Lang::Curl).contains("-F file=\"@audio.mp3\""));
    assert!(generate(&m, Lang::Python).contains("audio.transcriptions.create"));
    assert!(generate(&m, Lang::Javascript).contains("FormData"));
}

#[test]
fn rerank_python_falls_back_to_requests() {
    let code = generate_simple("voyage/rerank-2", &Mode::Rerank, Lang::Python);
    assert!(code.contains("import requests"));
    assert!(code.contains("/v1/rerank"));
    assert!(code.contains("\"documents\""));
}

#[test]
fn lang_parsing() {
    assert_eq!("py".parse::<Lang>(), Ok(Lang::Python));
    assert_eq!("JS".parse::<Lang>(), Ok(Lang::Javascript));
    assert_eq!("curl".parse::<Lang>(), Ok(Lang::Curl));
    assert!("ruby".parse::<Lang>().is_err());
}
