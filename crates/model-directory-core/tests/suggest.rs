use model_directory_core::mode::Mode;
use model_directory_core::model::{ModelData, ProcessedModel};
use model_directory_core::suggest::{
    suggest, SearchAction, SearchBox, SearchEvent, SearchPhase, Suggestion,
};

fn make_model(key: &str, provider: &str, mode: Mode) -> ProcessedModel {
    ProcessedModel::from_entry(
        key,
        Some(provider),
        ModelData {
            mode,
            ..Default::default()
        },
    )
}

fn five_models() -> Vec<ProcessedModel> {
    vec![
        make_model("gpt-4o", "openai", Mode::Chat),
        make_model("gpt-4o-mini", "openai", Mode::Chat),
        make_model("openrouter/mistral-7b", "openrouter", Mode::Chat),
        make_model("together_ai/openchat-3.5", "together_ai", Mode::Chat),
        make_model("claude-3-haiku", "anthropic", Mode::Chat),
    ]
}

#[test]
fn empty_query_suggests_nothing() {
    assert!(suggest(&five_models(), "").is_empty());
    assert!(suggest(&five_models(), "  ").is_empty());
}

#[test]
fn models_then_providers() {
    let s = suggest(&five_models(), "open");
    assert_eq!(s.len(), 3);
    match &s[0] {
        Suggestion::Model { id, label, subtitle, route } => {
            assert_eq!(id, "together_ai/openchat-3.5");
            assert_eq!(label, "openchat-3.5");
            assert!(subtitle.is_none());
            assert_eq!(route, "/models/provider/together_ai/model/openchat-3-5");
        }
        other => panic!("expected a model suggestion first, got {other:?}"),
    }
    assert_eq!(
        s[1],
        Suggestion::Provider { value: "openai".into(), label: "OpenAI".into() }
    );
    assert_eq!(
        s[2],
        Suggestion::Provider { value: "openrouter".into(), label: "openrouter".into() }
    );
}

#[test]
fn shared_display_name_lists_each_variant() {
    let models = vec![
        make_model("gpt-4o", "openai", Mode::Chat),
        make_model("azure/gpt-4o", "azure", Mode::Chat),
        make_model("gpt-4o-mini", "openai", Mode::Chat),
    ];
    let s = suggest(&models, "gpt-4o");
    let subtitles: Vec<Option<&str>> = s
        .iter()
        .map(|x| match x {
            Suggestion::Model { subtitle, .. } => subtitle.as_deref(),
            _ => panic!("only model suggestions expected"),
        })
        .collect();
    assert_eq!(
        subtitles,
        vec![
            Some("OpenAI \u{2022} Chat"),
            Some("Azure OpenAI \u{2022} Chat"),
            None,
        ]
    );
}

#[test]
fn identical_variants_are_deduplicated() {
    let models = vec![
        make_model("gpt-4o", "openai", Mode::Chat),
        make_model("openai/gpt-4o", "openai", Mode::Chat),
    ];
    let s = suggest(&models, "gpt");
    assert_eq!(s.len(), 1);
    assert_eq!(s[0].label(), "gpt-4o");
}

#[test]
fn provider_suggestions_have_distinct_labels() {
    let models = vec![
        make_model("gpt-4o", "openai", Mode::Chat),
        make_model("text-completion-openai/gpt-3.5-turbo-instruct", "text-completion-openai", Mode::Completion),
    ];
    let providers: Vec<(String, String)> = suggest(&models, "openai")
        .into_iter()
        .filter_map(|s| match s {
            Suggestion::Provider { value, label } => Some((value, label)),
            _ => None,
        })
        .collect();
    assert_eq!(
        providers,
        vec![
            ("openai".to_string(), "OpenAI".to_string()),
            ("text-completion-openai".to_string(), "OpenAI Text Completion".to_string()),
        ]
    );
}

#[test]
fn mode_suggestions_match_label_or_name() {
    let models = vec![
        make_model("dall-e-3", "openai", Mode::ImageGeneration),
        make_model("sora-2", "openai", Mode::VideoGeneration),
        make_model("gpt-4o", "openai", Mode::Chat),
    ];
    let s = suggest(&models, "generation");
    assert_eq!(
        s,
        vec![
            Suggestion::Mode { value: "image_generation".into(), label: "Image Generation".into() },
            Suggestion::Mode { value: "video_generation".into(), label: "Video Generation".into() },
        ]
    );
}

#[test]
fn caps_per_group_and_overall() {
    let mut models = Vec::new();
    for i in 0..12 {
        models.push(make_model(&format!("x-model-{i}"), &format!("x-host-{}", i % 5), Mode::Chat));
    }
    let s = suggest(&models, "x");
    assert_eq!(s.len(), 10);
    assert!(s[..8].iter().all(|x| matches!(x, Suggestion::Model { .. })));
    assert!(s[8..].iter().all(|x| matches!(x, Suggestion::Provider { .. })));

    let s = suggest(&models, "x-host");
    assert_eq!(s.len(), 3, "provider suggestions cap at 3");
}

#[test]
fn keyboard_navigation_to_model() {
    let models = five_models();
    let mut sb = SearchBox::new();
    assert_eq!(sb.phase(), &SearchPhase::Idle);

    let action = sb.handle(SearchEvent::Input("gpt".into()), &models);
    assert_eq!(action, SearchAction::Search("gpt".into()));
    assert_eq!(sb.phase(), &SearchPhase::Typing);
    assert_eq!(sb.visible_suggestions().len(), 2);

    sb.handle(SearchEvent::ArrowDown, &models);
    assert_eq!(sb.highlighted(), Some(0));
    sb.handle(SearchEvent::ArrowDown, &models);
    sb.handle(SearchEvent::ArrowDown, &models);
    assert_eq!(sb.highlighted(), Some(1), "stops at the last row");

    let action = sb.handle(SearchEvent::Enter, &models);
    let route = "/models/provider/openai/model/gpt-4o-mini".to_string();
    assert_eq!(action, SearchAction::Navigate(route.clone()));
    assert_eq!(sb.phase(), &SearchPhase::Navigating(route));
}

#[test]
fn pointer_and_keyboard_commit_the_same() {
    let models = five_models();

    let mut keys = SearchBox::new();
    keys.handle(SearchEvent::Input("open".into()), &models);
    keys.handle(SearchEvent::ArrowDown, &models);
    keys.handle(SearchEvent::ArrowDown, &models);
    let by_key = keys.handle(SearchEvent::Enter, &models);

    let mut mouse = SearchBox::new();
    mouse.handle(SearchEvent::Input("open".into()), &models);
    let by_click = mouse.handle(SearchEvent::Pick(1), &models);

    assert_eq!(by_key, by_click);
    assert_eq!(by_key, SearchAction::FillSearch("openai".into()));
    assert_eq!(keys.query(), "openai");
    assert_eq!(mouse.query(), "openai");
    assert_eq!(mouse.phase(), &SearchPhase::Dismissed);
    assert!(mouse.visible_suggestions().is_empty());
}

#[test]
fn arrow_up_from_first_row_returns_to_typing() {
    let models = five_models();
    let mut sb = SearchBox::new();
    sb.handle(SearchEvent::Input("gpt".into()), &models);
    sb.handle(SearchEvent::ArrowDown, &models);
    sb.handle(SearchEvent::ArrowUp, &models);
    assert_eq!(sb.phase(), &SearchPhase::Typing);
    assert_eq!(sb.highlighted(), None);
}

#[test]
fn enter_while_typing_searches_raw_query() {
    let models = five_models();
    let mut sb = SearchBox::new();
    sb.handle(SearchEvent::Input("claude".into()), &models);
    let action = sb.handle(SearchEvent::Enter, &models);
    assert_eq!(action, SearchAction::Search("claude".into()));
    assert_eq!(sb.phase(), &SearchPhase::Dismissed);
}

#[test]
fn escape_and_blur_dismiss() {
    let models = five_models();
    let mut sb = SearchBox::new();
    sb.handle(SearchEvent::Input("gpt".into()), &models);
    sb.handle(SearchEvent::Escape, &models);
    assert_eq!(sb.phase(), &SearchPhase::Dismissed);
    assert!(sb.visible_suggestions().is_empty());
    assert_eq!(sb.handle(SearchEvent::Pick(0), &models), SearchAction::None);

    sb.handle(SearchEvent::Input("gpt-4".into()), &models);
    sb.handle(SearchEvent::ArrowDown, &models);
    sb.handle(SearchEvent::Blur, &models);
    assert_eq!(sb.phase(), &SearchPhase::Dismissed);
}

#[test]
fn clearing_input_goes_idle() {
    let models = five_models();
    let mut sb = SearchBox::new();
    sb.handle(SearchEvent::Input("gpt".into()), &models);
    sb.handle(SearchEvent::Input(String::new()), &models);
    assert_eq!(sb.phase(), &SearchPhase::Idle);
    assert!(sb.visible_suggestions().is_empty());
    assert_eq!(sb.handle(SearchEvent::Escape, &models), SearchAction::None);
    assert_eq!(sb.phase(), &SearchPhase::Idle);
}

#[test]
fn out_of_range_pick_is_ignored() {
    let models = five_models();
    let mut sb = SearchBox::new();
    sb.handle(SearchEvent::Input("gpt".into()), &models);
    assert_eq!(sb.handle(SearchEvent::Pick(7), &models), SearchAction::None);
    assert_eq!(sb.phase(), &SearchPhase::Typing);
}
