use model_directory_core::catalog::load_bundled_models;
use model_directory_core::directory::{
    DirectoryState, EmptyState, Filters, IndexState, Scope, Selection, SortDirection, SortKey,
    SortState, PAGE_SIZE,
};
use model_directory_core::mode::Mode;
use model_directory_core::model::{ModelData, ProcessedModel};

fn make_model(key: &str, provider: &str, mode: Mode, input: Option<f64>) -> ProcessedModel {
    ProcessedModel::from_entry(
        key,
        Some(provider),
        ModelData {
            mode,
            input_cost_per_token: input,
            output_cost_per_token: input.map(|p| p * 4.0),
            ..Default::default()
        },
    )
}

fn fixture() -> Vec<ProcessedModel> {
    vec![
        make_model("gpt-4o", "openai", Mode::Chat, Some(2.5e-6)),
        make_model("text-embedding-3-small", "openai", Mode::Embedding, Some(2e-8)),
        make_model("claude-3-haiku", "anthropic", Mode::Chat, Some(2.5e-7)),
        make_model("mistral/mistral-ocr-latest", "mistral", Mode::Ocr, None),
        make_model("dall-e-3", "openai", Mode::ImageGeneration, None),
        make_model("voyage/voyage-3", "voyage", Mode::Embedding, Some(6e-8)),
    ]
}

fn filtered(models: &[ProcessedModel], query: &str, provider: &str, mode: &str) -> Vec<String> {
    let f = Filters {
        query: query.to_string(),
        provider: Selection::from(provider),
        mode: Selection::from(mode),
    };
    f.apply(models).into_iter().map(|m| m.id.clone()).collect()
}

#[test]
fn empty_query_matches_everything() {
    let models = fixture();
    assert_eq!(filtered(&models, "", "all", "all").len(), models.len());
    assert_eq!(filtered(&models, "   ", "all", "all").len(), models.len());
}

#[test]
fn query_matches_name_provider_mode_or_id() {
    let models = fixture();
    assert_eq!(filtered(&models, "HAIKU", "all", "all"), vec!["claude-3-haiku"]);
    assert_eq!(filtered(&models, "anthropic", "all", "all"), vec!["claude-3-haiku"]);
    assert_eq!(
        filtered(&models, "embedding", "all", "all"),
        vec!["text-embedding-3-small", "voyage/voyage-3"]
    );
    // Only the id carries the provider prefix.
    assert_eq!(
        filtered(&models, "mistral/", "all", "all"),
        vec!["mistral/mistral-ocr-latest"]
    );
    assert!(filtered(&models, "nothing-like-this", "all", "all").is_empty());
}

#[test]
fn provider_and_mode_filters_combine() {
    let models = fixture();
    assert_eq!(
        filtered(&models, "", "openai", "embedding"),
        vec!["text-embedding-3-small"]
    );
    assert_eq!(filtered(&models, "", "all", "ocr"), vec!["mistral/mistral-ocr-latest"]);
    assert!(filtered(&models, "gpt", "anthropic", "all").is_empty());
}

#[test]
fn exact_display_name_always_found() {
    let models = load_bundled_models().unwrap();
    for m in &models {
        let hits = filtered(&models, &m.display_name, "all", "all");
        assert!(hits.contains(&m.id), "{} not found by its own name", m.id);
    }
}

#[test]
fn provider_filter_never_grows_results() {
    let models = load_bundled_models().unwrap();
    let all = filtered(&models, "", "all", "all").len();
    for p in ["openai", "anthropic", "vertex_ai", "nobody"] {
        let narrowed = filtered(&models, "", p, "all").len();
        assert!(narrowed <= all, "{p}: {narrowed} > {all}");
    }
}

#[test]
fn name_sort_descending_reverses_ascending() {
    let models = load_bundled_models().unwrap();
    let names = |direction| {
        let mut rows: Vec<&ProcessedModel> = models.iter().collect();
        SortState { key: SortKey::Name, direction }.apply(&mut rows);
        rows.iter().map(|m| m.id.clone()).collect::<Vec<_>>()
    };
    let asc = names(SortDirection::Asc);
    let mut desc = names(SortDirection::Desc);
    desc.reverse();
    // Ties (same display name) keep their original relative order both ways.
    let key = |id: &String| {
        models
            .iter()
            .find(|m| &m.id == id)
            .map(|m| m.display_name.to_lowercase())
            .unwrap()
    };
    let asc_names: Vec<String> = asc.iter().map(key).collect();
    let desc_names: Vec<String> = desc.iter().map(key).collect();
    assert_eq!(asc_names, desc_names);
}

#[test]
fn price_sort_treats_missing_as_zero() {
    let models = fixture();
    let mut rows: Vec<&ProcessedModel> = models.iter().collect();
    SortState { key: SortKey::Input, direction: SortDirection::Asc }.apply(&mut rows);
    let ids: Vec<&str> = rows.iter().map(|m| m.id.as_str()).collect();
    // Unpriced rows (zero) first, in input order, then by price.
    assert_eq!(
        ids,
        vec![
            "mistral/mistral-ocr-latest",
            "dall-e-3",
            "text-embedding-3-small",
            "voyage/voyage-3",
            "claude-3-haiku",
            "gpt-4o",
        ]
    );

    SortState { key: SortKey::Output, direction: SortDirection::Desc }.apply(&mut rows);
    assert_eq!(rows[0].id, "gpt-4o");
    assert!(rows[4].data.output_cost_per_token.is_none());
    assert!(rows[5].data.output_cost_per_token.is_none());
}

#[test]
fn provider_sort_is_case_insensitive() {
    let models = vec![
        make_model("a", "Zeta", Mode::Chat, None),
        make_model("b", "alpha", Mode::Chat, None),
    ];
    let mut rows: Vec<&ProcessedModel> = models.iter().collect();
    SortState { key: SortKey::Provider, direction: SortDirection::Asc }.apply(&mut rows);
    assert_eq!(rows[0].provider, "alpha");
}

fn many_models() -> Vec<ProcessedModel> {
    let mut models = Vec::new();
    for i in 0..150 {
        models.push(make_model(&format!("alpha-{i:03}"), "openai", Mode::Chat, Some(1e-6)));
    }
    for i in 0..100 {
        models.push(make_model(&format!("beta-{i:03}"), "anthropic", Mode::Chat, Some(1e-6)));
    }
    models
}

#[test]
fn full_index_paginates_filtered_rows() {
    let models = many_models();
    let mut state = DirectoryState::new(Scope::All);
    state.set_query("alpha");

    let view = state.view(&models);
    assert!(view.paginated);
    assert_eq!(view.total_matches, 150);
    assert_eq!(view.total_pages, 2);
    assert_eq!(view.page, 1);
    assert_eq!(view.rows.len(), PAGE_SIZE);
    assert_eq!(view.rows[0].id, "alpha-000");

    let total = view.total_pages;
    state.go_to_page(2, total);
    let view = state.view(&models);
    assert_eq!(view.page, 2);
    assert_eq!(view.rows.len(), 50);
    assert_eq!(view.rows[0].id, "alpha-100");
}

#[test]
fn page_navigation_clamps() {
    let models = many_models();
    let mut state = DirectoryState::new(Scope::All);
    state.set_query("a");
    let total = state.view(&models).total_pages;
    assert_eq!(total, 3);

    state.go_to_page(99, total);
    assert_eq!(state.page, 3);
    state.next_page(total);
    assert_eq!(state.page, 3);
    state.go_to_page(0, total);
    assert_eq!(state.page, 1);
    state.prev_page(total);
    assert_eq!(state.page, 1);
}

#[test]
fn filter_changes_reset_page() {
    let models = many_models();
    let mut state = DirectoryState::new(Scope::All);
    state.set_query("a");
    state.go_to_page(3, 3);

    state.set_mode(Selection::from("chat"));
    assert_eq!(state.page, 1);

    state.go_to_page(2, 3);
    state.set_provider(Selection::from("openai"));
    assert_eq!(state.page, 1);

    state.go_to_page(2, 3);
    state.set_query("alpha");
    assert_eq!(state.page, 1);
    assert_eq!(state.view(&models).total_matches, 150);
}

#[test]
fn page_scope_shows_server_page_unpaginated() {
    let models = many_models();
    let mut state = DirectoryState::new(Scope::Page);
    state.set_query("a");
    let view = state.view(&models);
    assert!(!view.paginated);
    assert_eq!(view.rows.len(), 250);
    assert_eq!(view.total_pages, 1);
    assert!(state.index_request().is_none());
}

#[test]
fn full_scope_without_filter_is_unpaginated() {
    let models = many_models();
    let state = DirectoryState::new(Scope::All);
    let view = state.view(&models);
    assert!(!view.paginated);
    assert_eq!(view.rows.len(), 250);
    assert!(state.index_request().is_none());
}

#[test]
fn sort_toggle_through_state() {
    let mut state = DirectoryState::new(Scope::Page);
    state.toggle_sort(SortKey::Output);
    assert_eq!(state.sort.key, SortKey::Output);
    assert_eq!(state.sort.direction, SortDirection::Asc);
    state.toggle_sort(SortKey::Output);
    assert_eq!(state.sort.direction, SortDirection::Desc);
    state.toggle_sort(SortKey::Name);
    assert_eq!(state.sort.direction, SortDirection::Asc);
}

#[test]
fn index_fetch_lifecycle() {
    let page = fixture();
    let mut state = DirectoryState::new(Scope::All);
    assert!(state.index_request().is_none(), "no filter, no fetch");

    state.set_query("zzz");
    let req = state.begin_index_fetch().expect("filter active, should fetch");
    assert_eq!(req.path(), "/api/models");
    assert_eq!(state.index, IndexState::Loading);
    assert!(state.index_request().is_none(), "already in flight");
    assert_eq!(state.view(&page).empty, Some(EmptyState::Loading));

    state.finish_index_fetch(Err("HTTP 500".into()));
    assert_eq!(
        state.view(&page).empty,
        Some(EmptyState::IndexFailed("HTTP 500".into()))
    );
    assert!(state.index_request().is_none(), "failures are not retried");

    // Page-scoped data still filters after a failure.
    state.set_query("haiku");
    let view = state.view(&page);
    assert_eq!(view.rows.len(), 1);
    assert!(view.empty.is_none());
}

#[test]
fn loaded_index_replaces_page_data() {
    let page = fixture();
    let index = many_models();
    let mut state = DirectoryState::new(Scope::All);
    state.set_query("beta");
    state.begin_index_fetch();
    state.finish_index_fetch(Ok(index));

    let view = state.view(&page);
    assert_eq!(view.total_matches, 100);
    assert_eq!(view.total_pages, 1);

    state.set_query("no-such-model");
    assert_eq!(state.view(&page).empty, Some(EmptyState::NoMatches));
}

#[test]
fn provider_change_refetches_index() {
    let mut state = DirectoryState::new(Scope::All);
    state.set_query("gpt");
    state.begin_index_fetch();
    state.finish_index_fetch(Ok(fixture()));
    assert!(state.index_request().is_none());

    state.set_provider(Selection::from("openai"));
    let req = state.index_request().expect("provider change should refetch");
    assert_eq!(req.path(), "/api/models?provider=openai");

    // Latest result wins.
    state.begin_index_fetch();
    state.finish_index_fetch(Ok(vec![make_model("gpt-5", "openai", Mode::Chat, None)]));
    let empty: Vec<ProcessedModel> = Vec::new();
    let view = state.view(&empty);
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].id, "gpt-5");
}
