use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use model_directory_core::calculator::{self, CalculationInput};
use model_directory_core::catalog;
use model_directory_core::directory::{DirectoryState, Scope, Selection, SortKey};
use model_directory_core::model::{self, ModelData, ProcessedModel};
use model_directory_core::provider;
use model_directory_core::route;
use model_directory_core::snippet;
use model_directory_core::suggest::{self, SearchBox, SearchEvent};

/// Models flatten their data, which serde emits as a map; plain JS objects
/// are what the page reads, never ES2015 `Map`s.
fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    value
        .serialize(&Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

fn models_from(value: JsValue) -> Option<Vec<ProcessedModel>> {
    serde_wasm_bindgen::from_value(value).ok()
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The models bundled with the crate, or null if they fail to parse.
#[wasm_bindgen]
pub fn load_bundled_models() -> JsValue {
    match catalog::load_bundled_models() {
        Ok(models) => to_js(&models),
        Err(_) => JsValue::NULL,
    }
}

/// Process a LiteLLM pricing JSON document into models.
#[wasm_bindgen]
pub fn parse_dataset(json: &str) -> JsValue {
    let value: serde_json::Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(_) => return JsValue::NULL,
    };
    match catalog::parse_dataset(&value) {
        Ok(models) => to_js(&models),
        Err(_) => JsValue::NULL,
    }
}

#[wasm_bindgen]
pub fn provider_summaries(models: JsValue) -> JsValue {
    match models_from(models) {
        Some(models) => to_js(&provider::provider_summaries(&models)),
        None => JsValue::NULL,
    }
}

// ---------------------------------------------------------------------------
// Pricing calculator
// ---------------------------------------------------------------------------

/// `{ breakdown, totalCost }` for a model's data and the entered quantities.
/// Missing, negative or non-numeric quantities count as 0; null `inputs`
/// takes the form defaults.
#[wasm_bindgen]
pub fn calculate_cost(data: JsValue, inputs: JsValue) -> JsValue {
    let data: ModelData = match serde_wasm_bindgen::from_value(data) {
        Ok(d) => d,
        Err(_) => return JsValue::NULL,
    };
    let inputs: CalculationInput = if inputs.is_undefined() || inputs.is_null() {
        CalculationInput::default()
    } else {
        match serde_wasm_bindgen::from_value(inputs) {
            Ok(i) => i,
            Err(_) => return JsValue::NULL,
        }
    };
    to_js(&calculator::calculate_cost(&data, &inputs))
}

/// Quantity fields the calculator form shows for this model.
#[wasm_bindgen]
pub fn visible_fields(data: JsValue) -> JsValue {
    match serde_wasm_bindgen::from_value::<ModelData>(data) {
        Ok(d) => to_js(&calculator::visible_fields(&d)),
        Err(_) => JsValue::NULL,
    }
}

/// Coerce a form field's text into a quantity.
#[wasm_bindgen]
pub fn parse_quantity(raw: &str) -> f64 {
    calculator::parse_quantity(raw) as f64
}

// ---------------------------------------------------------------------------
// Directory table
// ---------------------------------------------------------------------------

/// Table state over the server-rendered page of models.
#[wasm_bindgen]
pub struct Directory {
    page_models: Vec<ProcessedModel>,
    state: DirectoryState,
}

#[wasm_bindgen]
impl Directory {
    /// `scope` is "all" to search the full index once a filter is set.
    #[wasm_bindgen(constructor)]
    pub fn new(page_models: JsValue, scope: &str) -> Result<Directory, JsValue> {
        let page_models =
            models_from(page_models).ok_or_else(|| JsValue::from_str("invalid models"))?;
        let scope = if scope == "all" { Scope::All } else { Scope::Page };
        Ok(Directory {
            page_models,
            state: DirectoryState::new(scope),
        })
    }

    pub fn set_query(&mut self, query: &str) {
        self.state.set_query(query);
    }

    /// "all" or empty clears the filter.
    pub fn set_provider(&mut self, provider: &str) {
        self.state.set_provider(Selection::from(provider));
    }

    pub fn set_mode(&mut self, mode: &str) {
        self.state.set_mode(Selection::from(mode));
    }

    pub fn toggle_sort(&mut self, key: &str) {
        if let Ok(key) = key.parse::<SortKey>() {
            self.state.toggle_sort(key);
        }
    }

    pub fn go_to_page(&mut self, page: usize) {
        let total = self.state.view(&self.page_models).total_pages;
        self.state.go_to_page(page, total);
    }

    pub fn next_page(&mut self) {
        let total = self.state.view(&self.page_models).total_pages;
        self.state.next_page(total);
    }

    pub fn prev_page(&mut self) {
        let total = self.state.view(&self.page_models).total_pages;
        self.state.prev_page(total);
    }

    /// Path of the full-index fetch to start, if one is due. Marks it loading.
    pub fn begin_index_fetch(&mut self) -> Option<String> {
        self.state.begin_index_fetch().map(|req| req.path())
    }

    pub fn finish_index_fetch(&mut self, models: JsValue) {
        let result = models_from(models).ok_or_else(|| "malformed model index".to_string());
        self.state.finish_index_fetch(result);
    }

    pub fn fail_index_fetch(&mut self, message: &str) {
        self.state.finish_index_fetch(Err(message.to_string()));
    }

    /// `{ rows, totalMatches, page, totalPages, paginated, empty }`.
    pub fn view(&self) -> JsValue {
        to_js(&self.state.view(&self.page_models))
    }
}

// ---------------------------------------------------------------------------
// Search suggestions
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub fn suggest(models: JsValue, query: &str) -> JsValue {
    match models_from(models) {
        Some(models) => to_js(&suggest::suggest(&models, query)),
        None => JsValue::NULL,
    }
}

/// Search input with its dropdown. Every event returns the page action:
/// `{ action: "none" | "search" | "fill_search" | "navigate", value? }`.
#[wasm_bindgen]
pub struct Search {
    models: Vec<ProcessedModel>,
    search: SearchBox,
}

#[wasm_bindgen]
impl Search {
    #[wasm_bindgen(constructor)]
    pub fn new(models: JsValue) -> Result<Search, JsValue> {
        let models = models_from(models).ok_or_else(|| JsValue::from_str("invalid models"))?;
        Ok(Search {
            models,
            search: SearchBox::new(),
        })
    }

    pub fn input(&mut self, query: &str) -> JsValue {
        self.handle(SearchEvent::Input(query.to_string()))
    }

    pub fn arrow_up(&mut self) -> JsValue {
        self.handle(SearchEvent::ArrowUp)
    }

    pub fn arrow_down(&mut self) -> JsValue {
        self.handle(SearchEvent::ArrowDown)
    }

    pub fn enter(&mut self) -> JsValue {
        self.handle(SearchEvent::Enter)
    }

    pub fn escape(&mut self) -> JsValue {
        self.handle(SearchEvent::Escape)
    }

    pub fn blur(&mut self) -> JsValue {
        self.handle(SearchEvent::Blur)
    }

    pub fn pick(&mut self, index: usize) -> JsValue {
        self.handle(SearchEvent::Pick(index))
    }

    pub fn query(&self) -> String {
        self.search.query().to_string()
    }

    /// Rows of the open dropdown, empty when closed.
    pub fn suggestions(&self) -> JsValue {
        to_js(self.search.visible_suggestions())
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.search.highlighted()
    }
}

impl Search {
    fn handle(&mut self, event: SearchEvent) -> JsValue {
        to_js(&self.search.handle(event, &self.models))
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub fn model_route(provider: &str, slug: &str) -> String {
    route::model_route(provider, slug)
}

#[wasm_bindgen]
pub fn compare_route(provider: &str, slug: &str) -> String {
    route::compare_route(provider, slug)
}

/// `[provider, slug]` for a model detail path, or null.
#[wasm_bindgen]
pub fn parse_model_route(path: &str) -> JsValue {
    match route::parse_model_route(path) {
        Some(parts) => to_js(&parts),
        None => JsValue::NULL,
    }
}

#[wasm_bindgen]
pub fn slugify(name: &str) -> String {
    model::slugify(name)
}

// ---------------------------------------------------------------------------
// Snippets
// ---------------------------------------------------------------------------

/// Snippet calling the model through the gateway; null for an unknown language.
#[wasm_bindgen]
pub fn generate_snippet(model: JsValue, lang: &str) -> JsValue {
    let l = match lang.parse::<snippet::Lang>() {
        Ok(l) => l,
        Err(_) => return JsValue::NULL,
    };
    match serde_wasm_bindgen::from_value::<ProcessedModel>(model) {
        Ok(m) => JsValue::from_str(&snippet::generate(&m, l)),
        Err(_) => JsValue::NULL,
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Dollar amount: "$0", "$12.50", "$0.0025".
#[wasm_bindgen]
pub fn fmt_cost(v: f64) -> String {
    model::fmt_cost(v)
}

/// Per-token price as "$2.50 / 1M".
#[wasm_bindgen]
pub fn fmt_per_million(cost_per_token: f64) -> String {
    model::fmt_per_million(cost_per_token)
}

/// Token limit as "128K". Takes f64 to avoid BigInt on the JS side.
#[wasm_bindgen]
pub fn fmt_tokens(n: f64) -> String {
    model::fmt_tokens(calculator::coerce_quantity(n))
}
