//! Search-as-you-type suggestions for the model directory.

use serde::Serialize;

use crate::model::ProcessedModel;
use crate::provider;

pub const MAX_SUGGESTIONS: usize = 10;
pub const MAX_MODEL_SUGGESTIONS: usize = 8;
pub const MAX_PROVIDER_SUGGESTIONS: usize = 3;
pub const MAX_MODE_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Suggestion {
    /// Opens the model's detail page.
    Model {
        id: String,
        label: String,
        /// "Provider • Mode", only when several variants share the label.
        subtitle: Option<String>,
        route: String,
    },
    /// Fills the search box with the provider id.
    Provider { value: String, label: String },
    /// Fills the search box with the mode name.
    Mode { value: String, label: String },
}

impl Suggestion {
    pub fn label(&self) -> &str {
        match self {
            Suggestion::Model { label, .. }
            | Suggestion::Provider { label, .. }
            | Suggestion::Mode { label, .. } => label,
        }
    }
}

/// Suggestions for `query`: model names, then providers, then modes.
pub fn suggest(models: &[ProcessedModel], query: &str) -> Vec<Suggestion> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut out = model_suggestions(models, &needle);
    out.truncate(MAX_MODEL_SUGGESTIONS);

    let mut providers: Vec<&str> = Vec::new();
    for m in models {
        let hit = m.provider.to_lowercase().contains(&needle)
            || m.provider_name().to_lowercase().contains(&needle);
        if hit && !providers.contains(&m.provider.as_str()) {
            providers.push(&m.provider);
        }
    }
    out.extend(
        providers
            .into_iter()
            .take(MAX_PROVIDER_SUGGESTIONS)
            .map(|p| Suggestion::Provider {
                value: p.to_string(),
                label: provider::display_name(p).to_string(),
            }),
    );

    let mut modes = Vec::new();
    for m in models {
        let mode = m.mode();
        let hit = mode.as_str().contains(&needle) || mode.label().to_lowercase().contains(&needle);
        if hit && !modes.contains(mode) {
            modes.push(mode.clone());
        }
    }
    out.extend(
        modes
            .into_iter()
            .take(MAX_MODE_SUGGESTIONS)
            .map(|m| Suggestion::Mode {
                value: m.as_str().to_string(),
                label: m.label(),
            }),
    );

    out.truncate(MAX_SUGGESTIONS);
    out
}

fn model_suggestions(models: &[ProcessedModel], needle: &str) -> Vec<Suggestion> {
    // Display name -> distinct (provider, mode) variants, in first-seen order.
    let mut groups: Vec<(&str, Vec<&ProcessedModel>)> = Vec::new();
    for m in models
        .iter()
        .filter(|m| m.display_name.to_lowercase().contains(needle))
    {
        match groups.iter_mut().find(|(name, _)| *name == m.display_name) {
            Some((_, variants)) => {
                if !variants
                    .iter()
                    .any(|v| v.provider == m.provider && v.mode() == m.mode())
                {
                    variants.push(m);
                }
            }
            None => groups.push((&m.display_name, vec![m])),
        }
    }

    let mut out = Vec::new();
    for (name, variants) in groups {
        let several = variants.len() > 1;
        for v in variants {
            out.push(Suggestion::Model {
                id: v.id.clone(),
                label: name.to_string(),
                subtitle: several
                    .then(|| format!("{} \u{2022} {}", v.provider_name(), v.mode().label())),
                route: v.route(),
            });
        }
    }
    out
}

/// Where the search box is in its interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    /// Dropdown open, nothing highlighted.
    Typing,
    /// Dropdown open with a keyboard-highlighted row.
    Selecting(usize),
    /// A model suggestion was committed; the page is leaving.
    Navigating(String),
    /// Dropdown closed by escape, blur or a committed search.
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Input(String),
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Blur,
    /// Pointer click on a suggestion row.
    Pick(usize),
}

/// What the surrounding page should do after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum SearchAction {
    None,
    /// Filter the table by this text.
    Search(String),
    /// Replace the search text with this value and filter by it.
    FillSearch(String),
    /// Go to this route.
    Navigate(String),
}

/// Search input with its suggestion dropdown.
#[derive(Debug, Clone)]
pub struct SearchBox {
    query: String,
    suggestions: Vec<Suggestion>,
    phase: SearchPhase,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBox {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            phase: SearchPhase::Idle,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    /// Rows of the open dropdown; empty when it is closed.
    pub fn visible_suggestions(&self) -> &[Suggestion] {
        match self.phase {
            SearchPhase::Typing | SearchPhase::Selecting(_) => &self.suggestions,
            _ => &[],
        }
    }

    pub fn highlighted(&self) -> Option<usize> {
        match self.phase {
            SearchPhase::Selecting(i) => Some(i),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: SearchEvent, models: &[ProcessedModel]) -> SearchAction {
        match event {
            SearchEvent::Input(q) => {
                self.suggestions = suggest(models, &q);
                self.phase = if q.trim().is_empty() {
                    SearchPhase::Idle
                } else {
                    SearchPhase::Typing
                };
                self.query = q;
                SearchAction::Search(self.query.clone())
            }
            SearchEvent::ArrowDown => {
                let len = self.suggestions.len();
                match self.phase {
                    SearchPhase::Typing if len > 0 => self.phase = SearchPhase::Selecting(0),
                    SearchPhase::Selecting(i) => {
                        self.phase = SearchPhase::Selecting((i + 1).min(len.saturating_sub(1)))
                    }
                    _ => {}
                }
                SearchAction::None
            }
            SearchEvent::ArrowUp => {
                match self.phase {
                    SearchPhase::Selecting(0) => self.phase = SearchPhase::Typing,
                    SearchPhase::Selecting(i) => self.phase = SearchPhase::Selecting(i - 1),
                    _ => {}
                }
                SearchAction::None
            }
            SearchEvent::Enter => match self.phase {
                SearchPhase::Selecting(i) => self.commit(i),
                SearchPhase::Typing => {
                    self.phase = SearchPhase::Dismissed;
                    SearchAction::Search(self.query.clone())
                }
                _ => SearchAction::None,
            },
            SearchEvent::Pick(i) => match self.phase {
                SearchPhase::Typing | SearchPhase::Selecting(_) => self.commit(i),
                _ => SearchAction::None,
            },
            SearchEvent::Escape | SearchEvent::Blur => {
                if self.phase != SearchPhase::Idle {
                    self.phase = SearchPhase::Dismissed;
                }
                SearchAction::None
            }
        }
    }

    /// Shared by enter and pointer picks.
    fn commit(&mut self, index: usize) -> SearchAction {
        let Some(chosen) = self.suggestions.get(index).cloned() else {
            return SearchAction::None;
        };
        match chosen {
            Suggestion::Model { route, .. } => {
                self.phase = SearchPhase::Navigating(route.clone());
                SearchAction::Navigate(route)
            }
            Suggestion::Provider { value, .. } | Suggestion::Mode { value, .. } => {
                self.query = value.clone();
                self.phase = SearchPhase::Dismissed;
                SearchAction::FillSearch(value)
            }
        }
    }
}
