use clap::{Parser, Subcommand};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::{Key, Style, Term};
use model_directory_core::{
    api::CatalogClient,
    calculator::InputField,
    catalog,
    directory::{DirectoryState, EmptyState, Scope, Selection, SortDirection, SortKey, SortState},
    model::{fmt_cost, fmt_per_million, fmt_tokens, ProcessedModel},
    provider::{self, ProviderKind},
    route,
    snippet::{self, Lang},
    suggest::{SearchAction, SearchBox, SearchEvent, SearchPhase, Suggestion},
    CalculationInput, CatalogError,
};
use tracing_subscriber::EnvFilter;

// ── Palette ──────────────────────────────────────────────────────────

fn s_header() -> Style { Style::new().color256(252).bold() }  // bright gray, bold
fn s_dim() -> Style    { Style::new().color256(248) }         // light gray
fn s_tree() -> Style   { Style::new().color256(245) }         // mid gray
fn s_hint() -> Style   { Style::new().color256(243) }         // soft gray
fn s_hot() -> Style    { Style::new().color256(114) }         // green
fn s_warm() -> Style   { Style::new().color256(214) }         // amber
fn s_err() -> Style    { Style::new().color256(167) }         // red
fn s_price() -> Style  { Style::new().color256(109) }         // teal
fn s_bold() -> Style   { Style::new().bold() }
fn s_label() -> Style  { Style::new().color256(146) }         // muted lavender
fn s_param() -> Style  { Style::new().color256(139) }         // mauve

fn sep(width: usize) -> String {
    s_tree().apply_to("\u{2500}".repeat(width)).to_string()
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::AnsiValue(243))
}

// ── CLI Args ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "model-directory",
    about = "Browse LLM gateway models, compare prices, estimate usage cost",
    version,
    after_help = "examples:\n  \
        model-directory search claude --sort input\n  \
        model-directory search --provider openai --mode embedding\n  \
        model-directory search gpt --all        (filter the full index from --api)\n  \
        model-directory cost gpt-4o --input-tokens 20000\n  \
        model-directory show mistral-ocr-latest\n  \
        model-directory snippet whisper-1 --lang curl\n  \
        model-directory                         (interactive search)"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Site base URL serving `/api/models`.
    #[arg(long, global = true, env = "MODEL_DIRECTORY_API", default_value = "http://localhost:3000")]
    api: String,

    #[arg(long, short, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter, sort and page through the model table.
    Search {
        query: Option<String>,
        #[arg(long, short)]
        provider: Option<String>,
        #[arg(long, short)]
        mode: Option<String>,
        /// name, provider, input (or price), output
        #[arg(long, short, default_value = "name")]
        sort: SortKey,
        #[arg(long)]
        desc: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Search the full index instead of the local page.
        #[arg(long)]
        all: bool,
    },
    /// Suggestions for a partial query.
    Suggest { query: String },
    /// Interactive search box with suggestions.
    Browse,
    /// Estimate the cost of one request.
    Cost {
        model: String,
        #[arg(long, allow_hyphen_values = true)]
        input_tokens: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        output_tokens: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        images: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        seconds: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        pages: Option<String>,
    },
    /// Pricing, limits and capabilities of one model.
    Show { model: String },
    /// Code snippet calling a model through the gateway.
    Snippet {
        model: String,
        #[arg(long, short, default_value = "python")]
        lang: Lang,
    },
    /// Providers and their model counts.
    Providers,
    /// Update the pricing dataset from upstream
    Sync,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MODEL_DIRECTORY_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search {
            ref query,
            ref provider,
            ref mode,
            sort,
            desc,
            page,
            all,
        }) => {
            let mut state = DirectoryState::new(if all { Scope::All } else { Scope::Page });
            state.set_query(query.clone().unwrap_or_default());
            state.set_provider(Selection::from(provider.clone().unwrap_or_default()));
            state.set_mode(Selection::from(mode.clone().unwrap_or_default()));
            state.sort = SortState {
                key: sort,
                direction: if desc { SortDirection::Desc } else { SortDirection::Asc },
            };
            cmd_search(&cli, state, page).await?;
        }
        Some(Commands::Suggest { ref query }) => cmd_suggest(query, cli.json)?,
        Some(Commands::Browse) => cmd_browse(&cli).await?,
        Some(Commands::Cost {
            ref model,
            ref input_tokens,
            ref output_tokens,
            ref images,
            ref seconds,
            ref pages,
        }) => {
            let mut inputs = CalculationInput::default();
            for (field, raw) in [
                (InputField::InputTokens, input_tokens),
                (InputField::OutputTokens, output_tokens),
                (InputField::Images, images),
                (InputField::Seconds, seconds),
                (InputField::Pages, pages),
            ] {
                if let Some(raw) = raw {
                    inputs.set_raw(field, raw);
                }
            }
            cmd_cost(model, &inputs, cli.json)?;
        }
        Some(Commands::Show { ref model }) => cmd_show(model, cli.json)?,
        Some(Commands::Snippet { ref model, lang }) => cmd_snippet(model, lang)?,
        Some(Commands::Providers) => cmd_providers(cli.json)?,
        Some(Commands::Sync) => cmd_sync().await?,
        None => {
            if Term::stderr().is_term() {
                cmd_browse(&cli).await?;
            } else {
                cmd_search(&cli, DirectoryState::new(Scope::Page), 1).await?;
            }
        }
    }
    Ok(())
}

fn load_models() -> anyhow::Result<Vec<ProcessedModel>> {
    Ok(catalog::load_models_cached()?)
}

fn resolve<'a>(models: &'a [ProcessedModel], input: &str) -> anyhow::Result<&'a ProcessedModel> {
    Ok(catalog::find_model(models, input)
        .ok_or_else(|| CatalogError::ModelNotFound(input.to_string()))?)
}

// ── Search ───────────────────────────────────────────────────────────

async fn cmd_search(cli: &Cli, mut state: DirectoryState, page: usize) -> anyhow::Result<()> {
    let models = load_models()?;

    if let Some(req) = state.begin_index_fetch() {
        let term = Term::stderr();
        term.write_line(&format!("{}", s_dim().apply_to("loading full index...")))?;
        let result = match CatalogClient::new(&cli.api) {
            Ok(client) => client.fetch_index(&req).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        term.clear_last_lines(1)?;
        state.finish_index_fetch(result);
    }

    let total = state.view(&models).total_pages;
    state.go_to_page(page, total);
    let view = state.view(&models);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if let Some(empty) = &view.empty {
        match empty {
            EmptyState::NoMatches => {
                eprintln!("{}", s_err().apply_to("no models match these filters"));
            }
            EmptyState::Loading => eprintln!("{}", s_dim().apply_to("loading...")),
            EmptyState::IndexFailed(msg) => {
                eprintln!("{}", s_err().apply_to(format!("error: could not load model index: {msg}")));
            }
        }
        return Ok(());
    }

    println!();
    print_model_table(&view.rows);
    println!("{}", sep(72));
    let pager = if view.paginated {
        format!("   page {}/{}", view.page, view.total_pages)
    } else {
        String::new()
    };
    println!(
        "{}",
        s_hint().apply_to(format!(
            "  {} models{pager}   model-directory show <model> for details",
            view.total_matches
        ))
    );
    println!();
    Ok(())
}

fn print_model_table(rows: &[&ProcessedModel]) {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        header_cell("  Model"),
        header_cell("Provider"),
        header_cell("Mode"),
        header_cell("Input"),
        header_cell("Output"),
        header_cell("Context"),
    ]);
    for m in rows {
        table.add_row(vec![
            Cell::new(format!("  {}", m.display_name)).fg(Color::AnsiValue(252)),
            Cell::new(m.provider_name()).fg(Color::AnsiValue(248)),
            Cell::new(m.mode().label()).fg(Color::AnsiValue(146)),
            price_cell(m.data.input_cost_per_token),
            price_cell(m.data.output_cost_per_token),
            Cell::new(m.data.context_window().map(fmt_tokens).unwrap_or_default())
                .fg(Color::AnsiValue(139)),
        ]);
    }
    println!("{table}");
}

fn price_cell(per_token: Option<f64>) -> Cell {
    match per_token {
        Some(p) => Cell::new(fmt_per_million(p)).fg(Color::AnsiValue(109)),
        None => Cell::new("\u{2013}").fg(Color::AnsiValue(243)),
    }
}

// ── Suggestions ──────────────────────────────────────────────────────

fn cmd_suggest(query: &str, json: bool) -> anyhow::Result<()> {
    let models = load_models()?;
    let suggestions = model_directory_core::suggest(&models, query);

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }
    if suggestions.is_empty() {
        eprintln!("{}", s_err().apply_to(format!("no suggestions for '{query}'")));
        return Ok(());
    }
    println!();
    for s in &suggestions {
        println!("  {}", suggestion_line(s, false));
    }
    println!();
    Ok(())
}

fn suggestion_line(s: &Suggestion, highlighted: bool) -> String {
    let marker = if highlighted {
        s_hot().apply_to("\u{25b8}").to_string()
    } else {
        " ".to_string()
    };
    match s {
        Suggestion::Model { label, subtitle, .. } => format!(
            "{marker} {:<40} {}",
            s_bold().apply_to(label),
            s_dim().apply_to(subtitle.as_deref().unwrap_or(""))
        ),
        Suggestion::Provider { label, .. } => {
            format!("{marker} {:<40} {}", s_label().apply_to(label), s_hint().apply_to("provider"))
        }
        Suggestion::Mode { label, .. } => {
            format!("{marker} {:<40} {}", s_param().apply_to(label), s_hint().apply_to("mode"))
        }
    }
}

// ── Browse ───────────────────────────────────────────────────────────

async fn cmd_browse(cli: &Cli) -> anyhow::Result<()> {
    let models = load_models()?;
    let term = Term::stderr();
    let mut search = SearchBox::new();
    let mut drawn: usize = 0;

    let outcome = loop {
        let mut lines = vec![format!(
            "{} {}{}",
            s_label().apply_to("search:"),
            search.query(),
            s_hint().apply_to("\u{2581}")
        )];
        let highlighted = search.highlighted();
        for (i, s) in search.visible_suggestions().iter().enumerate() {
            lines.push(suggestion_line(s, highlighted == Some(i)));
        }
        lines.push(
            s_hint()
                .apply_to("  \u{2191}\u{2193} select   enter open   esc quit")
                .to_string(),
        );

        if drawn > 0 {
            term.clear_last_lines(drawn)?;
        }
        for line in &lines {
            term.write_line(line)?;
        }
        drawn = lines.len();

        let key = {
            let t = Term::stderr();
            tokio::task::spawn_blocking(move || t.read_key()).await?
        }?;

        let event = match key {
            Key::Char(c) if !c.is_control() => {
                let mut q = search.query().to_string();
                q.push(c);
                SearchEvent::Input(q)
            }
            Key::Backspace => {
                let mut q = search.query().to_string();
                q.pop();
                SearchEvent::Input(q)
            }
            Key::ArrowUp => SearchEvent::ArrowUp,
            Key::ArrowDown | Key::Tab => SearchEvent::ArrowDown,
            Key::Enter => SearchEvent::Enter,
            Key::Escape | Key::Char('\u{3}') => SearchEvent::Escape,
            _ => continue,
        };
        let quit = event == SearchEvent::Escape;

        match search.handle(event, &models) {
            SearchAction::Navigate(route) => break Some(Outcome::Open(route)),
            // Reopen the dropdown on the filled value.
            SearchAction::FillSearch(value) => {
                search.handle(SearchEvent::Input(value), &models);
            }
            SearchAction::Search(q) if *search.phase() == SearchPhase::Dismissed => {
                break Some(Outcome::Search(q));
            }
            _ => {}
        }
        if quit {
            break None;
        }
    };

    term.clear_last_lines(drawn)?;
    match outcome {
        Some(Outcome::Open(path)) => {
            let model = route::parse_model_route(&path).and_then(|(provider, slug)| {
                models.iter().find(|m| m.provider == provider && m.slug == slug)
            });
            match model {
                Some(m) => print_model_detail(m),
                None => eprintln!("{}", s_err().apply_to(format!("error: no model at {path}"))),
            }
        }
        Some(Outcome::Search(q)) => {
            let mut state = DirectoryState::new(Scope::Page);
            state.set_query(q);
            cmd_search(cli, state, 1).await?;
        }
        None => {}
    }
    Ok(())
}

enum Outcome {
    Open(String),
    Search(String),
}

// ── Cost ─────────────────────────────────────────────────────────────

fn cmd_cost(query: &str, inputs: &CalculationInput, json: bool) -> anyhow::Result<()> {
    let models = load_models()?;
    let model = resolve(&models, query)?;
    let result = model_directory_core::calculate_cost(&model.data, inputs);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!(
        "  {}  {}",
        s_bold().apply_to(model.gateway_name()),
        s_label().apply_to(model.mode().label())
    );
    println!("{}", sep(48));

    let fields = model_directory_core::visible_fields(&model.data);
    if fields.is_empty() {
        println!("  {}", s_warm().apply_to("no pricing data for this model"));
        println!();
        return Ok(());
    }
    for f in &fields {
        println!(
            "  {:<16} {}",
            s_dim().apply_to(f.label()),
            s_param().apply_to(inputs.get(*f))
        );
    }
    println!("{}", sep(48));

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    for (component, amount) in result.breakdown.lines() {
        table.add_row(vec![
            Cell::new(format!("  {}", component.label())).fg(Color::AnsiValue(248)),
            Cell::new(fmt_cost(amount)).fg(Color::AnsiValue(109)),
        ]);
    }
    table.add_row(vec![
        Cell::new("  total").fg(Color::AnsiValue(252)),
        Cell::new(fmt_cost(result.total_cost)).fg(Color::AnsiValue(114)),
    ]);
    println!("{table}");
    println!();
    Ok(())
}

// ── Show ─────────────────────────────────────────────────────────────

fn cmd_show(query: &str, json: bool) -> anyhow::Result<()> {
    let models = load_models()?;
    let model = resolve(&models, query)?;
    if json {
        println!("{}", serde_json::to_string_pretty(model)?);
        return Ok(());
    }
    print_model_detail(model);
    Ok(())
}

fn print_model_detail(m: &ProcessedModel) {
    let d = &m.data;
    println!();
    println!(
        "{}  {}",
        s_header().apply_to(&m.display_name),
        s_dim().apply_to(format!("{} \u{2022} {}", m.provider_name(), m.mode().label()))
    );
    println!("{}", sep(64));

    let mut prices: Vec<(&str, String)> = Vec::new();
    if let Some(p) = d.input_cost_per_token {
        prices.push(("input", fmt_per_million(p)));
    }
    if let Some(p) = d.output_cost_per_token {
        prices.push(("output", fmt_per_million(p)));
    }
    if let Some(p) = d.input_cost_per_image {
        prices.push(("input image", format!("{} / image", fmt_cost(p))));
    }
    if let Some(p) = d.output_cost_per_image {
        prices.push(("image", format!("{} / image", fmt_cost(p))));
    }
    if let Some(p) = d.input_cost_per_second {
        prices.push(("input audio", format!("{} / sec", fmt_cost(p))));
    }
    if let Some(p) = d.output_cost_per_second {
        prices.push(("output", format!("{} / sec", fmt_cost(p))));
    }
    if let Some(p) = d.ocr_cost_per_page {
        prices.push(("ocr", format!("{} / page", fmt_cost(p))));
    }
    if prices.is_empty() {
        println!("  {}", s_warm().apply_to("no pricing data"));
    }
    for (label, value) in prices {
        println!("  {:<14} {}", s_dim().apply_to(label), s_price().apply_to(value));
    }

    let limits = [
        ("context", d.context_window()),
        ("max output", d.max_output_tokens),
        ("max query", d.max_query_tokens),
    ];
    for (label, v) in limits {
        if let Some(n) = v {
            println!("  {:<14} {}", s_dim().apply_to(label), s_param().apply_to(fmt_tokens(n)));
        }
    }

    let caps = d.capabilities();
    if !caps.is_empty() {
        println!("  {:<14} {}", s_dim().apply_to("supports"), s_hot().apply_to(caps.join(", ")));
    }

    println!("{}", sep(64));
    println!("  {:<14} {}", s_dim().apply_to("gateway name"), s_bold().apply_to(m.gateway_name()));
    println!("  {:<14} {}", s_dim().apply_to("page"), s_hint().apply_to(m.route()));
    println!(
        "  {:<14} {}",
        s_dim().apply_to("compare"),
        s_hint().apply_to(route::compare_route(&m.provider, &m.slug))
    );
    println!();
}

// ── Snippet ──────────────────────────────────────────────────────────

fn cmd_snippet(query: &str, lang: Lang) -> anyhow::Result<()> {
    let models = load_models()?;
    let model = resolve(&models, query)?;
    println!(
        "{}",
        s_dim().apply_to(format!("# {} via {}", model.gateway_name(), snippet::GATEWAY_BASE_URL))
    );
    println!();
    println!("{}", snippet::generate(model, lang));
    Ok(())
}

// ── Providers ────────────────────────────────────────────────────────

fn cmd_providers(json: bool) -> anyhow::Result<()> {
    let models = load_models()?;
    let summaries = provider::provider_summaries(&models);
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!();
    println!("{}", s_header().apply_to("providers"));
    println!("{}", sep(64));
    for s in &summaries {
        let kind = match provider::lookup(&s.id).map(|p| &p.kind) {
            Some(ProviderKind::FirstParty) => s_dim().apply_to("first party"),
            Some(ProviderKind::Cloud) => s_warm().apply_to("cloud"),
            Some(ProviderKind::OpenWeights) => s_label().apply_to("open weights"),
            None => s_hint().apply_to(""),
        };
        println!(
            "  {:<24} {:<18} {:<14} {}",
            s_bold().apply_to(&s.id),
            s_dim().apply_to(&s.display_name),
            kind,
            s_param().apply_to(format!("{} models", s.model_count))
        );
    }
    println!("{}", sep(64));
    println!(
        "{}",
        s_hint().apply_to(format!(
            "  {} providers   model-directory search --provider <id>",
            summaries.len()
        ))
    );
    println!();
    Ok(())
}

// ── Sync ─────────────────────────────────────────────────────────────

async fn cmd_sync() -> anyhow::Result<()> {
    let term = Term::stderr();
    term.write_line(&format!("{}", s_dim().apply_to("downloading latest pricing data...")))?;

    let result = model_directory_core::sync::sync_dataset().await?;

    term.clear_last_lines(1)?;
    println!();
    println!("  {}", s_hot().apply_to("synced"));
    println!(
        "  {}",
        s_dim().apply_to(format!(
            "{}: {} models from {} providers",
            model_directory_core::sync::DATASET_FILE,
            result.model_count,
            result.provider_count
        ))
    );
    if let Some(dir) = model_directory_core::cache::cache_dir() {
        println!("  {}", s_hint().apply_to(format!("cached in {}", dir.display())));
    }
    println!();
    Ok(())
}
