//! Headless `list` and `show` commands.

use console::style;
use miette::Result;

use pokedex::config::AppConfig;
use pokedex::core::api::{sprite_or_placeholder, CatalogSource, PokeApiClient};
use pokedex::core::catalog::{capitalize, Entry, EntryDetail};
use pokedex::core::loader::{load_catalog, LoadError, LoaderOptions};
use pokedex::core::logging::{self, AppError, EntryNotFound, IndexUnreachable};
use pokedex::core::pipeline::{
    derive_page, page_window, CategoryFilter, Filters, GenerationFilter, PageView, ViewMode,
    ViewState,
};
use pokedex::tui::views::detail::stat_bar;
use pokedex::tui::widgets::badges::generation_label;

const STAT_BAR_WIDTH: usize = 30;

pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub generation: Option<u8>,
    pub page: usize,
}

impl ListQuery {
    fn view_state(&self) -> ViewState {
        ViewState {
            filters: Filters {
                text: self.search.clone().unwrap_or_default(),
                category: match &self.category {
                    Some(tag) => CategoryFilter::Tag(tag.to_lowercase()),
                    None => CategoryFilter::All,
                },
                generation: match self.generation {
                    Some(band) => GenerationFilter::Band(band),
                    None => GenerationFilter::All,
                },
            },
            page: self.page.max(1),
            view_mode: ViewMode::List,
        }
    }
}

fn client(config: &AppConfig) -> Result<PokeApiClient> {
    PokeApiClient::new(&config.api).map_err(|e| {
        AppError::new(format!("Failed to build the HTTP client: {e}"))
            .with_help("Check the [api] section of the config file")
            .into()
    })
}

pub async fn list(config: &AppConfig, query: &ListQuery) -> Result<()> {
    let client = client(config)?;
    let options = LoaderOptions::from(&config.api);

    let pb = logging::catalog_progress_bar();
    let result = load_catalog(&client, &options, |progress| {
        pb.set_position(u64::from(progress.percent));
        pb.set_message(format!(
            "batch {}/{}, {} entries",
            progress.batches_done, progress.batches_total, progress.loaded
        ));
    })
    .await;
    pb.finish_and_clear();

    let report = result.map_err(|LoadError::Index(e)| IndexUnreachable {
        base_url: client.base_url().to_string(),
        reason: e.to_string(),
    })?;
    logging::print_success(&format!("Loaded {} entries", report.entries.len()));

    let state = query.view_state();
    let page = derive_page(&report.entries, &state, config.tui.page_size);
    if query.page > page.total_pages {
        logging::print_warning(&format!(
            "Page {} is past the end, showing page {}",
            query.page, page.page
        ));
    }

    for line in render_page(&page) {
        println!("{line}");
    }
    Ok(())
}

fn render_page(page: &PageView<'_>) -> Vec<String> {
    let mut lines = Vec::with_capacity(page.items.len() + 3);
    lines.push(format!(
        "Showing {} of {} entries",
        page.items.len(),
        page.total_matches
    ));
    if page.items.is_empty() {
        lines.push("No entries match the current filters".to_string());
    }
    lines.extend(page.items.iter().map(|e| entry_row(e)));
    if page.total_pages > 1 {
        lines.push(pager(page.page, page.total_pages));
    }
    lines
}

fn entry_row(entry: &Entry) -> String {
    let types: Vec<String> = entry.types.iter().map(|t| capitalize(t)).collect();
    format!(
        "{}  {:<14} {:<18} {}",
        style(entry.number()).dim(),
        entry.display_name(),
        types.join(" / "),
        generation_label(entry.id)
    )
}

fn pager(current: usize, total: usize) -> String {
    let buttons: Vec<String> = page_window(current, total)
        .into_iter()
        .map(|p| {
            if p == current {
                format!("[{p}]")
            } else {
                p.to_string()
            }
        })
        .collect();
    format!("Page {current} of {total}: {}", buttons.join(" "))
}

pub async fn show(config: &AppConfig, id: u32) -> Result<()> {
    let client = client(config)?;

    let spinner = logging::spinner(&format!("Fetching #{id:03}"));
    let result = client.fetch_detail(id).await;
    spinner.finish_and_clear();

    let detail = result.map_err(|e| {
        log::warn!("Detail fetch for {id} failed: {e}");
        EntryNotFound::new(id, config.api.universe_size, e.to_string())
    })?;

    for line in render_detail(&detail) {
        println!("{line}");
    }
    Ok(())
}

fn render_detail(detail: &EntryDetail) -> Vec<String> {
    let entry = &detail.entry;
    let types: Vec<String> = entry.types.iter().map(|t| capitalize(t)).collect();

    let mut lines = vec![
        format!(
            "{} {}",
            style(entry.number()).dim(),
            style(entry.display_name()).bold()
        ),
        format!("Types:       {}", types.join(" / ")),
        format!("Generation:  {}", generation_label(entry.id)),
        format!("Height:      {}", entry.height_label()),
        format!("Weight:      {}", entry.weight_label()),
        format!("Image:       {}", sprite_or_placeholder(entry)),
        format!("Abilities:   {}", detail.abilities.join(", ")),
        String::new(),
        detail.description.clone(),
        String::new(),
    ];
    for stat in &detail.stats {
        lines.push(format!(
            "{:<16} {:>3} {}",
            stat.name,
            stat.value,
            stat_bar(stat.value, STAT_BAR_WIDTH)
        ));
    }
    lines.push(format!("{:<16} {:>3}", "total", detail.stat_total()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32) -> Entry {
        Entry {
            id,
            name: format!("mon{id}"),
            types: vec!["fire".into()],
            sprite: None,
            height: 7,
            weight: 69,
        }
    }

    #[test]
    fn test_query_builds_filters() {
        let query = ListQuery {
            search: Some("char".into()),
            category: Some("Fire".into()),
            generation: Some(1),
            page: 0,
        };
        let state = query.view_state();
        assert_eq!(state.filters.text, "char");
        assert_eq!(state.filters.category, CategoryFilter::Tag("fire".into()));
        assert_eq!(state.filters.generation, GenerationFilter::Band(1));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_render_page_status_and_pager() {
        let entries: Vec<Entry> = (1..=30).map(entry).collect();
        let state = ViewState::default();
        let page = derive_page(&entries, &state, 24);
        let lines = render_page(&page);
        assert_eq!(lines[0], "Showing 24 of 30 entries");
        assert_eq!(lines.last().map(String::as_str), Some("Page 1 of 2: [1] 2"));
    }

    #[test]
    fn test_render_page_single_page_has_no_pager() {
        let entries: Vec<Entry> = (1..=3).map(entry).collect();
        let page = derive_page(&entries, &ViewState::default(), 24);
        let lines = render_page(&page);
        assert_eq!(lines.len(), 4);
        assert!(!lines.iter().any(|l| l.starts_with("Page ")));
    }

    #[test]
    fn test_render_page_empty() {
        let page = derive_page(&[], &ViewState::default(), 24);
        let lines = render_page(&page);
        assert_eq!(lines[0], "Showing 0 of 0 entries");
        assert_eq!(lines[1], "No entries match the current filters");
    }

    #[test]
    fn test_render_detail_uses_placeholder_and_total() {
        let detail = EntryDetail {
            entry: entry(4),
            stats: vec![],
            abilities: vec!["blaze".into()],
            description: "Flame on its tail.".into(),
        };
        let lines = render_detail(&detail);
        assert!(lines.iter().any(|l| l.contains(pokedex::core::api::PLACEHOLDER_SPRITE)));
        assert!(lines.iter().any(|l| l == "Abilities:   blaze"));
        assert!(lines.last().is_some_and(|l| l.ends_with("  0")));
    }
}
