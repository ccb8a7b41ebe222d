//! Filter / paginate pipeline.
//!
//! Everything here is a pure function of the collection and a [`ViewState`].
//! The TUI recomputes [`derive_page`] after every state change instead of
//! caching a filtered copy.

use std::collections::BTreeSet;

use crate::core::catalog::{generation_by_id, Entry, GENERATIONS};

/// Maximum number of page buttons in the pager.
pub const PAGE_WINDOW: usize = 7;

// ── Filters ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Tag(String),
}

impl CategoryFilter {
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All types",
            Self::Tag(tag) => tag,
        }
    }

    /// Next filter in `All, categories[0], categories[1], ..., All`.
    pub fn next_in(&self, categories: &[String]) -> Self {
        let position = self.position_in(categories);
        match position {
            None => categories
                .first()
                .map(|t| Self::Tag(t.clone()))
                .unwrap_or(Self::All),
            Some(i) if i + 1 < categories.len() => Self::Tag(categories[i + 1].clone()),
            Some(_) => Self::All,
        }
    }

    pub fn prev_in(&self, categories: &[String]) -> Self {
        match self.position_in(categories) {
            None => categories
                .last()
                .map(|t| Self::Tag(t.clone()))
                .unwrap_or(Self::All),
            Some(0) => Self::All,
            Some(i) => Self::Tag(categories[i - 1].clone()),
        }
    }

    /// Index of the selected tag, `None` for `All` or a tag no longer present.
    fn position_in(&self, categories: &[String]) -> Option<usize> {
        match self {
            Self::All => None,
            Self::Tag(tag) => categories.iter().position(|c| c == tag),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationFilter {
    #[default]
    All,
    Band(u8),
}

impl GenerationFilter {
    pub fn label(&self) -> String {
        match self {
            Self::All => "All generations".to_string(),
            Self::Band(band) => match generation_by_id(*band) {
                Some(g) => format!("Gen {} {}", g.id, g.region),
                None => format!("Gen {band}"),
            },
        }
    }

    pub fn next(self) -> Self {
        let last = GENERATIONS.len() as u8;
        match self {
            Self::All => Self::Band(1),
            Self::Band(b) if b < last => Self::Band(b + 1),
            Self::Band(_) => Self::All,
        }
    }

    pub fn prev(self) -> Self {
        let last = GENERATIONS.len() as u8;
        match self {
            Self::All => Self::Band(last),
            Self::Band(b) if b > 1 => Self::Band(b - 1),
            Self::Band(_) => Self::All,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub text: String,
    pub category: CategoryFilter,
    pub generation: GenerationFilter,
}

/// Case-insensitive name substring, or substring of the decimal identifier.
pub fn matches_text(entry: &Entry, text: &str) -> bool {
    text.is_empty()
        || entry.name.to_lowercase().contains(&text.to_lowercase())
        || entry.id.to_string().contains(text)
}

pub fn matches_category(entry: &Entry, category: &CategoryFilter) -> bool {
    match category {
        CategoryFilter::All => true,
        CategoryFilter::Tag(tag) => entry.has_type(tag),
    }
}

pub fn matches_generation(entry: &Entry, generation: GenerationFilter) -> bool {
    match generation {
        GenerationFilter::All => true,
        GenerationFilter::Band(band) => entry.generation().is_some_and(|g| g.id == band),
    }
}

impl Filters {
    pub fn matches(&self, entry: &Entry) -> bool {
        matches_text(entry, &self.text)
            && matches_category(entry, &self.category)
            && matches_generation(entry, self.generation)
    }

    pub fn is_active(&self) -> bool {
        *self != Filters::default()
    }
}

pub fn filter_entries<'a>(entries: &'a [Entry], filters: &Filters) -> Vec<&'a Entry> {
    entries.iter().filter(|e| filters.matches(e)).collect()
}

/// Sorted, de-duplicated category tags present in the collection.
pub fn available_categories(entries: &[Entry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|e| e.types.iter().cloned())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

// ── View state ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Grid => "Grid",
            Self::List => "List",
        }
    }
}

/// All mutable catalog view state in one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub filters: Filters,
    /// 1-based current page.
    pub page: usize,
    pub view_mode: ViewMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            filters: Filters::default(),
            page: 1,
            view_mode: ViewMode::default(),
        }
    }
}

/// Inputs that change the catalog view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewChange {
    Search(String),
    Category(CategoryFilter),
    Generation(GenerationFilter),
    /// The loaded collection was replaced.
    CollectionReplaced,
    GoToPage(usize),
    NextPage,
    PrevPage,
    ToggleViewMode,
}

impl ViewState {
    pub fn with_view_mode(view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            ..Self::default()
        }
    }

    /// Apply a change. Filter and collection changes always return to page 1;
    /// page moves are clamped to `1..=total_pages`.
    pub fn apply(mut self, change: ViewChange, total_pages: usize) -> Self {
        let last = total_pages.max(1);
        match change {
            ViewChange::Search(text) => {
                self.filters.text = text;
                self.page = 1;
            }
            ViewChange::Category(category) => {
                self.filters.category = category;
                self.page = 1;
            }
            ViewChange::Generation(generation) => {
                self.filters.generation = generation;
                self.page = 1;
            }
            ViewChange::CollectionReplaced => self.page = 1,
            ViewChange::GoToPage(page) => self.page = page.clamp(1, last),
            ViewChange::NextPage => self.page = (self.page + 1).min(last),
            ViewChange::PrevPage => self.page = self.page.saturating_sub(1).max(1),
            ViewChange::ToggleViewMode => self.view_mode = self.view_mode.toggled(),
        }
        self
    }
}

// ── Pagination ──────────────────────────────────────────────────────────────

/// ceil(count / page_size), at least 1.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// The visible slice plus counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    pub items: Vec<&'a Entry>,
    pub total_matches: usize,
    pub total_pages: usize,
    /// Page actually shown, clamped into range.
    pub page: usize,
}

pub fn derive_page<'a>(entries: &'a [Entry], state: &ViewState, page_size: usize) -> PageView<'a> {
    let page_size = page_size.max(1);
    let matches = filter_entries(entries, &state.filters);
    let total_matches = matches.len();
    let total_pages = total_pages(total_matches, page_size);
    let page = state.page.clamp(1, total_pages);

    let items = matches
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    PageView {
        items,
        total_matches,
        total_pages,
        page,
    }
}

/// Page numbers for the pager, at most [`PAGE_WINDOW`] of them.
pub fn page_window(current: usize, total: usize) -> Vec<usize> {
    let total = total.max(1);
    let start = if total <= PAGE_WINDOW || current <= 4 {
        1
    } else if current >= total - 3 {
        total - (PAGE_WINDOW - 1)
    } else {
        current - 3
    };
    let end = (start + PAGE_WINDOW - 1).min(total);
    (start..=end).collect()
}
