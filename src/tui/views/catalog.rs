//! Catalog view: the filtered, paged collection in a grid or a list.
//!
//! Keys (list focus):
//! - `/` search by name or number, `Tab` generation panel
//! - `t`/`T` cycle the type filter, `g`/`G` cycle the generation filter
//! - `n`/`p` (or `]`/`[`, PageDown/PageUp) change page, `Home`/`End` first/last
//! - `v` toggle grid/list, `Enter` open the selected entry

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::core::catalog::{Entry, GENERATIONS};
use crate::core::pipeline::{
    available_categories, derive_page, page_window, CategoryFilter, GenerationFilter, PageView,
    ViewChange, ViewMode, ViewState,
};
use crate::tui::theme;
use crate::tui::widgets::badges::{category_badges, generation_badge};
use crate::tui::widgets::input_buffer::InputBuffer;

/// Cards per grid row.
pub const GRID_COLUMNS: usize = 4;
/// Card height including borders.
const CARD_HEIGHT: u16 = 4;

// ── Focus zones ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FocusZone {
    /// Grid/list: arrows move the selection.
    List,
    /// Typing goes into the search buffer.
    Search,
    /// Generation panel: j/k move, Enter applies.
    Generations,
}

/// What the app should do after the catalog consumed a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogResult {
    Consumed,
    OpenDetail(u32),
}

// ── State ────────────────────────────────────────────────────────────────────

pub struct CatalogState {
    entries: Vec<Entry>,
    categories: Vec<String>,
    view: ViewState,
    page_size: usize,
    search_input: InputBuffer,
    focus: FocusZone,
    /// Index of the selected entry within the current page.
    selected: usize,
    /// Row in the generation panel: 0 is "All", then one per band.
    panel_selected: usize,
}

impl CatalogState {
    pub fn new(page_size: usize, view_mode: ViewMode) -> Self {
        Self {
            entries: Vec::new(),
            categories: Vec::new(),
            view: ViewState::with_view_mode(view_mode),
            page_size: page_size.max(1),
            search_input: InputBuffer::new(),
            focus: FocusZone::List,
            selected: 0,
            panel_selected: 0,
        }
    }

    /// Replace the collection. Returns to page 1.
    pub fn set_entries(&mut self, entries: Vec<Entry>) {
        self.categories = available_categories(&entries);
        self.entries = entries;
        self.apply(ViewChange::CollectionReplaced);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn page(&self) -> PageView<'_> {
        derive_page(&self.entries, &self.view, self.page_size)
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.page().items.get(self.selected).copied()
    }

    /// Whether the search bar currently owns the keyboard.
    pub fn is_typing(&self) -> bool {
        self.focus == FocusZone::Search
    }

    fn apply(&mut self, change: ViewChange) {
        let keeps_selection = matches!(change, ViewChange::ToggleViewMode);
        let total_pages = self.page().total_pages;
        let view = std::mem::take(&mut self.view);
        self.view = view.apply(change, total_pages);
        if !keeps_selection {
            self.selected = 0;
        }
        self.panel_selected = match self.view.filters.generation {
            GenerationFilter::All => 0,
            GenerationFilter::Band(b) => b as usize,
        };
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.page().items.len();
        if len == 0 {
            return;
        }
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, len as isize - 1) as usize;
    }

    fn vertical_step(&self) -> isize {
        match self.view.view_mode {
            ViewMode::Grid => GRID_COLUMNS as isize,
            ViewMode::List => 1,
        }
    }

    /// Apply the search text; edits that leave it unchanged keep page and selection.
    fn sync_search(&mut self) {
        if self.search_input.text() == self.view.filters.text {
            return;
        }
        self.apply(ViewChange::Search(self.search_input.text().to_string()));
    }

    // ── Input ────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event) -> Option<CatalogResult> {
        if let Event::Mouse(mouse) = event {
            return self.handle_mouse(mouse.kind);
        }

        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        if modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }

        match self.focus {
            FocusZone::Search => self.handle_search_input(*code),
            FocusZone::Generations => self.handle_panel_input(*code),
            FocusZone::List => self.handle_list_input(*code),
        }
    }

    /// Wheel scrolls the selection; only delivered when mouse capture is on.
    fn handle_mouse(&mut self, kind: MouseEventKind) -> Option<CatalogResult> {
        match kind {
            MouseEventKind::ScrollDown => self.move_selection(self.vertical_step()),
            MouseEventKind::ScrollUp => self.move_selection(-self.vertical_step()),
            _ => return None,
        }
        Some(CatalogResult::Consumed)
    }

    fn handle_list_input(&mut self, code: KeyCode) -> Option<CatalogResult> {
        match code {
            KeyCode::Char('/') => self.focus = FocusZone::Search,
            KeyCode::Tab => self.focus = FocusZone::Generations,
            KeyCode::Enter => {
                return self
                    .selected_entry()
                    .map(|e| CatalogResult::OpenDetail(e.id))
                    .or(Some(CatalogResult::Consumed));
            }
            KeyCode::Char('h') | KeyCode::Left => self.move_selection(-1),
            KeyCode::Char('l') | KeyCode::Right => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-self.vertical_step()),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(self.vertical_step()),
            KeyCode::Char('n') | KeyCode::Char(']') | KeyCode::PageDown => {
                self.apply(ViewChange::NextPage)
            }
            KeyCode::Char('p') | KeyCode::Char('[') | KeyCode::PageUp => {
                self.apply(ViewChange::PrevPage)
            }
            KeyCode::Home => self.apply(ViewChange::GoToPage(1)),
            KeyCode::End => {
                let last = self.page().total_pages;
                self.apply(ViewChange::GoToPage(last))
            }
            KeyCode::Char('t') => {
                let next = self.view.filters.category.next_in(&self.categories);
                self.apply(ViewChange::Category(next))
            }
            KeyCode::Char('T') => {
                let prev = self.view.filters.category.prev_in(&self.categories);
                self.apply(ViewChange::Category(prev))
            }
            KeyCode::Char('g') => {
                let next = self.view.filters.generation.next();
                self.apply(ViewChange::Generation(next))
            }
            KeyCode::Char('G') => {
                let prev = self.view.filters.generation.prev();
                self.apply(ViewChange::Generation(prev))
            }
            KeyCode::Char('v') => self.apply(ViewChange::ToggleViewMode),
            _ => return None,
        }
        Some(CatalogResult::Consumed)
    }

    fn handle_search_input(&mut self, code: KeyCode) -> Option<CatalogResult> {
        match code {
            KeyCode::Esc => {
                self.search_input.clear();
                self.focus = FocusZone::List;
                self.sync_search();
            }
            KeyCode::Enter => self.focus = FocusZone::List,
            KeyCode::Tab => self.focus = FocusZone::Generations,
            KeyCode::Char(c) => {
                self.search_input.insert_char(c);
                self.sync_search();
            }
            KeyCode::Backspace => {
                self.search_input.backspace();
                self.sync_search();
            }
            KeyCode::Delete => {
                self.search_input.delete();
                self.sync_search();
            }
            KeyCode::Left => self.search_input.move_left(),
            KeyCode::Right => self.search_input.move_right(),
            KeyCode::Home => self.search_input.move_home(),
            KeyCode::End => self.search_input.move_end(),
            _ => {} // Consume to avoid pass-through
        }
        Some(CatalogResult::Consumed)
    }

    fn handle_panel_input(&mut self, code: KeyCode) -> Option<CatalogResult> {
        match code {
            KeyCode::Esc | KeyCode::Tab => self.focus = FocusZone::List,
            KeyCode::Char('/') => self.focus = FocusZone::Search,
            KeyCode::Char('j') | KeyCode::Down => {
                self.panel_selected = (self.panel_selected + 1).min(GENERATIONS.len());
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.panel_selected = self.panel_selected.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let filter = match self.panel_selected {
                    0 => GenerationFilter::All,
                    band => GenerationFilter::Band(band as u8),
                };
                self.apply(ViewChange::Generation(filter));
                self.focus = FocusZone::List;
            }
            _ => {}
        }
        Some(CatalogResult::Consumed)
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, panel: Option<Rect>) {
        if let Some(panel) = panel {
            self.render_generation_panel(frame, panel);
        }

        let page = self.page();
        let pager_height = if page.total_pages > 1 { 1 } else { 0 };
        let rows = Layout::vertical([
            Constraint::Length(1), // Search
            Constraint::Length(1), // Filters
            Constraint::Length(1), // Counts
            Constraint::Min(1),    // Entries
            Constraint::Length(pager_height),
        ])
        .split(area);

        self.render_search_bar(frame, rows[0]);
        frame.render_widget(Paragraph::new(self.filter_line()), rows[1]);
        frame.render_widget(Paragraph::new(self.counts_line(&page)), rows[2]);

        if page.items.is_empty() {
            let empty = Paragraph::new(vec![
                Line::raw(""),
                Line::from(Span::styled(
                    "  No entries match the current filters.",
                    theme::muted(),
                )),
            ]);
            frame.render_widget(empty, rows[3]);
        } else {
            match self.view.view_mode {
                ViewMode::Grid => self.render_grid(frame, rows[3], &page),
                ViewMode::List => self.render_list(frame, rows[3], &page),
            }
        }

        if page.total_pages > 1 {
            frame.render_widget(
                Paragraph::new(pager_line(page.page, page.total_pages)),
                rows[4],
            );
        }
    }

    fn render_search_bar(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == FocusZone::Search;
        let prefix_style = if focused {
            Style::default().fg(theme::PRIMARY_LIGHT).add_modifier(Modifier::BOLD)
        } else {
            theme::dim()
        };

        let mut spans = vec![Span::styled(" [/] Search: ", prefix_style)];
        if focused {
            let (before, after) = self.search_input.split_at_cursor();
            spans.push(Span::styled(before.to_string(), Style::default().fg(theme::TEXT)));
            spans.push(Span::styled("_", Style::default().fg(theme::ACCENT)));
            spans.push(Span::styled(after.to_string(), Style::default().fg(theme::TEXT)));
        } else if self.search_input.is_empty() {
            spans.push(Span::styled("name or number...", theme::dim()));
        } else {
            spans.push(Span::styled(
                self.search_input.text().to_string(),
                Style::default().fg(theme::TEXT),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn filter_line(&self) -> Line<'static> {
        let filters = &self.view.filters;
        let type_span = match &filters.category {
            CategoryFilter::All => Span::styled("All types", theme::muted()),
            CategoryFilter::Tag(tag) => Span::styled(
                format!(" {tag} "),
                theme::badge(theme::category_color(tag)),
            ),
        };
        let generation_style = match filters.generation {
            GenerationFilter::All => theme::muted(),
            GenerationFilter::Band(b) => theme::badge(theme::generation_color(b)),
        };

        Line::from(vec![
            Span::styled(" Type ", theme::key_hint()),
            type_span,
            Span::styled(" t/T", theme::key_hint()),
            Span::raw("  │  "),
            Span::styled("Generation ", theme::key_hint()),
            Span::styled(filters.generation.label(), generation_style),
            Span::styled(" g/G", theme::key_hint()),
            Span::raw("  │  "),
            Span::styled("View ", theme::key_hint()),
            Span::styled(self.view.view_mode.label(), theme::highlight()),
            Span::styled(" v", theme::key_hint()),
        ])
    }

    fn counts_line(&self, page: &PageView<'_>) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!(" Showing {} of {} entries", page.items.len(), page.total_matches),
                theme::muted(),
            ),
            Span::raw("  "),
            Span::styled(
                format!("✓ {} loaded", self.entries.len()),
                Style::default().fg(theme::SUCCESS),
            ),
        ])
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect, page: &PageView<'_>) {
        let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
        let selected_row = self.selected / GRID_COLUMNS;
        let first_row = selected_row.saturating_sub(visible_rows - 1);

        let row_areas = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); visible_rows]).split(area);
        let card_width = area.width / GRID_COLUMNS as u16;

        for (slot, row_area) in row_areas.iter().enumerate() {
            let row = first_row + slot;
            for col in 0..GRID_COLUMNS {
                let index = row * GRID_COLUMNS + col;
                let Some(entry) = page.items.get(index) else {
                    break;
                };
                let card = Rect::new(
                    row_area.x + col as u16 * card_width,
                    row_area.y,
                    card_width,
                    row_area.height,
                );
                self.render_card(frame, card, entry, index == self.selected);
            }
        }
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, entry: &Entry, selected: bool) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if selected {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let name_style = if selected { theme::highlight() } else { Style::default().fg(theme::TEXT) };
        let mut badges = category_badges(&entry.types);
        badges.push(Span::raw(" "));
        badges.push(generation_badge(entry.id));

        let lines = vec![
            Line::from(vec![
                Span::styled(entry.number(), theme::muted()),
                Span::raw(" "),
                Span::styled(entry.display_name(), name_style),
            ]),
            Line::from(badges),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_list(&self, frame: &mut Frame, area: Rect, page: &PageView<'_>) {
        let mut lines = vec![Line::from(Span::styled(
            format!(
                "   {:<6}{:<16}{:<22}{:<8}{:>9}{:>10}",
                "#", "Name", "Types", "Gen", "Height", "Weight"
            ),
            theme::heading(),
        ))];

        for (i, entry) in page.items.iter().enumerate() {
            let selected = i == self.selected;
            let pointer = if selected { " \u{25b8} " } else { "   " };
            let text_style = if selected { theme::highlight() } else { Style::default().fg(theme::TEXT) };

            let types_width: usize = entry.types.iter().map(|t| t.chars().count() + 2).sum::<usize>()
                + entry.types.len().saturating_sub(1);
            let mut spans = vec![
                Span::styled(pointer, Style::default().fg(theme::ACCENT)),
                Span::styled(format!("{:<6}", entry.number()), theme::muted()),
                Span::styled(format!("{:<16}", entry.display_name()), text_style),
            ];
            spans.extend(category_badges(&entry.types));
            spans.push(Span::raw(" ".repeat(22usize.saturating_sub(types_width))));
            spans.push(generation_badge(entry.id));
            spans.push(Span::raw("   "));
            spans.push(Span::styled(format!("{:>8}", entry.height_label()), text_style));
            spans.push(Span::styled(format!("{:>10}", entry.weight_label()), text_style));
            lines.push(Line::from(spans));
        }

        // Keep the selection in view.
        let visible = area.height.saturating_sub(1) as usize;
        let scroll = self.selected.saturating_sub(visible.saturating_sub(1));
        frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), area);
    }

    fn render_generation_panel(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == FocusZone::Generations;
        let block = if focused {
            theme::block_focused("Generations")
        } else {
            theme::block_default("Generations")
        };
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let active = self.view.filters.generation;
        let mut lines = Vec::with_capacity(GENERATIONS.len() + 3);

        let row = |index: usize, label: String, range: String, is_active: bool| {
            let is_selected = focused && self.panel_selected == index;
            let pointer = if is_selected { "\u{25b8} " } else { "  " };
            let style = if is_active {
                theme::highlight()
            } else if is_selected {
                Style::default().fg(theme::PRIMARY_LIGHT)
            } else {
                Style::default().fg(theme::TEXT)
            };
            Line::from(vec![
                Span::styled(pointer, Style::default().fg(theme::ACCENT)),
                Span::styled(label, style),
                Span::styled(range, theme::dim()),
            ])
        };

        lines.push(row(
            0,
            "All".to_string(),
            String::new(),
            active == GenerationFilter::All,
        ));
        for g in GENERATIONS.iter() {
            lines.push(row(
                g.id as usize,
                format!("{:<8}", g.region),
                format!(" {}", g.range_label()),
                active == GenerationFilter::Band(g.id),
            ));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":focus "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":apply"),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// `‹ Prev  1 2 [3] 4 5 6 7  Next ›`; disabled ends are dimmed.
pub fn pager_line(current: usize, total: usize) -> Line<'static> {
    let enabled = |on: bool| if on { Style::default().fg(theme::TEXT) } else { theme::dim() };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled("‹ Prev ", enabled(current > 1)),
    ];
    for page in page_window(current, total) {
        if page == current {
            spans.push(Span::styled(format!("[{page}]"), theme::badge(theme::PRIMARY)));
        } else {
            spans.push(Span::styled(format!(" {page} "), Style::default().fg(theme::TEXT)));
        }
    }
    spans.push(Span::styled(" Next ›", enabled(current < total)));
    Line::from(spans)
}
