use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::config::ViewModeSetting;
use crate::core::catalog::GENERATIONS;
use crate::core::pipeline::ViewMode;

use super::events::{Action, AppEvent, Notification, NotificationLevel, Route};
use super::layout::{centered_rect, AppLayout};
use super::services::Services;
use super::theme;
use super::views::catalog::{CatalogResult, CatalogState};
use super::views::detail::{DetailResult, DetailState};
use super::views::loading::LoadingState;

/// Ticks a notification stays on screen.
const NOTIFICATION_TTL_TICKS: u32 = 100;
const MAX_NOTIFICATIONS: usize = 3;

/// Central application state (Elm architecture).
pub struct AppState {
    pub running: bool,
    pub route: Route,
    /// False until the loader delivered the collection.
    loaded: bool,
    loading: LoadingState,
    catalog: CatalogState,
    detail: DetailState,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    notification_counter: u64,
    pub show_help: bool,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    services: Services,
}

impl AppState {
    pub fn new(event_rx: mpsc::UnboundedReceiver<AppEvent>, services: Services) -> Self {
        let view_mode = match services.config.tui.default_view {
            ViewModeSetting::Grid => ViewMode::Grid,
            ViewModeSetting::List => ViewMode::List,
        };
        Self {
            running: true,
            route: Route::Catalog,
            loaded: false,
            loading: LoadingState::new(),
            catalog: CatalogState::new(services.config.tui.page_size, view_mode),
            detail: DetailState::new(services.config.api.universe_size),
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            event_rx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        self.services.spawn_catalog_load();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => self.handle_input(crossterm_event),
            AppEvent::LoadProgress(progress) => self.loading.on_progress(progress),
            AppEvent::CatalogLoaded(report) => {
                let count = report.entries.len();
                self.catalog.set_entries(report.entries);
                self.loaded = true;
                self.push_notification(
                    format!("Loaded {count} entries"),
                    NotificationLevel::Success,
                );
            }
            AppEvent::CatalogFailed(reason) => self.loading.on_failed(reason),
            AppEvent::Action(action) => self.handle_action(action),
        }
    }

    fn handle_input(&mut self, event: Event) {
        // Priority 1: Help modal
        if self.show_help {
            if let Some(action) = self.map_help_input(&event) {
                self.handle_action(action);
            }
            return;
        }

        // Priority 2: Current screen
        if self.loaded && self.dispatch_view_input(&event) {
            return;
        }

        // Priority 3: Global keybindings
        if let Some(action) = self.map_input_to_action(&event) {
            self.handle_action(action);
        }
    }

    /// Dispatch input to the current route. Returns true if consumed.
    fn dispatch_view_input(&mut self, event: &Event) -> bool {
        match self.route {
            Route::Catalog => match self.catalog.handle_input(event) {
                Some(CatalogResult::Consumed) => true,
                Some(CatalogResult::OpenDetail(id)) => {
                    self.handle_action(Action::OpenDetail(id));
                    true
                }
                None => false,
            },
            Route::Detail(_) => {
                let result = self.detail.handle_input(event, &self.services);
                // prev/next may have moved to another identifier
                if matches!(self.route, Route::Detail(_)) {
                    self.route = Route::Detail(self.detail.id());
                }
                match result {
                    Some(DetailResult::Consumed) => true,
                    Some(DetailResult::Back) => {
                        self.handle_action(Action::BackToCatalog);
                        true
                    }
                    Some(DetailResult::OpenSprite(url)) => {
                        self.open_sprite(&url);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    // ── Input mapping ───────────────────────────────────────────────────

    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (*modifiers, *code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('q')) => Some(Action::Quit),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => Some(Action::ShowHelp),
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::OpenDetail(id) => {
                self.route = Route::Detail(id);
                self.detail.open(id, &self.services);
            }
            Action::BackToCatalog => self.route = Route::Catalog,
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
        }
    }

    fn open_sprite(&mut self, url: &str) {
        match open::that_detached(url) {
            Ok(()) => {
                log::info!("Opened image {url}");
                self.push_notification("Opened image in browser".into(), NotificationLevel::Info);
            }
            Err(e) => {
                log::warn!("Failed to open {url}: {e}");
                self.push_notification(format!("Could not open image: {e}"), NotificationLevel::Error);
            }
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: NOTIFICATION_TTL_TICKS,
        });

        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired, poll async data.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);

        self.detail.poll();
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        if !self.loaded {
            self.loading.render(frame, area);
            return;
        }

        let layout = AppLayout::compute(area, self.route == Route::Catalog);

        self.render_header(frame, layout.header);
        match self.route {
            Route::Catalog => self.catalog.render(frame, layout.main, layout.panel),
            Route::Detail(_) => self.detail.render(frame, layout.main),
        }
        self.render_status_bar(frame, layout.status);

        self.render_notifications(frame, area);
        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header = Line::from(vec![
            Span::styled(" POKÉDEX ", theme::brand_badge()),
            Span::raw(" "),
            Span::styled("National Pokédex", theme::title()),
            Span::styled(
                format!(
                    "  {} generations · {} entries",
                    GENERATIONS.len(),
                    self.catalog.entries().len()
                ),
                theme::muted(),
            ),
        ]);
        frame.render_widget(Paragraph::new(header), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.route.label()),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("│ "),
        ];
        let hints: &[(&str, &str)] = match self.route {
            Route::Catalog if self.catalog.is_typing() => &[("Esc", "clear "), ("Enter", "done ")],
            Route::Catalog => &[
                ("/", "search "),
                ("t", "type "),
                ("g", "gen "),
                ("n/p", "page "),
                ("v", "view "),
                ("Enter", "open "),
            ],
            Route::Detail(_) => &[("←/→", "prev/next "), ("o", "image "), ("Esc", "back ")],
        };
        for (key, desc) in hints {
            spans.push(Span::styled(*key, theme::key_hint()));
            spans.push(Span::raw(format!(":{desc}")));
        }
        spans.push(Span::styled("?", theme::key_hint()));
        spans.push(Span::raw(":help "));
        spans.push(Span::styled("q", theme::key_hint()));
        spans.push(Span::raw(":quit"));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let notification_area = Rect::new(x, 1, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(format!(" {prefix} "), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = [
            ("Global:", ""),
            ("q / Ctrl+C", "Quit"),
            ("?", "Toggle this help"),
            ("", ""),
            ("Catalog:", ""),
            ("/", "Search by name or number"),
            ("Esc (in search)", "Clear search"),
            ("t / T", "Next / previous type filter"),
            ("g / G", "Next / previous generation filter"),
            ("Tab", "Focus generation panel"),
            ("arrows / hjkl", "Move selection"),
            ("n / p", "Next / previous page"),
            ("Home / End", "First / last page"),
            ("v", "Toggle grid / list"),
            ("Enter", "Open entry"),
            ("", ""),
            ("Entry:", ""),
            ("← / →", "Previous / next entry"),
            ("o", "Open image in browser"),
            ("Esc / b", "Back to catalog"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(" Keybindings", theme::title())),
            Line::raw(""),
        ];

        for (key, desc) in keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(format!("  {key}"), theme::title())));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{key:<18}"),
                        Style::default()
                            .fg(theme::PRIMARY_LIGHT)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(desc),
                ]));
            }
        }

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}
