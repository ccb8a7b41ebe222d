//! Detail view for one catalog entry.
//!
//! The record is fetched fresh on every open, including prev/next steps.
//! Responses are tagged with their identifier; anything that no longer
//! matches the displayed identifier is dropped.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc;

use crate::core::api::sprite_or_placeholder;
use crate::core::catalog::{capitalize, format_number, generation_of, EntryDetail, Stat};
use crate::tui::events::DetailOutcome;
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::badges::{category_badges, generation_badge};

/// Upper bound of a base stat, used to scale the bars.
pub const STAT_MAX: u8 = 255;

#[derive(Debug, Clone)]
enum DetailStatus {
    Loading,
    Loaded(Box<EntryDetail>),
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailResult {
    Consumed,
    Back,
    /// Open this image reference externally.
    OpenSprite(String),
}

pub struct DetailState {
    id: u32,
    universe: u32,
    status: DetailStatus,
    data_rx: mpsc::UnboundedReceiver<DetailOutcome>,
    data_tx: mpsc::UnboundedSender<DetailOutcome>,
}

impl DetailState {
    pub fn new(universe: u32) -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            id: 0,
            universe: universe.max(1),
            status: DetailStatus::Loading,
            data_rx,
            data_tx,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, DetailStatus::Loading)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.status, DetailStatus::NotFound(_))
    }

    pub fn detail(&self) -> Option<&EntryDetail> {
        match &self.status {
            DetailStatus::Loaded(detail) => Some(detail),
            _ => None,
        }
    }

    /// Show `id` and start fetching it.
    pub fn open(&mut self, id: u32, services: &Services) {
        self.begin(id);

        let source = services.source.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let outcome = match source.fetch_detail(id).await {
                Ok(detail) => DetailOutcome::Loaded {
                    id,
                    detail: Box::new(detail),
                },
                Err(e) => {
                    log::warn!("Detail fetch for #{id} failed: {e}");
                    DetailOutcome::Failed {
                        id,
                        reason: e.to_string(),
                    }
                }
            };
            let _ = tx.send(outcome);
        });
    }

    fn begin(&mut self, id: u32) {
        self.id = id;
        self.status = DetailStatus::Loading;
    }

    /// Drain finished fetches. Call from on_tick.
    pub fn poll(&mut self) {
        while let Ok(outcome) = self.data_rx.try_recv() {
            self.accept(outcome);
        }
    }

    /// Apply a fetch result; returns false when it was stale.
    fn accept(&mut self, outcome: DetailOutcome) -> bool {
        if outcome.id() != self.id {
            log::debug!(
                "Discarding stale detail for #{} (showing #{})",
                outcome.id(),
                self.id
            );
            return false;
        }
        self.status = match outcome {
            DetailOutcome::Loaded { detail, .. } => DetailStatus::Loaded(detail),
            DetailOutcome::Failed { reason, .. } => DetailStatus::NotFound(reason),
        };
        true
    }

    pub fn prev_id(&self) -> Option<u32> {
        (self.id > 1).then(|| self.id - 1)
    }

    pub fn next_id(&self) -> Option<u32> {
        (self.id < self.universe).then(|| self.id + 1)
    }

    // ── Input ────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> Option<DetailResult> {
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

        match code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => Some(DetailResult::Back),
            // The not-found state only offers the way back.
            _ if self.is_not_found() => None,
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => {
                if let Some(id) = self.prev_id() {
                    self.open(id, services);
                }
                Some(DetailResult::Consumed)
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => {
                if let Some(id) = self.next_id() {
                    self.open(id, services);
                }
                Some(DetailResult::Consumed)
            }
            KeyCode::Char('o') => self
                .detail()
                .and_then(|d| d.entry.sprite.clone())
                .map(DetailResult::OpenSprite)
                .or(Some(DetailResult::Consumed)),
            _ => None,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match &self.status {
            DetailStatus::Loading => self.render_message(
                frame,
                area,
                vec![Line::from(Span::styled(
                    format!("Loading {}...", format_number(self.id)),
                    theme::muted(),
                ))],
            ),
            DetailStatus::NotFound(reason) => self.render_message(
                frame,
                area,
                vec![
                    Line::from(Span::styled(
                        format!("Entry {} not found", format_number(self.id)),
                        Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(reason.clone(), theme::dim())),
                    Line::raw(""),
                    Line::from(vec![
                        Span::styled("Esc", theme::highlight()),
                        Span::raw(" back to catalog"),
                    ]),
                ],
            ),
            DetailStatus::Loaded(detail) => self.render_detail(frame, area, detail),
        }
    }

    fn render_message(&self, frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
        let block = theme::block_default(self.title_text());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([Constraint::Percentage(35), Constraint::Min(1)]).split(inner);
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            rows[1],
        );
    }

    fn title_text(&self) -> &'static str {
        "Pokédex Entry"
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, detail: &EntryDetail) {
        let entry = &detail.entry;
        let block = Block::default()
            .title(format!(" {} {} ", entry.number(), entry.display_name()))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(2), // Badges
            Constraint::Min(8),    // Info + stats
            Constraint::Length(1), // Navigation
        ])
        .split(inner);

        let mut badges = vec![Span::raw(" ")];
        badges.extend(category_badges(&entry.types));
        badges.push(Span::raw("  "));
        badges.push(generation_badge(entry.id));
        frame.render_widget(Paragraph::new(Line::from(badges)), rows[0]);

        let cols = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[1]);
        self.render_info(frame, cols[0], detail);
        self.render_stats(frame, cols[1], &detail.stats);
        frame.render_widget(Paragraph::new(self.navigation_line()), rows[2]);
    }

    fn render_info(&self, frame: &mut Frame, area: Rect, detail: &EntryDetail) {
        let entry = &detail.entry;
        let generation = match generation_of(entry.id) {
            Some(g) => format!("Gen {} · {}", g.id, g.region),
            None => "Unknown".to_string(),
        };

        let field = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!(" {label:<11}"), theme::muted()),
                Span::styled(value, Style::default().fg(theme::TEXT)),
            ])
        };

        let mut lines = vec![
            field("Height", entry.height_label()),
            field("Weight", entry.weight_label()),
            field("Generation", generation),
            field("Image", sprite_or_placeholder(entry).to_string()),
            Line::raw(""),
            Line::from(Span::styled(" Abilities", theme::heading())),
        ];
        for ability in &detail.abilities {
            lines.push(Line::from(vec![
                Span::styled("  • ", Style::default().fg(theme::ACCENT)),
                Span::raw(capitalize(ability)),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(" Description", theme::heading())));
        lines.push(Line::from(Span::raw(format!(" {}", detail.description))));

        let block = theme::block_default("Info");
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect, stats: &[Stat]) {
        let block = theme::block_default("Base stats");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let bar_width = inner.width.saturating_sub(18) as usize;
        let mut lines: Vec<Line> = stats
            .iter()
            .map(|stat| {
                Line::from(vec![
                    Span::styled(format!(" {:<8}", stat_label(&stat.name)), theme::muted()),
                    Span::styled(format!("{:>4} ", stat.value), Style::default().fg(theme::TEXT)),
                    Span::styled(stat_bar(stat.value, bar_width), Style::default().fg(stat_color(stat.value))),
                ])
            })
            .collect();

        let total: u32 = stats.iter().map(|s| u32::from(s.value)).sum();
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<8}", "Total"), theme::heading()),
            Span::styled(format!("{total:>4}"), theme::highlight()),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn navigation_line(&self) -> Line<'static> {
        let nav = |label: String, enabled: bool| {
            Span::styled(label, if enabled { theme::key_hint().fg(theme::TEXT) } else { theme::dim() })
        };
        let prev = self
            .prev_id()
            .map(|id| format!("← {}", format_number(id)))
            .unwrap_or_else(|| "←".to_string());
        let next = self
            .next_id()
            .map(|id| format!("{} →", format_number(id)))
            .unwrap_or_else(|| "→".to_string());

        Line::from(vec![
            Span::raw(" "),
            nav(prev, self.prev_id().is_some()),
            Span::raw("   "),
            nav(next, self.next_id().is_some()),
            Span::raw("   │ "),
            Span::styled("o", theme::highlight()),
            Span::raw(":open image "),
            Span::styled("Esc", theme::highlight()),
            Span::raw(":back"),
        ])
    }
}

/// Filled/empty bar of `width` cells, scaled to [`STAT_MAX`].
pub fn stat_bar(value: u8, width: usize) -> String {
    let filled = (f64::from(value) / f64::from(STAT_MAX) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn stat_color(value: u8) -> ratatui::style::Color {
    match value {
        0..=49 => theme::ERROR,
        50..=89 => theme::WARNING,
        90..=119 => theme::SUCCESS,
        _ => theme::INFO,
    }
}

fn stat_label(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "Attack".to_string(),
        "defense" => "Defense".to_string(),
        "special-attack" => "Sp. Atk".to_string(),
        "special-defense" => "Sp. Def".to_string(),
        "speed" => "Speed".to_string(),
        other => capitalize(other),
    }
}
