//! Loading screen shown while the catalog downloads.
//!
//! A percentage gauge plus one chip per generation; a chip lights up once
//! progress passes its share of the bar.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::core::catalog::GENERATIONS;
use crate::core::loader::LoadProgress;
use crate::tui::theme;

/// Share of the bar covered by each generation chip.
const CHIP_STEP: f64 = 100.0 / GENERATIONS.len() as f64;

/// Number of lit chips: chip `i` lights once `percent > i × 12.5`.
pub fn lit_generations(percent: u8) -> usize {
    (0..GENERATIONS.len())
        .filter(|&i| f64::from(percent) > i as f64 * CHIP_STEP)
        .count()
}

pub struct LoadingState {
    progress: Option<LoadProgress>,
    /// Set when the index fetch failed; the screen stays up.
    failure: Option<String>,
}

impl LoadingState {
    pub fn new() -> Self {
        Self {
            progress: None,
            failure: None,
        }
    }

    pub fn on_progress(&mut self, progress: LoadProgress) {
        // Updates arrive in order; ignore anything that would move the bar back.
        if self.percent() <= progress.percent {
            self.progress = Some(progress);
        }
    }

    pub fn on_failed(&mut self, reason: String) {
        self.failure = Some(reason);
    }

    pub fn percent(&self) -> u8 {
        self.progress.map(|p| p.percent).unwrap_or(0)
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Pokédex ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Percentage(30),
            Constraint::Length(2), // Title
            Constraint::Length(1), // Gauge
            Constraint::Length(1),
            Constraint::Length(GENERATIONS.len() as u16 / 2), // Chips
            Constraint::Length(1),
            Constraint::Min(1), // Status / error
        ])
        .split(inner);

        let title = Paragraph::new(vec![
            Line::from(Span::styled("Loading the National Pokédex", theme::title())),
            Line::from(Span::styled(
                format!("All {} generations", GENERATIONS.len()),
                theme::muted(),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(title, rows[1]);

        let gauge_area = centered_columns(rows[2], 60);
        let gauge_color = if self.is_failed() { theme::ERROR } else { theme::PRIMARY };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(gauge_color).bg(theme::BG_SURFACE))
            .percent(u16::from(self.percent()))
            .label(format!("{}%", self.percent()));
        frame.render_widget(gauge, gauge_area);

        self.render_chips(frame, centered_columns(rows[4], 60));

        let status = match (&self.failure, self.progress) {
            (Some(reason), _) => vec![
                Line::from(Span::styled(
                    "Catalog index unreachable",
                    Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(reason.clone(), theme::muted())),
                Line::raw(""),
                Line::from(vec![
                    Span::styled("q", theme::key_hint()),
                    Span::raw(":quit"),
                ]),
            ],
            (None, Some(p)) => vec![Line::from(Span::styled(
                format!(
                    "Batch {}/{} · {} entries",
                    p.batches_done, p.batches_total, p.loaded
                ),
                theme::muted(),
            ))],
            (None, None) => vec![Line::from(Span::styled(
                "Fetching index...",
                theme::muted(),
            ))],
        };
        frame.render_widget(
            Paragraph::new(status)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            rows[6],
        );
    }

    /// Two rows of four chips.
    fn render_chips(&self, frame: &mut Frame, area: Rect) {
        let lit = lit_generations(self.percent());
        let lines: Vec<Line> = GENERATIONS
            .chunks(4)
            .enumerate()
            .map(|(row, gens)| {
                let spans: Vec<Span> = gens
                    .iter()
                    .enumerate()
                    .flat_map(|(col, g)| {
                        let index = row * 4 + col;
                        let style = if index < lit {
                            theme::badge(theme::generation_color(g.id))
                        } else {
                            theme::dim()
                        };
                        [
                            Span::styled(format!(" Gen {} {:<7}", g.id, g.region), style),
                            Span::raw(" "),
                        ]
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }
}

fn centered_columns(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(percent: u8) -> LoadProgress {
        LoadProgress {
            batches_done: 1,
            batches_total: 18,
            loaded: 50,
            percent,
        }
    }

    #[test]
    fn test_lit_generations_thresholds() {
        assert_eq!(lit_generations(0), 0);
        assert_eq!(lit_generations(1), 1);
        assert_eq!(lit_generations(12), 1);
        assert_eq!(lit_generations(13), 2);
        assert_eq!(lit_generations(50), 4);
        assert_eq!(lit_generations(88), 8);
        assert_eq!(lit_generations(100), 8);
    }

    #[test]
    fn test_progress_never_moves_back() {
        let mut state = LoadingState::new();
        assert_eq!(state.percent(), 0);
        state.on_progress(progress(50));
        state.on_progress(progress(40));
        assert_eq!(state.percent(), 50);
        state.on_progress(progress(100));
        assert_eq!(state.percent(), 100);
    }

    #[test]
    fn test_failure_keeps_screen() {
        let mut state = LoadingState::new();
        assert!(!state.is_failed());
        state.on_failed("connection refused".into());
        assert!(state.is_failed());
        assert_eq!(state.percent(), 0);
    }
}
