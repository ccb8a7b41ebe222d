//! Root layout computation: header + main content (+ generation panel) + status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the generation panel on the catalog screen.
pub const GENERATION_PANEL_WIDTH: u16 = 24;
/// Hide the generation panel below this terminal width.
pub const HIDE_PANEL_THRESHOLD: u16 = 72;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Title row.
    pub header: Rect,
    /// Generation panel (None if hidden or not requested).
    pub panel: Option<Rect>,
    /// Main content area.
    pub main: Rect,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl AppLayout {
    /// Compute layout regions. `with_panel` requests the generation panel,
    /// which is still dropped on narrow terminals.
    pub fn compute(area: Rect, with_panel: bool) -> Self {
        let rows = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        let header = rows[0];
        let content = rows[1];
        let status = rows[2];

        let (panel, main) = if with_panel && area.width >= HIDE_PANEL_THRESHOLD {
            let cols = Layout::horizontal([
                Constraint::Length(GENERATION_PANEL_WIDTH),
                Constraint::Min(1),
            ])
            .split(content);
            (Some(cols[0]), cols[1])
        } else {
            (None, content)
        };

        AppLayout {
            header,
            panel,
            main,
            status,
        }
    }
}

/// Calculate a centered rect using percentage of parent area.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
