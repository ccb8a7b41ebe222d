//! Color theme for the Pokedex TUI.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

// ── Primary palette ─────────────────────────────────────────────────────────

/// Dex red: primary accent, active items, focused borders.
pub const PRIMARY: Color = Color::Rgb(0xE5, 0x39, 0x35);
/// Light red: highlights, hints, secondary focus.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0xEF, 0x6C, 0x62);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Gold: selection, calls to action.
pub const ACCENT: Color = Color::Rgb(0xFF, 0xCB, 0x05);

// ── Backgrounds ─────────────────────────────────────────────────────────────

pub const BG_BASE: Color = Color::Rgb(0x12, 0x14, 0x1C);
pub const BG_SURFACE: Color = Color::Rgb(0x1E, 0x22, 0x2E);

// ── Text ────────────────────────────────────────────────────────────────────

pub const TEXT: Color = Color::Rgb(0xE0, 0xE0, 0xE0);
pub const TEXT_MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);
pub const TEXT_DIM: Color = Color::Rgb(0x50, 0x50, 0x50);

// ── Semantic ────────────────────────────────────────────────────────────────

pub const ERROR: Color = Color::Rgb(0xEF, 0x53, 0x50);
pub const SUCCESS: Color = Color::Rgb(0x66, 0xBB, 0x6A);
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);
pub const INFO: Color = Color::Rgb(0x42, 0xA5, 0xF5);

// ── Category colors ─────────────────────────────────────────────────────────

/// Used for tags outside the known category table.
pub const CATEGORY_FALLBACK: Color = Color::Rgb(0x9E, 0x9E, 0x9E);

/// Badge color for a category tag.
pub fn category_color(tag: &str) -> Color {
    match tag {
        "normal" => Color::Rgb(0xA8, 0xA7, 0x7A),
        "fire" => Color::Rgb(0xEE, 0x81, 0x30),
        "water" => Color::Rgb(0x63, 0x90, 0xF0),
        "electric" => Color::Rgb(0xF7, 0xD0, 0x2C),
        "grass" => Color::Rgb(0x7A, 0xC7, 0x4C),
        "ice" => Color::Rgb(0x96, 0xD9, 0xD6),
        "fighting" => Color::Rgb(0xC2, 0x2E, 0x28),
        "poison" => Color::Rgb(0xA3, 0x3E, 0xA1),
        "ground" => Color::Rgb(0xE2, 0xBF, 0x65),
        "flying" => Color::Rgb(0xA9, 0x8F, 0xF3),
        "psychic" => Color::Rgb(0xF9, 0x55, 0x87),
        "bug" => Color::Rgb(0xA6, 0xB9, 0x1A),
        "rock" => Color::Rgb(0xB6, 0xA1, 0x36),
        "ghost" => Color::Rgb(0x73, 0x57, 0x97),
        "dragon" => Color::Rgb(0x6F, 0x35, 0xFC),
        "dark" => Color::Rgb(0x70, 0x57, 0x46),
        "steel" => Color::Rgb(0xB7, 0xB7, 0xCE),
        "fairy" => Color::Rgb(0xD6, 0x85, 0xAD),
        _ => CATEGORY_FALLBACK,
    }
}

/// Badge color for a generation band (1-based), fallback outside 1..=8.
pub fn generation_color(band: u8) -> Color {
    match band {
        1 => Color::Rgb(0xEF, 0x53, 0x50),
        2 => Color::Rgb(0xFF, 0xB3, 0x00),
        3 => Color::Rgb(0x43, 0xA0, 0x47),
        4 => Color::Rgb(0x1E, 0x88, 0xE5),
        5 => Color::Rgb(0x8E, 0x24, 0xAA),
        6 => Color::Rgb(0xD8, 0x1B, 0x60),
        7 => Color::Rgb(0xFB, 0x8C, 0x00),
        8 => Color::Rgb(0x39, 0x49, 0xAB),
        _ => CATEGORY_FALLBACK,
    }
}

/// Black text on a colored badge.
pub fn badge(color: Color) -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(color)
        .add_modifier(Modifier::BOLD)
}

// ── Style helpers ───────────────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(PRIMARY)
        .add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_default())
}
