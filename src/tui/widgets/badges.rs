//! Category and generation badges shared by the catalog and detail screens.

use ratatui::text::Span;

use crate::core::catalog::{capitalize, generation_of};
use crate::tui::theme;

pub fn category_badge(tag: &str) -> Span<'static> {
    Span::styled(
        format!(" {} ", capitalize(tag)),
        theme::badge(theme::category_color(tag)),
    )
}

/// One badge per tag, separated by a space.
pub fn category_badges(tags: &[String]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(tags.len() * 2);
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(category_badge(tag));
    }
    spans
}

/// `Gen N`, derived from the identifier alone; `Gen ?` outside the table.
pub fn generation_label(id: u32) -> String {
    match generation_of(id) {
        Some(g) => format!("Gen {}", g.id),
        None => "Gen ?".to_string(),
    }
}

pub fn generation_badge(id: u32) -> Span<'static> {
    let band = generation_of(id).map(|g| g.id).unwrap_or(0);
    Span::styled(
        format!(" {} ", generation_label(id)),
        theme::badge(theme::generation_color(band)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_label() {
        assert_eq!(generation_label(1), "Gen 1");
        assert_eq!(generation_label(151), "Gen 1");
        assert_eq!(generation_label(152), "Gen 2");
        assert_eq!(generation_label(898), "Gen 8");
        assert_eq!(generation_label(899), "Gen ?");
    }

    #[test]
    fn test_category_badges_spacing() {
        let spans = category_badges(&["grass".to_string(), "poison".to_string()]);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " Grass   Poison ");
        assert!(category_badges(&[]).is_empty());
    }

    #[test]
    fn test_badge_colors_follow_theme() {
        assert_eq!(category_badge("fire").style.bg, Some(theme::category_color("fire")));
        assert_eq!(generation_badge(400).style.bg, Some(theme::generation_color(4)));
    }
}
