//! Catalog domain types.
//!
//! `Entry` is what the list views show, `EntryDetail` is what the detail
//! page shows. The generation band is never stored: it is always derived
//! from the identifier through [`GENERATIONS`].

use serde::{Deserialize, Serialize};

/// Size of the national catalog the loader fetches by default.
pub const DEFAULT_UNIVERSE_SIZE: u32 = 898;

/// Shown when the species payload has no flavor text in the preferred language.
pub const NO_DESCRIPTION: &str = "No description available.";

// ── Generations ─────────────────────────────────────────────────────────────

/// One closed band of the generation partition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    pub id: u8,
    pub region: &'static str,
    pub first: u32,
    pub last: u32,
}

impl Generation {
    pub fn contains(&self, id: u32) -> bool {
        (self.first..=self.last).contains(&id)
    }

    /// Range label, e.g. `1-151`.
    pub fn range_label(&self) -> String {
        format!("{}-{}", self.first, self.last)
    }
}

/// Ascending, non-overlapping, contiguous bands covering 1..=898.
pub const GENERATIONS: [Generation; 8] = [
    Generation { id: 1, region: "Kanto", first: 1, last: 151 },
    Generation { id: 2, region: "Johto", first: 152, last: 251 },
    Generation { id: 3, region: "Hoenn", first: 252, last: 386 },
    Generation { id: 4, region: "Sinnoh", first: 387, last: 493 },
    Generation { id: 5, region: "Unova", first: 494, last: 649 },
    Generation { id: 6, region: "Kalos", first: 650, last: 721 },
    Generation { id: 7, region: "Alola", first: 722, last: 809 },
    Generation { id: 8, region: "Galar", first: 810, last: 898 },
];

/// Generation band for an identifier, `None` outside the table.
pub fn generation_of(id: u32) -> Option<&'static Generation> {
    GENERATIONS.iter().find(|g| g.contains(id))
}

/// Look up a band by its number (1-based).
pub fn generation_by_id(band: u8) -> Option<&'static Generation> {
    GENERATIONS.iter().find(|g| g.id == band)
}

// ── Entry ───────────────────────────────────────────────────────────────────

/// Catalog-level record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u32,
    pub name: String,
    /// Category tags in API slot order.
    pub types: Vec<String>,
    /// Resolved image reference; `None` means use the placeholder.
    pub sprite: Option<String>,
    /// Height in decimetres.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
}

impl Entry {
    pub fn generation(&self) -> Option<&'static Generation> {
        generation_of(self.id)
    }

    /// Band number, 0 when the identifier is outside the partition table.
    pub fn generation_id(&self) -> u8 {
        self.generation().map(|g| g.id).unwrap_or(0)
    }

    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }

    /// `#001` style identifier.
    pub fn number(&self) -> String {
        format_number(self.id)
    }

    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    /// Height in metres, one decimal.
    pub fn height_label(&self) -> String {
        format!("{:.1} m", self.height as f64 / 10.0)
    }

    /// Weight in kilograms, one decimal.
    pub fn weight_label(&self) -> String {
        format!("{:.1} kg", self.weight as f64 / 10.0)
    }
}

// ── Detail ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub value: u8,
}

/// Detail-page record: an [`Entry`] plus stats, abilities and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDetail {
    pub entry: Entry,
    pub stats: Vec<Stat>,
    pub abilities: Vec<String>,
    pub description: String,
}

impl EntryDetail {
    pub fn stat_total(&self) -> u32 {
        self.stats.iter().map(|s| s.value as u32).sum()
    }
}

// ── Formatting helpers ──────────────────────────────────────────────────────

pub fn format_number(id: u32) -> String {
    format!("#{id:03}")
}

/// Uppercase the first character of each `-` separated word.
pub fn capitalize(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

/// Replace every control character (form feeds, newlines, tabs) with a space.
pub fn normalize_flavor_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32) -> Entry {
        Entry {
            id,
            name: "mr-mime".to_string(),
            types: vec!["psychic".to_string(), "fairy".to_string()],
            sprite: None,
            height: 13,
            weight: 545,
        }
    }

    #[test]
    fn test_band_boundaries() {
        let expected = [
            (1, 1), (151, 1), (152, 2), (251, 2), (252, 3), (386, 3),
            (387, 4), (493, 4), (494, 5), (649, 5), (650, 6), (721, 6),
            (722, 7), (809, 7), (810, 8), (898, 8),
        ];
        for (id, band) in expected {
            assert_eq!(generation_of(id).map(|g| g.id), Some(band), "id {id}");
        }
    }

    #[test]
    fn test_bands_cover_universe_exactly() {
        assert_eq!(GENERATIONS[0].first, 1);
        assert_eq!(GENERATIONS[GENERATIONS.len() - 1].last, DEFAULT_UNIVERSE_SIZE);
        for pair in GENERATIONS.windows(2) {
            assert!(pair[0].first <= pair[0].last);
            assert_eq!(pair[0].last + 1, pair[1].first);
            assert_eq!(pair[0].id + 1, pair[1].id);
        }
        for id in 1..=DEFAULT_UNIVERSE_SIZE {
            let hits = GENERATIONS.iter().filter(|g| g.contains(id)).count();
            assert_eq!(hits, 1, "id {id} must fall in exactly one band");
        }
    }

    #[test]
    fn test_out_of_range_has_no_band() {
        assert!(generation_of(0).is_none());
        assert!(generation_of(899).is_none());
        assert_eq!(entry(0).generation_id(), 0);
    }

    #[test]
    fn test_generation_by_id() {
        assert_eq!(generation_by_id(3).map(|g| g.region), Some("Hoenn"));
        assert!(generation_by_id(0).is_none());
        assert!(generation_by_id(9).is_none());
        assert_eq!(GENERATIONS[0].range_label(), "1-151");
    }

    #[test]
    fn test_entry_labels() {
        let e = entry(122);
        assert_eq!(e.number(), "#122");
        assert_eq!(entry(7).number(), "#007");
        assert_eq!(e.display_name(), "Mr-Mime");
        assert_eq!(e.height_label(), "1.3 m");
        assert_eq!(e.weight_label(), "54.5 kg");
        assert!(e.has_type("fairy"));
        assert!(!e.has_type("fire"));
    }

    #[test]
    fn test_normalize_flavor_text() {
        assert_eq!(
            normalize_flavor_text("A strange seed was\nplanted on its\u{c}back at birth."),
            "A strange seed was planted on its back at birth."
        );
        assert_eq!(normalize_flavor_text("tab\there"), "tab here");
        assert_eq!(normalize_flavor_text(""), "");
    }

    #[test]
    fn test_stat_total() {
        let detail = EntryDetail {
            entry: entry(1),
            stats: vec![
                Stat { name: "hp".into(), value: 45 },
                Stat { name: "attack".into(), value: 255 },
            ],
            abilities: vec![],
            description: NO_DESCRIPTION.into(),
        };
        assert_eq!(detail.stat_total(), 300);
    }
}
