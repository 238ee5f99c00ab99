//! Game mode catalog
//!
//! Static table of tuning profiles, one per mode. Lookups never fail:
//! anything unrecognized resolves to the first row.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Selectable game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameMode {
    Kids,
    Elderly,
    LegFree,
    HandFree,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Kids => "kids",
            GameMode::Elderly => "elderly",
            GameMode::LegFree => "leg-free",
            GameMode::HandFree => "hand-free",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "kids" => Some(GameMode::Kids),
            "elderly" => Some(GameMode::Elderly),
            "leg-free" | "legfree" => Some(GameMode::LegFree),
            "hand-free" | "handfree" => Some(GameMode::HandFree),
            _ => None,
        }
    }
}

/// Tuning parameters and card metadata for one mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeProfile {
    pub mode: GameMode,
    pub display_name: &'static str,
    pub card_subtitle: &'static str,
    pub card_detail: &'static str,
    /// RGBA, linear 0-1
    pub theme_color: Vec4,
    /// Scales the base run speed (road, orbs, passive score)
    pub run_speed_multiplier: f32,
    /// Lane responsiveness and lane-switch intensity gain
    pub input_sensitivity: f32,
    /// Intensity lost per second
    pub intensity_decay_rate: f32,
    pub calorie_multiplier: f32,
    pub difficulty: f32,
}

static CATALOG: [ModeProfile; 4] = [
    ModeProfile {
        mode: GameMode::Kids,
        display_name: "Kids",
        card_subtitle: "Fun energetic pose icon",
        card_detail: "High engagement rating",
        theme_color: Vec4::new(0.20, 0.95, 0.40, 1.0),
        run_speed_multiplier: 1.15,
        input_sensitivity: 1.20,
        intensity_decay_rate: 0.11,
        calorie_multiplier: 1.08,
        difficulty: 0.72,
    },
    ModeProfile {
        mode: GameMode::Elderly,
        display_name: "Elderly",
        card_subtitle: "Yoga pose icon",
        card_detail: "Medium intensity",
        theme_color: Vec4::new(0.20, 0.70, 1.00, 1.0),
        run_speed_multiplier: 0.92,
        input_sensitivity: 0.88,
        intensity_decay_rate: 0.15,
        calorie_multiplier: 0.82,
        difficulty: 0.42,
    },
    ModeProfile {
        mode: GameMode::LegFree,
        display_name: "Leg-Free",
        card_subtitle: "Wheelchair icon",
        card_detail: "Upper-body control | Moderate difficulty",
        theme_color: Vec4::new(0.15, 0.90, 1.00, 1.0),
        run_speed_multiplier: 1.00,
        input_sensitivity: 1.02,
        intensity_decay_rate: 0.13,
        calorie_multiplier: 0.96,
        difficulty: 0.55,
    },
    ModeProfile {
        mode: GameMode::HandFree,
        display_name: "Hand-Free",
        card_subtitle: "Pose-only control",
        card_detail: "Red theme | Low sensitivity",
        theme_color: Vec4::new(1.00, 0.28, 0.42, 1.0),
        run_speed_multiplier: 0.96,
        input_sensitivity: 0.74,
        intensity_decay_rate: 0.16,
        calorie_multiplier: 0.90,
        difficulty: 0.48,
    },
];

/// All profiles in display order
pub fn all() -> &'static [ModeProfile] {
    &CATALOG
}

/// Profile for a mode (first row if the catalog has no entry for it)
pub fn get(mode: GameMode) -> &'static ModeProfile {
    CATALOG.iter().find(|p| p.mode == mode).unwrap_or(&CATALOG[0])
}

/// Profile at a card index (first row when out of range)
pub fn by_index(index: usize) -> &'static ModeProfile {
    CATALOG.get(index).unwrap_or(&CATALOG[0])
}

/// Profile for a mode name (first row when the name is unknown)
pub fn by_name(name: &str) -> &'static ModeProfile {
    match GameMode::from_str(name) {
        Some(mode) => get(mode),
        None => {
            log::warn!("Unknown mode '{}', falling back to {}", name, CATALOG[0].display_name);
            &CATALOG[0]
        }
    }
}

/// Catalog index of a mode
pub fn index_of(mode: GameMode) -> usize {
    CATALOG.iter().position(|p| p.mode == mode).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_is_stable() {
        let modes: Vec<GameMode> = all().iter().map(|p| p.mode).collect();
        assert_eq!(
            modes,
            vec![GameMode::Kids, GameMode::Elderly, GameMode::LegFree, GameMode::HandFree]
        );
        for (i, profile) in all().iter().enumerate() {
            assert_eq!(by_index(i).mode, profile.mode);
            assert_eq!(index_of(profile.mode), i);
        }
    }

    #[test]
    fn test_lookup_fallbacks() {
        assert_eq!(by_index(42).mode, GameMode::Kids);
        assert_eq!(by_name("marathon").mode, GameMode::Kids);
        assert_eq!(by_name("Hand-Free").mode, GameMode::HandFree);
        assert_eq!(get(GameMode::Elderly).run_speed_multiplier, 0.92);
    }
}
