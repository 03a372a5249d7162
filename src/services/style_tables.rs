use std::collections::{HashMap, HashSet};

use crate::models::{Category, Season};

/// Palettes and explanation for one color season
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonPalette {
    pub recommended: Vec<String>,
    pub avoided: Vec<String>,
    pub explanation: String,
}

/// Garment requirements for a weather condition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherRule {
    /// At least one item must use one of these fabrics
    pub fabrics: HashSet<String>,
    /// At least one item must be in one of these categories
    pub categories: HashSet<String>,
}

/// A reference item every wardrobe is expected to own
#[derive(Debug, Clone, PartialEq)]
pub struct Archetype {
    pub item: String,
    pub category: Category,
    /// Coarse color label compared verbatim against stored items
    pub color: String,
    pub color_hex: String,
}

/// Read-only reference data the styling components consult
#[derive(Debug, Clone)]
pub struct StyleTables {
    pub seasons: HashMap<Season, SeasonPalette>,
    /// Occasion -> tags, subcategories or categories suited to it
    pub occasions: HashMap<String, HashSet<String>>,
    pub rainy: WeatherRule,
    pub cold: WeatherRule,
    pub hot: WeatherRule,
    /// Below this temperature (°C) the cold rule applies
    pub cold_below: i32,
    /// Above this temperature (°C) the hot rule applies
    pub hot_above: i32,
    pub basics: Vec<Archetype>,
}

fn set(values: &[&str]) -> HashSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn hexes(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for StyleTables {
    fn default() -> Self {
        let seasons = HashMap::from([
            (
                Season::Winter,
                SeasonPalette {
                    recommended: hexes(&["#FFFFFF", "#000000", "#4169E1", "#8B0000", "#800080"]),
                    avoided: hexes(&["#D2691E", "#FF8C00", "#8B7355"]),
                    explanation: "High contrast and cool undertones: pure white, black and \
                                  saturated jewel tones frame your features best."
                        .to_string(),
                },
            ),
            (
                Season::Summer,
                SeasonPalette {
                    recommended: hexes(&["#F0F8FF", "#ADD8E6", "#FFB6C1", "#98FB98", "#DDA0DD"]),
                    avoided: hexes(&["#FF8C00", "#000000", "#FFD700"]),
                    explanation: "Soft, cool and light: powdery pastels harmonise with your \
                                  delicate coloring while harsh black overpowers it."
                        .to_string(),
                },
            ),
            (
                Season::Autumn,
                SeasonPalette {
                    recommended: hexes(&["#8B4513", "#D2691E", "#FF8C00", "#556B2F", "#8B7355"]),
                    avoided: hexes(&["#FF69B4", "#4169E1", "#F0F8FF"]),
                    explanation: "Warm and earthy: rich browns, olive and burnt orange echo \
                                  the golden undertones of your skin."
                        .to_string(),
                },
            ),
            (
                Season::Spring,
                SeasonPalette {
                    recommended: hexes(&["#FFE4B5", "#FFD700", "#98FB98", "#87CEEB", "#FF69B4"]),
                    avoided: hexes(&["#000000", "#800080", "#556B2F"]),
                    explanation: "Warm and bright: clear, sunny colors bring out your light \
                                  features while heavy dark shades dull them."
                        .to_string(),
                },
            ),
        ]);

        let occasions = HashMap::from([
            (
                "casual".to_string(),
                set(&["casual", "t-shirt", "jeans", "sneakers", "hoodie", "top", "bottom"]),
            ),
            (
                "work".to_string(),
                set(&["work", "blouse", "shirt", "dress_pants", "pants", "blazer", "dress_shoes"]),
            ),
            (
                "formal".to_string(),
                set(&["formal", "dress", "suit", "heels", "tie", "blazer"]),
            ),
            (
                "sport".to_string(),
                set(&["sport", "leggings", "tank_top", "sports_shoes"]),
            ),
        ]);

        let basics = vec![
            Archetype {
                item: "White shirt".to_string(),
                category: Category::Top,
                color: "white".to_string(),
                color_hex: "#FFFFFF".to_string(),
            },
            Archetype {
                item: "Black pants".to_string(),
                category: Category::Bottom,
                color: "black".to_string(),
                color_hex: "#000000".to_string(),
            },
            Archetype {
                item: "Blue jeans".to_string(),
                category: Category::Bottom,
                color: "blue".to_string(),
                color_hex: "#1560BD".to_string(),
            },
            Archetype {
                item: "Black dress".to_string(),
                category: Category::Dress,
                color: "black".to_string(),
                color_hex: "#000000".to_string(),
            },
            Archetype {
                item: "Neutral blazer".to_string(),
                category: Category::Outerwear,
                color: "beige".to_string(),
                color_hex: "#D8C3A5".to_string(),
            },
        ];

        Self {
            seasons,
            occasions,
            rainy: WeatherRule {
                fabrics: set(&["nylon", "polyester", "waterproof"]),
                categories: HashSet::new(),
            },
            cold: WeatherRule {
                fabrics: HashSet::new(),
                categories: set(&["outerwear", "sweater"]),
            },
            hot: WeatherRule {
                fabrics: set(&["cotton", "linen", "silk"]),
                categories: HashSet::new(),
            },
            cold_below: 15,
            hot_above: 28,
            basics,
        }
    }
}

/// Caps and thresholds applied while composing outfits
///
/// The per-category caps bound the search on large wardrobes; valid
/// combinations past them are not considered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposerLimits {
    pub max_dresses: usize,
    pub max_tops: usize,
    pub max_bottoms: usize,
    pub max_dress_accessories: usize,
    /// A top/bottom pair must score strictly above this
    pub pair_threshold: f64,
    /// Shoes and accessories must score at least this
    pub match_threshold: f64,
    /// Fixed confidence of dress outfits
    pub dress_confidence: f64,
}

impl Default for ComposerLimits {
    fn default() -> Self {
        Self {
            max_dresses: 2,
            max_tops: 3,
            max_bottoms: 3,
            max_dress_accessories: 2,
            pair_threshold: 0.7,
            match_threshold: 0.7,
            dress_confidence: 0.85,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_season_has_palettes() {
        let tables = StyleTables::default();
        for season in [Season::Winter, Season::Summer, Season::Autumn, Season::Spring] {
            let palette = &tables.seasons[&season];
            assert_eq!(palette.recommended.len(), 5);
            assert!(!palette.avoided.is_empty());
        }
    }

    #[test]
    fn test_basics_checklist_has_five_archetypes() {
        let tables = StyleTables::default();
        assert_eq!(tables.basics.len(), 5);
    }
}
