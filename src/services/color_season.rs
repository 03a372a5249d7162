use std::sync::Arc;

use crate::models::{ColorSeasonProfile, Season};

use super::style_tables::StyleTables;

/// Assigns a color season from skin tone, eye and hair color
///
/// Inputs are free text; anything unrecognised falls through to the
/// catch-all branch of each rule, so there is no error path.
#[derive(Debug, Clone)]
pub struct ColorSeasonAnalyzer {
    tables: Arc<StyleTables>,
}

impl ColorSeasonAnalyzer {
    pub fn new(tables: Arc<StyleTables>) -> Self {
        Self { tables }
    }

    pub fn analyze(&self, skin_tone: &str, eye_color: &str, hair_color: &str) -> ColorSeasonProfile {
        let season = season_for(skin_tone, eye_color, hair_color);
        tracing::debug!(%season, skin_tone, eye_color, hair_color, "Assigned color season");

        match self.tables.seasons.get(&season) {
            Some(palette) => ColorSeasonProfile {
                season,
                recommended_palette: palette.recommended.clone(),
                avoided_palette: palette.avoided.clone(),
                explanation: palette.explanation.clone(),
            },
            None => ColorSeasonProfile {
                season,
                recommended_palette: Vec::new(),
                avoided_palette: Vec::new(),
                explanation: format!("No palette configured for {}", season),
            },
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// The decision table behind [`ColorSeasonAnalyzer::analyze`]
pub fn season_for(skin_tone: &str, eye_color: &str, hair_color: &str) -> Season {
    match normalize(skin_tone).as_str() {
        "fair" | "light" => match normalize(hair_color).as_str() {
            "blonde" | "light brown" => Season::Spring,
            _ => Season::Summer,
        },
        "medium" | "olive" => match normalize(eye_color).as_str() {
            "brown" | "hazel" => Season::Autumn,
            _ => Season::Spring,
        },
        _ => Season::Winter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> ColorSeasonAnalyzer {
        ColorSeasonAnalyzer::new(Arc::new(StyleTables::default()))
    }

    #[test]
    fn test_fair_blonde_is_spring() {
        let profile = analyzer().analyze("fair", "blue", "blonde");
        assert_eq!(profile.season, Season::Spring);
        assert_eq!(profile.recommended_palette[1], "#FFD700");
    }

    #[test]
    fn test_light_dark_hair_is_summer() {
        assert_eq!(season_for("light", "blue", "black"), Season::Summer);
        assert_eq!(season_for("Light", "blue", "Light Brown"), Season::Spring);
    }

    #[test]
    fn test_medium_and_olive() {
        assert_eq!(season_for("medium", "brown", "black"), Season::Autumn);
        assert_eq!(season_for("olive", "hazel", "red"), Season::Autumn);
        assert_eq!(season_for("olive", "green", "red"), Season::Spring);
    }

    #[test]
    fn test_unrecognised_skin_tone_is_winter() {
        let profile = analyzer().analyze("dark", "brown", "black");
        assert_eq!(profile.season, Season::Winter);
        assert_eq!(profile.recommended_palette[0], "#FFFFFF");
        assert!(!profile.avoided_palette.is_empty());

        assert_eq!(season_for("", "", ""), Season::Winter);
    }

    #[test]
    fn test_alternate_tables_are_used() {
        let mut tables = StyleTables::default();
        tables.seasons.remove(&Season::Winter);
        let profile = ColorSeasonAnalyzer::new(Arc::new(tables)).analyze("dark", "", "");
        assert!(profile.recommended_palette.is_empty());
    }
}
