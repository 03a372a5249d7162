use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One of the four color seasons
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Summer,
    Autumn,
    Spring,
}

impl Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Season::Winter => "winter",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Spring => "spring",
        };
        write!(f, "{}", label)
    }
}

/// Result of a color season analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorSeasonProfile {
    pub season: Season,
    pub recommended_palette: Vec<String>,
    pub avoided_palette: Vec<String>,
    pub explanation: String,
}

/// Physical traits a season is derived from
#[derive(Debug, Clone, Deserialize)]
pub struct ColorAnalysisRequest {
    pub skin_tone: String,
    pub eye_color: String,
    pub hair_color: String,
}
