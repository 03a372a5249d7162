use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ClothingItem;

/// Kind of outfit a candidate represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutfitType {
    /// Dress with matching shoes and accessories
    DressOutfit,
    /// Top and bottom with optional shoes and accessory
    TopBottomOutfit,
    /// Dress only (older clients)
    Dress,
    /// Top and bottom only (older clients)
    TopBottom,
}

/// An outfit suggestion built for a single request
#[derive(Debug, Clone, Serialize)]
pub struct OutfitCandidate<'a> {
    pub items: Vec<&'a ClothingItem>,
    #[serde(rename = "type")]
    pub outfit_type: OutfitType,
    /// Heuristic score in `[0, 1]`
    pub confidence: f64,
    pub description: String,
    pub occasion: String,
    pub weather_suitable: bool,
}

/// An outfit the user chose to keep
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedOutfit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub item_ids: Vec<Uuid>,
    pub occasion: String,
    pub weather: String,
    pub temperature: Option<i32>,
    pub outfit_type: Option<OutfitType>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
