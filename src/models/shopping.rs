use serde::{Deserialize, Serialize};

/// How urgently a missing basic should be bought
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Nothing in the archetype's category is owned
    Alta,
    /// The category is owned, only in other colors
    Media,
}

/// A suggested purchase filling a wardrobe gap
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub item: String,
    pub category: String,
    pub color: String,
    pub color_hex: String,
    pub priority: Priority,
    pub reason: String,
    pub estimated_new_outfits: usize,
}
