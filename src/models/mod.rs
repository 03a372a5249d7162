pub mod chat;
pub mod clothing_item;
pub mod color_season;
pub mod outfit;
pub mod shopping;

pub use chat::ChatMessage;
pub use clothing_item::{Category, ClothingItem, DEFAULT_COLOR_HEX};
pub use color_season::{ColorAnalysisRequest, ColorSeasonProfile, Season};
pub use outfit::{OutfitCandidate, OutfitType, SavedOutfit};
pub use shopping::{Priority, Recommendation};
