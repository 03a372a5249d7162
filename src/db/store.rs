use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{ChatMessage, ClothingItem, SavedOutfit},
};

/// Persistence for everything a user owns
///
/// Every query is scoped by user id; an item belonging to someone else is
/// indistinguishable from a missing one.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WardrobeStore: Send + Sync {
    async fn insert_item(&self, item: ClothingItem) -> AppResult<ClothingItem>;

    /// Items newest first, optionally restricted to one stored category label
    async fn list_items(
        &self,
        user_id: Uuid,
        category: Option<String>,
    ) -> AppResult<Vec<ClothingItem>>;

    /// Removes and returns the item, `None` when the user has no such item
    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Option<ClothingItem>>;

    /// Bumps the wear counter and returns the updated item
    async fn record_wear(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Option<ClothingItem>>;

    async fn save_outfit(&self, outfit: SavedOutfit) -> AppResult<SavedOutfit>;

    /// Saved outfits newest first
    async fn list_outfits(&self, user_id: Uuid) -> AppResult<Vec<SavedOutfit>>;

    /// Stores the messages in order; either all of them are kept or none
    async fn append_chat(&self, messages: Vec<ChatMessage>) -> AppResult<()>;

    /// Chat history oldest first
    async fn list_chat(&self, user_id: Uuid) -> AppResult<Vec<ChatMessage>>;
}
