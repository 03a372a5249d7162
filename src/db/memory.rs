use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{ChatMessage, ClothingItem, SavedOutfit},
};

use super::WardrobeStore;

#[derive(Default)]
struct MemoryInner {
    items: HashMap<Uuid, ClothingItem>,
    outfits: Vec<SavedOutfit>,
    chat: Vec<ChatMessage>,
}

/// Process-local store, used when no database is configured and in tests
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl WardrobeStore for MemoryStore {
    async fn insert_item(&self, item: ClothingItem) -> AppResult<ClothingItem> {
        let mut inner = self.inner.write().await;
        inner.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn list_items(
        &self,
        user_id: Uuid,
        category: Option<String>,
    ) -> AppResult<Vec<ClothingItem>> {
        let inner = self.inner.read().await;
        let mut items: Vec<ClothingItem> = inner
            .items
            .values()
            .filter(|item| item.user_id == user_id)
            .filter(|item| category.as_ref().map_or(true, |c| &item.category == c))
            .cloned()
            .collect();

        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Option<ClothingItem>> {
        let mut inner = self.inner.write().await;
        match inner.items.get(&item_id) {
            Some(item) if item.user_id == user_id => Ok(inner.items.remove(&item_id)),
            _ => Ok(None),
        }
    }

    async fn record_wear(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Option<ClothingItem>> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .items
            .get_mut(&item_id)
            .filter(|item| item.user_id == user_id)
            .map(|item| {
                item.mark_worn();
                item.clone()
            }))
    }

    async fn save_outfit(&self, outfit: SavedOutfit) -> AppResult<SavedOutfit> {
        let mut inner = self.inner.write().await;
        inner.outfits.push(outfit.clone());
        Ok(outfit)
    }

    async fn list_outfits(&self, user_id: Uuid) -> AppResult<Vec<SavedOutfit>> {
        let inner = self.inner.read().await;
        let mut outfits: Vec<SavedOutfit> = inner
            .outfits
            .iter()
            .filter(|outfit| outfit.user_id == user_id)
            .cloned()
            .collect();

        outfits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(outfits)
    }

    async fn append_chat(&self, messages: Vec<ChatMessage>) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.chat.extend(messages);
        Ok(())
    }

    async fn list_chat(&self, user_id: Uuid) -> AppResult<Vec<ChatMessage>> {
        let inner = self.inner.read().await;
        Ok(inner
            .chat
            .iter()
            .filter(|message| message.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tokio_test::block_on;

    #[test]
    fn test_items_are_scoped_by_user() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let item = block_on(store.insert_item(ClothingItem::new(alice, "top", "white"))).unwrap();
        block_on(store.insert_item(ClothingItem::new(bob, "bottom", "black"))).unwrap();

        let items = block_on(store.list_items(alice, None)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, item.id);

        assert!(block_on(store.delete_item(bob, item.id)).unwrap().is_none());
        assert!(block_on(store.delete_item(alice, item.id)).unwrap().is_some());
        assert!(block_on(store.list_items(alice, None)).unwrap().is_empty());
    }

    #[test]
    fn test_category_filter_is_exact() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        block_on(store.insert_item(ClothingItem::new(user, "top", "white"))).unwrap();
        block_on(store.insert_item(ClothingItem::new(user, "shoes", "black"))).unwrap();

        let tops = block_on(store.list_items(user, Some("top".to_string()))).unwrap();
        assert_eq!(tops.len(), 1);
        assert_eq!(tops[0].category, "top");
    }

    #[test]
    fn test_record_wear() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let item = block_on(store.insert_item(ClothingItem::new(user, "top", "white"))).unwrap();

        let worn = block_on(store.record_wear(user, item.id)).unwrap().unwrap();
        assert_eq!(worn.wear_count, 1);
        assert!(block_on(store.record_wear(Uuid::new_v4(), item.id))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_chat_history_in_order() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        for text in ["one", "two"] {
            block_on(store.append_chat(vec![ChatMessage::from_user(
                user,
                text.to_string(),
                "text".to_string(),
            )]))
            .unwrap();
        }
        block_on(store.append_chat(vec![
            ChatMessage::from_user(user, "three".to_string(), "text".to_string()),
            ChatMessage::from_stylist(user, "four".to_string(), serde_json::json!({})),
        ]))
        .unwrap();

        let history = block_on(store.list_chat(user)).unwrap();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three", "four"]);
        assert!(!history[3].is_user);
    }

    fn outfit(user_id: Uuid, name: &str, minutes_ago: i64) -> SavedOutfit {
        SavedOutfit {
            id: Uuid::new_v4(),
            user_id,
            name: Some(name.to_string()),
            item_ids: vec![Uuid::new_v4()],
            occasion: "casual".to_string(),
            weather: "moderate".to_string(),
            temperature: None,
            outfit_type: None,
            notes: None,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn test_outfits_newest_first() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        block_on(store.save_outfit(outfit(user, "older", 10))).unwrap();
        block_on(store.save_outfit(outfit(user, "newer", 1))).unwrap();
        block_on(store.save_outfit(outfit(Uuid::new_v4(), "someone else", 0))).unwrap();

        let outfits = block_on(store.list_outfits(user)).unwrap();
        let names: Vec<&str> = outfits.iter().filter_map(|o| o.name.as_deref()).collect();
        assert_eq!(names, vec!["newer", "older"]);
    }
}
