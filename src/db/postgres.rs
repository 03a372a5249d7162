use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{ChatMessage, ClothingItem, OutfitType, SavedOutfit},
};

use super::WardrobeStore;

/// Creates a PostgreSQL connection pool and applies pending migrations
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    user_id: Uuid,
    name: Option<String>,
    category: String,
    subcategory: Option<String>,
    color: String,
    color_hex: Option<String>,
    fabric: Option<String>,
    pattern: Option<String>,
    brand: Option<String>,
    price: Option<f64>,
    tags: Vec<String>,
    image_url: Option<String>,
    wear_count: i32,
    last_worn: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<ItemRow> for ClothingItem {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            category: row.category,
            subcategory: row.subcategory,
            color: row.color,
            color_hex: row.color_hex,
            fabric: row.fabric,
            pattern: row.pattern,
            brand: row.brand,
            price: row.price,
            tags: row.tags,
            image_url: row.image_url,
            wear_count: row.wear_count.max(0) as u32,
            last_worn: row.last_worn,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OutfitRow {
    id: Uuid,
    user_id: Uuid,
    name: Option<String>,
    item_ids: Vec<Uuid>,
    occasion: String,
    weather: String,
    temperature: Option<i32>,
    outfit_type: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<OutfitRow> for SavedOutfit {
    fn from(row: OutfitRow) -> Self {
        let outfit_type = row
            .outfit_type
            .and_then(|t| serde_json::from_value::<OutfitType>(serde_json::Value::String(t)).ok());

        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            item_ids: row.item_ids,
            occasion: row.occasion,
            weather: row.weather,
            temperature: row.temperature,
            outfit_type,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ChatRow {
    id: Uuid,
    user_id: Uuid,
    content: String,
    is_user: bool,
    message_type: String,
    ai_response: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl From<ChatRow> for ChatMessage {
    fn from(row: ChatRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            content: row.content,
            is_user: row.is_user,
            message_type: row.message_type,
            ai_response: row.ai_response,
            created_at: row.created_at,
        }
    }
}

const ITEM_COLUMNS: &str = "id, user_id, name, category, subcategory, color, color_hex, fabric, \
     pattern, brand, price, tags, image_url, wear_count, last_worn, created_at";

/// Store backed by PostgreSQL
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn outfit_type_label(outfit_type: Option<OutfitType>) -> AppResult<Option<String>> {
    outfit_type
        .map(|t| match serde_json::to_value(t) {
            Ok(serde_json::Value::String(label)) => Ok(label),
            _ => Err(AppError::Internal("Unserializable outfit type".to_string())),
        })
        .transpose()
}

#[async_trait::async_trait]
impl WardrobeStore for PostgresStore {
    async fn insert_item(&self, item: ClothingItem) -> AppResult<ClothingItem> {
        let row: ItemRow = sqlx::query_as(&format!(
            "INSERT INTO clothing_items ({ITEM_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(item.id)
        .bind(item.user_id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.subcategory)
        .bind(&item.color)
        .bind(&item.color_hex)
        .bind(&item.fabric)
        .bind(&item.pattern)
        .bind(&item.brand)
        .bind(item.price)
        .bind(&item.tags)
        .bind(&item.image_url)
        .bind(item.wear_count as i32)
        .bind(item.last_worn)
        .bind(item.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_items(
        &self,
        user_id: Uuid,
        category: Option<String>,
    ) -> AppResult<Vec<ClothingItem>> {
        let rows: Vec<ItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM clothing_items \
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR category = $2) \
             ORDER BY created_at DESC, id"
        ))
        .bind(user_id)
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Option<ClothingItem>> {
        let row: Option<ItemRow> = sqlx::query_as(&format!(
            "DELETE FROM clothing_items WHERE id = $1 AND user_id = $2 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn record_wear(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Option<ClothingItem>> {
        let row: Option<ItemRow> = sqlx::query_as(&format!(
            "UPDATE clothing_items SET wear_count = wear_count + 1, last_worn = NOW() \
             WHERE id = $1 AND user_id = $2 RETURNING {ITEM_COLUMNS}"
        ))
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn save_outfit(&self, outfit: SavedOutfit) -> AppResult<SavedOutfit> {
        let row: OutfitRow = sqlx::query_as(
            "INSERT INTO outfits \
             (id, user_id, name, item_ids, occasion, weather, temperature, outfit_type, notes, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING id, user_id, name, item_ids, occasion, weather, temperature, outfit_type, notes, created_at",
        )
        .bind(outfit.id)
        .bind(outfit.user_id)
        .bind(&outfit.name)
        .bind(&outfit.item_ids)
        .bind(&outfit.occasion)
        .bind(&outfit.weather)
        .bind(outfit.temperature)
        .bind(outfit_type_label(outfit.outfit_type)?)
        .bind(&outfit.notes)
        .bind(outfit.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_outfits(&self, user_id: Uuid) -> AppResult<Vec<SavedOutfit>> {
        let rows: Vec<OutfitRow> = sqlx::query_as(
            "SELECT id, user_id, name, item_ids, occasion, weather, temperature, outfit_type, notes, created_at \
             FROM outfits WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn append_chat(&self, messages: Vec<ChatMessage>) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for message in &messages {
            sqlx::query(
                "INSERT INTO chat_messages (id, user_id, content, is_user, message_type, ai_response, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(message.id)
            .bind(message.user_id)
            .bind(&message.content)
            .bind(message.is_user)
            .bind(&message.message_type)
            .bind(&message.ai_response)
            .bind(message.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_chat(&self, user_id: Uuid) -> AppResult<Vec<ChatMessage>> {
        let rows: Vec<ChatRow> = sqlx::query_as(
            "SELECT id, user_id, content, is_user, message_type, ai_response, created_at \
             FROM chat_messages WHERE user_id = $1 ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
