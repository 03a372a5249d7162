use std::collections::{BTreeMap, HashSet};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{
    ChatMessage, ClothingItem, ColorAnalysisRequest, ColorSeasonProfile,
    OutfitCandidate, OutfitType, Recommendation, SavedOutfit,
};
use crate::services::{compatible, parse_hex, Classification, Compatibility, OutfitContext};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub color: String,
    pub color_hex: Option<String>,
    pub fabric: Option<String>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub item: ClothingItem,
    pub analysis: Classification,
}

#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DailyOutfitsQuery {
    #[serde(default = "default_weather")]
    pub weather: String,
    #[serde(default = "default_occasion")]
    pub occasion: String,
    #[serde(default = "default_temperature")]
    pub temperature: i32,
    pub limit: Option<usize>,
}

fn default_weather() -> String {
    "moderate".to_string()
}

fn default_occasion() -> String {
    "casual".to_string()
}

fn default_temperature() -> i32 {
    24
}

/// Owned copy of an [`OutfitCandidate`] for the response body
#[derive(Debug, Serialize)]
pub struct OutfitSuggestion {
    pub items: Vec<ClothingItem>,
    #[serde(rename = "type")]
    pub outfit_type: OutfitType,
    pub confidence: f64,
    pub description: String,
    pub occasion: String,
    pub weather_suitable: bool,
}

impl From<OutfitCandidate<'_>> for OutfitSuggestion {
    fn from(candidate: OutfitCandidate<'_>) -> Self {
        Self {
            items: candidate.items.into_iter().cloned().collect(),
            outfit_type: candidate.outfit_type,
            confidence: candidate.confidence,
            description: candidate.description,
            occasion: candidate.occasion,
            weather_suitable: candidate.weather_suitable,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DailyOutfitsResponse {
    pub outfits: Vec<OutfitSuggestion>,
    pub weather: String,
    pub occasion: String,
    pub temperature: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveOutfitRequest {
    pub name: Option<String>,
    pub item_ids: Vec<Uuid>,
    #[serde(default = "default_occasion")]
    pub occasion: String,
    #[serde(default = "default_weather")]
    pub weather: String,
    pub temperature: Option<i32>,
    pub outfit_type: Option<OutfitType>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ColorAnalysisResponse {
    pub analysis: ColorSeasonProfile,
    pub user_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CompatibilityRequest {
    pub color_a: String,
    pub color_b: String,
}

#[derive(Debug, Serialize)]
pub struct ShoppingResponse {
    pub recommendations: Vec<Recommendation>,
    pub total_items: usize,
    pub analysis_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub content: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
}

fn default_message_type() -> String {
    "text".to_string()
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub user_message: ChatMessage,
    pub ai_response: ChatMessage,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_items: usize,
    pub categories: BTreeMap<String, usize>,
    pub saved_outfits: usize,
    pub chat_messages: usize,
    pub total_value: f64,
}

/// Text fields accepted alongside the photo in an upload
#[derive(Debug, Default)]
struct UploadFields {
    file: Option<(Option<String>, Vec<u8>)>,
    category: Option<String>,
    subcategory: Option<String>,
    color: Option<String>,
    fabric: Option<String>,
    brand: Option<String>,
    price: Option<f64>,
    tags: Vec<String>,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

async fn read_upload(mut multipart: Multipart) -> AppResult<UploadFields> {
    let mut fields = UploadFields::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                fields.file = Some((content_type, bytes.to_vec()));
            }
            "category" => fields.category = non_empty(field.text().await?),
            "subcategory" => fields.subcategory = non_empty(field.text().await?),
            "color" => fields.color = non_empty(field.text().await?),
            "fabric" => fields.fabric = non_empty(field.text().await?),
            "brand" => fields.brand = non_empty(field.text().await?),
            "price" => {
                fields.price = match non_empty(field.text().await?) {
                    Some(price) => Some(price.parse().map_err(|_| {
                        AppError::InvalidInput(format!("Invalid price: {}", price))
                    })?),
                    None => None,
                }
            }
            "tags" => {
                fields.tags = field
                    .text()
                    .await?
                    .split(',')
                    .filter_map(|tag| non_empty(tag.to_string()))
                    .collect()
            }
            other => tracing::debug!(field = %other, "Ignoring unknown upload field"),
        }
    }

    Ok(fields)
}

async fn load_wardrobe(state: &AppState, user_id: Uuid) -> AppResult<Vec<ClothingItem>> {
    state.store.list_items(user_id, None).await
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Upload a photo, analyse it and add the item to the closet
pub async fn upload_item(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let fields = read_upload(multipart).await?;
    let (content_type, bytes) = fields
        .file
        .ok_or_else(|| AppError::InvalidInput("Missing 'file' field".to_string()))?;

    let extension = state.uploads.validate(content_type.as_deref(), bytes.len())?;

    tracing::info!(user_id = %user_id, size = bytes.len(), "Processing clothing upload");

    let engine = state.engine.clone();
    let (analysis, bytes) = tokio::task::spawn_blocking(move || {
        let analysis = engine.classifier.classify_bytes(&bytes);
        (analysis, bytes)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut item = ClothingItem::new(
        user_id,
        fields.category.unwrap_or_else(|| analysis.category.clone()),
        fields.color.unwrap_or_else(|| analysis.color_hex.clone()),
    );
    item.subcategory = fields.subcategory.or_else(|| Some(analysis.subcategory.clone()));
    item.color_hex = Some(analysis.color_hex.clone());
    item.pattern = analysis.pattern.clone();
    item.fabric = fields.fabric;
    item.brand = fields.brand;
    item.price = fields.price;
    item.tags = fields.tags;
    let image_url = state.uploads.save(item.id, extension, &bytes).await?;
    item.image_url = Some(image_url.clone());

    let item = match state.store.insert_item(item).await {
        Ok(item) => item,
        Err(e) => {
            if let Err(cleanup) = state.uploads.remove(&image_url).await {
                tracing::warn!(error = %cleanup, url = %image_url, "Failed to remove orphaned upload");
            }
            return Err(e);
        }
    };

    tracing::info!(
        user_id = %user_id,
        item_id = %item.id,
        category = %item.category,
        color = %item.color_hex_or_default(),
        "Clothing item added"
    );

    Ok((StatusCode::CREATED, Json(UploadResponse { item, analysis })))
}

/// Add an item without a photo
pub async fn create_item(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ClothingItem>)> {
    if request.category.trim().is_empty() {
        return Err(AppError::InvalidInput("Category is required".to_string()));
    }
    let color_hex = request.color_hex.map(|hex| hex.trim().to_string());
    if let Some(hex) = color_hex.as_deref() {
        if !hex.starts_with('#') || parse_hex(hex).is_err() {
            return Err(AppError::InvalidInput(format!(
                "color_hex must look like #RRGGBB, got '{}'",
                hex
            )));
        }
    }

    let mut item = ClothingItem::new(user_id, request.category, request.color);
    item.name = request.name;
    item.subcategory = request.subcategory;
    item.color_hex = color_hex;
    item.fabric = request.fabric;
    item.brand = request.brand;
    item.price = request.price;
    item.tags = request.tags;

    let item = state.store.insert_item(item).await?;
    tracing::info!(user_id = %user_id, item_id = %item.id, "Clothing item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// List the caller's closet, newest first
pub async fn list_items(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<ListItemsQuery>,
) -> AppResult<Json<Vec<ClothingItem>>> {
    let items = state.store.list_items(user_id, query.category).await?;
    Ok(Json(items))
}

/// Remove an item and its photo
pub async fn delete_item(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    let item = state
        .store
        .delete_item(user_id, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))?;

    if let Some(url) = item.image_url.as_deref() {
        if let Err(e) = state.uploads.remove(url).await {
            tracing::warn!(error = %e, item_id = %item_id, "Failed to remove item photo");
        }
    }

    tracing::info!(user_id = %user_id, item_id = %item_id, "Clothing item removed");

    Ok(Json(MessageResponse {
        message: "Item removed".to_string(),
    }))
}

/// Record that an item was worn today
pub async fn record_wear(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ClothingItem>> {
    let item = state
        .store
        .record_wear(user_id, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))?;
    Ok(Json(item))
}

/// Suggest today's outfits from the caller's wardrobe
pub async fn daily_outfits(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<DailyOutfitsQuery>,
) -> AppResult<Json<DailyOutfitsResponse>> {
    let wardrobe = load_wardrobe(&state, user_id).await?;

    tracing::info!(
        user_id = %user_id,
        item_count = wardrobe.len(),
        weather = %query.weather,
        occasion = %query.occasion,
        temperature = query.temperature,
        "Composing daily outfits"
    );

    let context = OutfitContext {
        weather: query.weather,
        occasion: query.occasion,
        temperature: query.temperature,
        limit: query.limit.unwrap_or(state.outfit_limit),
    };

    let outfits: Vec<OutfitSuggestion> = state
        .engine
        .composer
        .compose(&wardrobe, &context)
        .into_iter()
        .map(OutfitSuggestion::from)
        .collect();

    let message = if wardrobe.is_empty() {
        Some("Add pieces to your closet first".to_string())
    } else if outfits.is_empty() {
        Some("No combinations found; add more items to get suggestions".to_string())
    } else {
        None
    };

    Ok(Json(DailyOutfitsResponse {
        outfits,
        weather: context.weather,
        occasion: context.occasion,
        temperature: context.temperature,
        message,
    }))
}

/// Keep an outfit
pub async fn save_outfit(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<SaveOutfitRequest>,
) -> AppResult<(StatusCode, Json<SavedOutfit>)> {
    if request.item_ids.is_empty() {
        return Err(AppError::InvalidInput(
            "An outfit needs at least one item".to_string(),
        ));
    }

    let owned: HashSet<Uuid> = load_wardrobe(&state, user_id)
        .await?
        .into_iter()
        .map(|item| item.id)
        .collect();
    if let Some(unknown) = request.item_ids.iter().find(|id| !owned.contains(id)) {
        return Err(AppError::InvalidInput(format!("Unknown item {}", unknown)));
    }

    let outfit = SavedOutfit {
        id: Uuid::new_v4(),
        user_id,
        name: request.name,
        item_ids: request.item_ids,
        occasion: request.occasion,
        weather: request.weather,
        temperature: request.temperature,
        outfit_type: request.outfit_type,
        notes: request.notes,
        created_at: Utc::now(),
    };

    let outfit = state.store.save_outfit(outfit).await?;
    tracing::info!(user_id = %user_id, outfit_id = %outfit.id, "Outfit saved");

    Ok((StatusCode::CREATED, Json(outfit)))
}

/// List saved outfits
pub async fn list_outfits(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<SavedOutfit>>> {
    Ok(Json(state.store.list_outfits(user_id).await?))
}

/// Work out the caller's color season
pub async fn analyze_colors(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<ColorAnalysisRequest>,
) -> Json<ColorAnalysisResponse> {
    let analysis = state.engine.seasons.analyze(
        &request.skin_tone,
        &request.eye_color,
        &request.hair_color,
    );

    tracing::info!(user_id = %user_id, season = %analysis.season, "Color season analysed");

    Json(ColorAnalysisResponse {
        analysis,
        user_id,
        analyzed_at: Utc::now(),
    })
}

/// Score two colors against each other
pub async fn color_compatibility(
    Json(request): Json<CompatibilityRequest>,
) -> AppResult<Json<Compatibility>> {
    Ok(Json(compatible(&request.color_a, &request.color_b)?))
}

/// Basics missing from the caller's wardrobe
pub async fn shopping_recommendations(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<ShoppingResponse>> {
    let wardrobe = load_wardrobe(&state, user_id).await?;
    let recommendations = state.engine.gaps.analyze(&wardrobe);

    tracing::info!(
        user_id = %user_id,
        item_count = wardrobe.len(),
        missing = recommendations.len(),
        "Shopping recommendations generated"
    );

    Ok(Json(ShoppingResponse {
        recommendations,
        total_items: wardrobe.len(),
        analysis_date: Utc::now(),
    }))
}

/// Send a message to the stylist
pub async fn send_chat_message(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let content = non_empty(request.content)
        .ok_or_else(|| AppError::InvalidInput("Message cannot be empty".to_string()))?;

    let user_message = ChatMessage::from_user(user_id, content, request.message_type);
    let ai_response = ChatMessage::from_stylist(
        user_id,
        "Hi! I'm your virtual stylist. How can I help you today?".to_string(),
        json!({
            "type": "greeting",
            "options": ["build_outfit", "match_pieces", "analyze_wardrobe", "style_tips"]
        }),
    );
    state
        .store
        .append_chat(vec![user_message.clone(), ai_response.clone()])
        .await?;

    Ok(Json(ChatResponse {
        user_message,
        ai_response,
    }))
}

/// Chat history, oldest first
pub async fn chat_history(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<ChatMessage>>> {
    Ok(Json(state.store.list_chat(user_id).await?))
}

/// Wardrobe totals for the dashboard
pub async fn user_stats(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<StatsResponse>> {
    let items = load_wardrobe(&state, user_id).await?;
    let saved_outfits = state.store.list_outfits(user_id).await?.len();
    let chat_messages = state.store.list_chat(user_id).await?.len();

    let mut categories = BTreeMap::new();
    for item in &items {
        *categories.entry(item.category.clone()).or_insert(0) += 1;
    }

    Ok(Json(StatsResponse {
        total_items: items.len(),
        categories,
        saved_outfits,
        chat_messages,
        total_value: items.iter().filter_map(|item| item.price).sum(),
    }))
}
