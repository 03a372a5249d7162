use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Color used for items whose hex is unknown
pub const DEFAULT_COLOR_HEX: &str = "#808080";

/// Coarse clothing category the outfit rules reason about
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Top,
    Bottom,
    Dress,
    Outerwear,
    Shoes,
    Accessory,
}

impl Category {
    /// Maps a stored category label (or one of its aliases) to a category
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "top" | "blouse" | "shirt" | "t-shirt" => Some(Category::Top),
            "bottom" | "pants" | "skirt" | "jeans" => Some(Category::Bottom),
            "dress" => Some(Category::Dress),
            "outerwear" => Some(Category::Outerwear),
            "shoes" => Some(Category::Shoes),
            "accessory" | "accessories" => Some(Category::Accessory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::Bottom => "bottom",
            Category::Dress => "dress",
            Category::Outerwear => "outerwear",
            Category::Shoes => "shoes",
            Category::Accessory => "accessory",
        }
    }
}

/// A clothing item from a user's wardrobe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClothingItem {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    /// Stored label: top/bottom/dress/outerwear/shoes/accessory or an alias
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    /// Human color label (e.g. "white")
    pub color: String,
    /// `#RRGGBB`, falls back to [`DEFAULT_COLOR_HEX`] when absent
    #[serde(default)]
    pub color_hex: Option<String>,
    #[serde(default)]
    pub fabric: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub wear_count: u32,
    #[serde(default)]
    pub last_worn: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ClothingItem {
    /// Creates an item with only the fields the styling rules need
    pub fn new(user_id: Uuid, category: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: None,
            category: category.into(),
            subcategory: None,
            color: color.into(),
            color_hex: None,
            fabric: None,
            pattern: None,
            brand: None,
            price: None,
            tags: Vec::new(),
            image_url: None,
            wear_count: 0,
            last_worn: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_hex(mut self, hex: impl Into<String>) -> Self {
        self.color_hex = Some(hex.into());
        self
    }

    pub fn with_fabric(mut self, fabric: impl Into<String>) -> Self {
        self.fabric = Some(fabric.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Hex color, defaulting to neutral gray
    pub fn color_hex_or_default(&self) -> &str {
        self.color_hex.as_deref().unwrap_or(DEFAULT_COLOR_HEX)
    }

    pub fn category_kind(&self) -> Option<Category> {
        Category::from_label(&self.category)
    }

    /// Lowercased fabric, if any
    pub fn fabric_lower(&self) -> Option<String> {
        self.fabric.as_ref().map(|f| f.trim().to_lowercase())
    }

    /// Label used in outfit descriptions
    pub fn display_kind(&self) -> &str {
        self.subcategory
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.category)
    }

    /// Records that the item was worn now
    pub fn mark_worn(&mut self) {
        self.wear_count += 1;
        self.last_worn = Some(Utc::now());
    }
}
