use std::sync::Arc;

use crate::models::{Category, ClothingItem, Priority, Recommendation};

use super::color_compatibility::compatibility_or_default;
use super::style_tables::{Archetype, StyleTables};

/// Maximum number of recommendations returned
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Minimum color score for an owned item to count as pairing with a basic
const PAIRING_THRESHOLD: f64 = 0.7;

/// Reports which wardrobe basics are missing
///
/// A plain set difference against the fixed checklist in [`StyleTables`]:
/// a basic is owned when some item shares its category and has exactly the
/// same color label. It does not learn or generalise beyond the checklist.
#[derive(Debug, Clone)]
pub struct ShoppingGapAnalyzer {
    tables: Arc<StyleTables>,
}

impl ShoppingGapAnalyzer {
    pub fn new(tables: Arc<StyleTables>) -> Self {
        Self { tables }
    }

    pub fn analyze(&self, wardrobe: &[ClothingItem]) -> Vec<Recommendation> {
        let recommendations: Vec<Recommendation> = self
            .tables
            .basics
            .iter()
            .filter(|basic| !owns(wardrobe, basic))
            .map(|basic| recommend(wardrobe, basic))
            .take(MAX_RECOMMENDATIONS)
            .collect();

        tracing::debug!(
            wardrobe_size = wardrobe.len(),
            missing = recommendations.len(),
            "Analyzed wardrobe gaps"
        );

        recommendations
    }
}

fn owns(wardrobe: &[ClothingItem], basic: &Archetype) -> bool {
    wardrobe
        .iter()
        .any(|item| item.category_kind() == Some(basic.category) && item.color == basic.color)
}

fn recommend(wardrobe: &[ClothingItem], basic: &Archetype) -> Recommendation {
    let other_colors = wardrobe
        .iter()
        .filter(|item| item.category_kind() == Some(basic.category))
        .count();

    let (priority, reason) = if other_colors == 0 {
        (
            Priority::Alta,
            format!(
                "You have no {} pieces yet; a {} one is a versatile basic that anchors many looks",
                basic.category.as_str(),
                basic.color
            ),
        )
    } else {
        (
            Priority::Media,
            format!(
                "You own {} {} piece(s), none of them {}; this basic pairs with almost everything",
                other_colors,
                basic.category.as_str(),
                basic.color
            ),
        )
    };

    Recommendation {
        item: basic.item.clone(),
        category: basic.category.as_str().to_string(),
        color: basic.color.clone(),
        color_hex: basic.color_hex.clone(),
        priority,
        reason,
        estimated_new_outfits: pairing_count(wardrobe, basic),
    }
}

/// Categories a basic is combined with when building outfits
fn partners(category: Category) -> &'static [Category] {
    match category {
        Category::Top => &[Category::Bottom],
        Category::Bottom => &[Category::Top],
        Category::Dress => &[Category::Shoes, Category::Accessory],
        Category::Outerwear => &[Category::Top, Category::Bottom, Category::Dress],
        Category::Shoes => &[Category::Dress, Category::Bottom],
        Category::Accessory => &[Category::Dress, Category::Top],
    }
}

/// Owned items the basic would pair with
fn pairing_count(wardrobe: &[ClothingItem], basic: &Archetype) -> usize {
    let partners = partners(basic.category);
    wardrobe
        .iter()
        .filter(|item| item.category_kind().is_some_and(|c| partners.contains(&c)))
        .filter(|item| {
            let verdict = compatibility_or_default(&basic.color_hex, item.color_hex_or_default());
            verdict.compatible && verdict.score >= PAIRING_THRESHOLD
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn analyzer() -> ShoppingGapAnalyzer {
        ShoppingGapAnalyzer::new(Arc::new(StyleTables::default()))
    }

    fn item(category: &str, color: &str, hex: &str) -> ClothingItem {
        ClothingItem::new(Uuid::nil(), category, color).with_hex(hex)
    }

    #[test]
    fn test_empty_wardrobe_misses_every_basic() {
        let recommendations = analyzer().analyze(&[]);
        assert_eq!(recommendations.len(), 5);
        assert!(recommendations.iter().all(|r| r.priority == Priority::Alta));
        assert!(recommendations.iter().all(|r| r.estimated_new_outfits == 0));
    }

    #[test]
    fn test_owned_basic_is_not_recommended() {
        let wardrobe = vec![item("top", "white", "#FFFFFF")];
        let recommendations = analyzer().analyze(&wardrobe);
        assert_eq!(recommendations.len(), 4);
        assert!(recommendations.iter().all(|r| r.item != "White shirt"));
    }

    #[test]
    fn test_color_label_is_case_sensitive() {
        let wardrobe = vec![item("top", "White", "#FFFFFF")];
        let recommendations = analyzer().analyze(&wardrobe);
        let shirt = recommendations
            .iter()
            .find(|r| r.item == "White shirt")
            .unwrap();
        assert_eq!(shirt.priority, Priority::Media);
        assert!(shirt.reason.contains("You own 1 top"));
    }

    #[test]
    fn test_category_aliases_count_as_owned() {
        let wardrobe = vec![item("jeans", "blue", "#1560BD")];
        let recommendations = analyzer().analyze(&wardrobe);
        assert!(recommendations.iter().all(|r| r.item != "Blue jeans"));

        // black pants are still missing, but the category is covered
        let pants = recommendations
            .iter()
            .find(|r| r.item == "Black pants")
            .unwrap();
        assert_eq!(pants.priority, Priority::Media);
    }

    #[test]
    fn test_estimated_new_outfits_counts_compatible_partners() {
        let wardrobe = vec![
            item("bottom", "red", "#FF0000"),
            item("bottom", "green", "#00FF00"),
            item("shoes", "black", "#000000"),
        ];
        let recommendations = analyzer().analyze(&wardrobe);
        let shirt = recommendations
            .iter()
            .find(|r| r.item == "White shirt")
            .unwrap();
        // white pairs with both bottoms; shoes are not a top's partner
        assert_eq!(shirt.estimated_new_outfits, 2);
    }
}
