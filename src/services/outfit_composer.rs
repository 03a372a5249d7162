use std::cmp::Ordering;
use std::sync::Arc;

use crate::models::{Category, ClothingItem, OutfitCandidate, OutfitType};

use super::color_compatibility::compatibility_or_default;
use super::style_tables::{ComposerLimits, StyleTables, WeatherRule};

/// Number of suggestions returned when the caller does not ask for a limit
pub const DEFAULT_OUTFIT_LIMIT: usize = 5;

/// A wardrobe item annotated with its color score against some base item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredItem<'a> {
    pub item: &'a ClothingItem,
    pub score: f64,
}

/// Context an outfit is composed for
#[derive(Debug, Clone, PartialEq)]
pub struct OutfitContext {
    pub weather: String,
    pub occasion: String,
    /// Degrees Celsius
    pub temperature: i32,
    pub limit: usize,
}

impl Default for OutfitContext {
    fn default() -> Self {
        Self {
            weather: "moderate".to_string(),
            occasion: "casual".to_string(),
            temperature: 24,
            limit: DEFAULT_OUTFIT_LIMIT,
        }
    }
}

/// Wardrobe split into the buckets the rules combine
#[derive(Debug, Default)]
struct Buckets<'a> {
    tops: Vec<&'a ClothingItem>,
    bottoms: Vec<&'a ClothingItem>,
    dresses: Vec<&'a ClothingItem>,
    shoes: Vec<&'a ClothingItem>,
    accessories: Vec<&'a ClothingItem>,
}

/// Builds ranked outfit suggestions from a wardrobe snapshot
#[derive(Debug, Clone)]
pub struct OutfitComposer {
    tables: Arc<StyleTables>,
    limits: ComposerLimits,
}

impl OutfitComposer {
    pub fn new(tables: Arc<StyleTables>, limits: ComposerLimits) -> Self {
        Self { tables, limits }
    }

    /// Composes outfits, best first, at most `context.limit` of them
    ///
    /// An empty result is a normal outcome: the wardrobe is empty or nothing
    /// in it pairs well enough.
    pub fn compose<'a>(
        &self,
        wardrobe: &'a [ClothingItem],
        context: &OutfitContext,
    ) -> Vec<OutfitCandidate<'a>> {
        let buckets = self.partition(wardrobe, &context.occasion);

        let mut outfits = self.dress_outfits(&buckets, context);
        outfits.extend(self.top_bottom_outfits(&buckets, context));

        // sort_by is stable: equal confidences keep insertion order
        outfits.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        outfits.truncate(context.limit);

        tracing::debug!(
            wardrobe_size = wardrobe.len(),
            outfit_count = outfits.len(),
            weather = %context.weather,
            occasion = %context.occasion,
            "Composed outfits"
        );

        outfits
    }

    /// Candidates whose color scores at least `min_score` against `base`, best first
    pub fn find_compatible_items<'a>(
        &self,
        base: &ClothingItem,
        candidates: &[&'a ClothingItem],
        min_score: f64,
    ) -> Vec<ScoredItem<'a>> {
        let mut matches: Vec<ScoredItem<'a>> = candidates
            .iter()
            .filter_map(|&candidate| {
                let verdict = compatibility_or_default(
                    base.color_hex_or_default(),
                    candidate.color_hex_or_default(),
                );
                (verdict.compatible && verdict.score >= min_score).then_some(ScoredItem {
                    item: candidate,
                    score: verdict.score,
                })
            })
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        matches
    }

    /// Whether the items cope with the weather
    ///
    /// Only the first matching condition is checked: rain, then cold, then heat.
    pub fn check_weather_suitability(
        &self,
        items: &[&ClothingItem],
        weather: &str,
        temperature: i32,
    ) -> bool {
        let weather = weather.trim().to_lowercase();
        let tables = &self.tables;

        if weather == "rainy" {
            satisfies(items, &tables.rainy)
        } else if weather == "cold" || temperature < tables.cold_below {
            satisfies(items, &tables.cold)
        } else if weather == "hot" || temperature > tables.hot_above {
            satisfies(items, &tables.hot)
        } else {
            true
        }
    }

    /// Whether an item may be worn to the occasion
    ///
    /// Untagged items and unknown occasions never exclude anything.
    pub fn suits_occasion(&self, item: &ClothingItem, occasion: &str) -> bool {
        let Some(allowed) = self.tables.occasions.get(&occasion.trim().to_lowercase()) else {
            return true;
        };
        if item.tags.is_empty() {
            return true;
        }

        item.tags
            .iter()
            .map(String::as_str)
            .chain(item.subcategory.as_deref())
            .chain(std::iter::once(item.category.as_str()))
            .any(|label| allowed.contains(&label.trim().to_lowercase()))
    }

    fn partition<'a>(&self, wardrobe: &'a [ClothingItem], occasion: &str) -> Buckets<'a> {
        let mut buckets = Buckets::default();

        for item in wardrobe {
            if !self.suits_occasion(item, occasion) {
                tracing::debug!(item_id = %item.id, occasion, "Item skipped for occasion");
                continue;
            }
            match item.category_kind() {
                Some(Category::Top) => buckets.tops.push(item),
                Some(Category::Bottom) => buckets.bottoms.push(item),
                Some(Category::Dress) => buckets.dresses.push(item),
                Some(Category::Shoes) => buckets.shoes.push(item),
                Some(Category::Accessory) => buckets.accessories.push(item),
                // outerwear only matters to the weather check
                Some(Category::Outerwear) | None => {}
            }
        }

        buckets
    }

    fn dress_outfits<'a>(
        &self,
        buckets: &Buckets<'a>,
        context: &OutfitContext,
    ) -> Vec<OutfitCandidate<'a>> {
        let mut outfits = Vec::new();

        for &dress in buckets.dresses.iter().take(self.limits.max_dresses) {
            let shoes = self.find_compatible_items(dress, &buckets.shoes, self.limits.match_threshold);
            let Some(best_shoe) = shoes.first() else {
                continue;
            };

            let mut items = vec![dress, best_shoe.item];
            items.extend(
                self.find_compatible_items(dress, &buckets.accessories, self.limits.match_threshold)
                    .into_iter()
                    .take(self.limits.max_dress_accessories)
                    .map(|scored| scored.item),
            );

            outfits.push(OutfitCandidate {
                description: describe(&items),
                items,
                outfit_type: OutfitType::DressOutfit,
                confidence: self.limits.dress_confidence,
                occasion: context.occasion.clone(),
                weather_suitable: self.check_weather_suitability(
                    &[dress],
                    &context.weather,
                    context.temperature,
                ),
            });
        }

        outfits
    }

    fn top_bottom_outfits<'a>(
        &self,
        buckets: &Buckets<'a>,
        context: &OutfitContext,
    ) -> Vec<OutfitCandidate<'a>> {
        let mut outfits = Vec::new();

        for &top in buckets.tops.iter().take(self.limits.max_tops) {
            for &bottom in buckets.bottoms.iter().take(self.limits.max_bottoms) {
                let verdict = compatibility_or_default(
                    top.color_hex_or_default(),
                    bottom.color_hex_or_default(),
                );
                if !verdict.compatible || verdict.score <= self.limits.pair_threshold {
                    continue;
                }

                let mut items = vec![top, bottom];
                if let Some(shoe) = self
                    .find_compatible_items(top, &buckets.shoes, self.limits.match_threshold)
                    .first()
                {
                    items.push(shoe.item);
                }
                if let Some(accessory) = self
                    .find_compatible_items(top, &buckets.accessories, self.limits.match_threshold)
                    .first()
                {
                    items.push(accessory.item);
                }

                let weather_suitable =
                    self.check_weather_suitability(&items, &context.weather, context.temperature);

                outfits.push(OutfitCandidate {
                    description: describe(&items),
                    items,
                    outfit_type: OutfitType::TopBottomOutfit,
                    confidence: verdict.score,
                    occasion: context.occasion.clone(),
                    weather_suitable,
                });
            }
        }

        outfits
    }
}

/// Every non-empty requirement of the rule must be met by some item
fn satisfies(items: &[&ClothingItem], rule: &WeatherRule) -> bool {
    let fabric_ok = rule.fabrics.is_empty()
        || items
            .iter()
            .filter_map(|item| item.fabric_lower())
            .any(|fabric| rule.fabrics.contains(&fabric));
    let category_ok = rule.categories.is_empty()
        || items
            .iter()
            .any(|item| rule.categories.contains(&item.category.trim().to_lowercase()));
    fabric_ok && category_ok
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn describe(items: &[&ClothingItem]) -> String {
    items
        .iter()
        .map(|item| format!("{} {}", capitalize(&item.color), item.display_kind()))
        .collect::<Vec<_>>()
        .join(" + ")
}
