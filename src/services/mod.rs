//! Styling engine and the helpers the HTTP layer needs around it
//!
//! The styling components are pure and synchronous: they read a wardrobe
//! snapshot plus the shared [`StyleTables`] and keep no state between calls.
use std::sync::Arc;

pub mod color_compatibility;
pub mod color_season;
pub mod image_classifier;
pub mod outfit_composer;
pub mod shopping_gap;
pub mod style_tables;
pub mod uploads;

pub use color_compatibility::{compatibility_or_default, compatible, parse_hex, Compatibility};
pub use color_season::ColorSeasonAnalyzer;
pub use image_classifier::{Classification, ImageClassifier, KMeansPalette, PaletteExtractor};
pub use outfit_composer::{OutfitComposer, OutfitContext, ScoredItem, DEFAULT_OUTFIT_LIMIT};
pub use shopping_gap::ShoppingGapAnalyzer;
pub use style_tables::{ComposerLimits, StyleTables};
pub use uploads::UploadStorage;

/// All styling components built over one set of reference tables
#[derive(Clone)]
pub struct StylingEngine {
    pub composer: OutfitComposer,
    pub gaps: ShoppingGapAnalyzer,
    pub seasons: ColorSeasonAnalyzer,
    pub classifier: ImageClassifier,
}

impl StylingEngine {
    pub fn new(tables: Arc<StyleTables>, limits: ComposerLimits, classifier: ImageClassifier) -> Self {
        Self {
            composer: OutfitComposer::new(tables.clone(), limits),
            gaps: ShoppingGapAnalyzer::new(tables.clone()),
            seasons: ColorSeasonAnalyzer::new(tables),
            classifier,
        }
    }
}

impl Default for StylingEngine {
    fn default() -> Self {
        Self::new(
            Arc::new(StyleTables::default()),
            ComposerLimits::default(),
            ImageClassifier::default(),
        )
    }
}
