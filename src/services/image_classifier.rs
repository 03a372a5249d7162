use std::collections::HashMap;
use std::sync::Arc;

use image::{imageops::FilterType, DynamicImage, GenericImageView, RgbImage};
use kmeans_colors::get_kmeans_hamerly;
use palette::{IntoColor, Lab, Srgb};
use serde::Serialize;

use crate::{error::StylingError, models::DEFAULT_COLOR_HEX};

/// Category label used when an image cannot be analysed
pub const UNCATEGORIZED: &str = "uncategorized";

/// Attributes guessed from a clothing photo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub color_hex: String,
    pub category: String,
    pub subcategory: String,
    pub palette: Vec<String>,
    /// solid, striped or patterned
    pub pattern: Option<String>,
    /// Why the fallback record was returned, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Classification {
    /// Gray, uncategorized record returned when analysis fails
    pub fn fallback(reason: &StylingError) -> Self {
        Self {
            color_hex: DEFAULT_COLOR_HEX.to_string(),
            category: UNCATEGORIZED.to_string(),
            subcategory: UNCATEGORIZED.to_string(),
            palette: Vec::new(),
            pattern: None,
            error: Some(reason.to_string()),
        }
    }
}

/// Reduces an image to a handful of representative colors
pub trait PaletteExtractor: Send + Sync {
    /// Returns up to `k` hex colors, most prominent first
    fn extract(&self, raster: &RgbImage, k: usize) -> Vec<String>;
}

/// k-means clustering in Lab space
#[derive(Debug, Clone)]
pub struct KMeansPalette {
    pub max_iterations: usize,
    pub convergence: f32,
    pub seed: u64,
}

impl Default for KMeansPalette {
    fn default() -> Self {
        Self {
            max_iterations: 30,
            convergence: 5.0,
            seed: 0,
        }
    }
}

impl PaletteExtractor for KMeansPalette {
    fn extract(&self, raster: &RgbImage, k: usize) -> Vec<String> {
        let counts = pixel_counts(raster);
        if k == 0 || counts.is_empty() {
            return Vec::new();
        }

        // Few enough colors to return them as-is
        if counts.len() <= k {
            let mut exact: Vec<_> = counts.into_iter().collect();
            exact.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
                count_b.cmp(count_a).then(first_a.cmp(first_b))
            });
            return exact.into_iter().map(|(rgb, _)| to_hex(rgb)).collect();
        }

        let lab: Vec<Lab> = raster
            .pixels()
            .map(|p| {
                Srgb::new(
                    p.0[0] as f32 / 255.0,
                    p.0[1] as f32 / 255.0,
                    p.0[2] as f32 / 255.0,
                )
                .into_color()
            })
            .collect();

        let result = get_kmeans_hamerly(
            k,
            self.max_iterations,
            self.convergence,
            false,
            &lab,
            self.seed,
        );

        let mut counts = vec![0usize; result.centroids.len()];
        for &idx in &result.indices {
            counts[idx as usize] += 1;
        }

        let mut weighted: Vec<(String, usize)> = result
            .centroids
            .iter()
            .zip(counts)
            .map(|(c, count)| {
                let rgb: Srgb = (*c).into_color();
                let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                (
                    to_hex([channel(rgb.red), channel(rgb.green), channel(rgb.blue)]),
                    count,
                )
            })
            .collect();

        weighted.sort_by(|a, b| b.1.cmp(&a.1));
        weighted.into_iter().map(|(hex, _)| hex).collect()
    }
}

/// Guesses color, category and pattern of a clothing photo
#[derive(Clone)]
pub struct ImageClassifier {
    palette: Arc<dyn PaletteExtractor>,
    /// Longest side of the raster used for color analysis
    max_side: u32,
    palette_size: usize,
}

impl Default for ImageClassifier {
    fn default() -> Self {
        Self::new(Arc::new(KMeansPalette::default()))
    }
}

impl ImageClassifier {
    pub fn new(palette: Arc<dyn PaletteExtractor>) -> Self {
        Self {
            palette,
            max_side: 300,
            palette_size: 5,
        }
    }

    /// Decodes and classifies an encoded image; never fails
    pub fn classify_bytes(&self, bytes: &[u8]) -> Classification {
        match image::load_from_memory(bytes) {
            Ok(img) => self.classify_image(&img),
            Err(e) => {
                let reason = StylingError::ImageDecodeFailure(e.to_string());
                tracing::warn!(error = %reason, size = bytes.len(), "Image classification fell back");
                Classification::fallback(&reason)
            }
        }
    }

    /// Classifies a decoded image
    pub fn classify_image(&self, img: &DynamicImage) -> Classification {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            let reason = StylingError::ImageDecodeFailure("empty image".to_string());
            tracing::warn!(error = %reason, "Image classification fell back");
            return Classification::fallback(&reason);
        }

        let raster = if width.max(height) > self.max_side {
            img.resize(self.max_side, self.max_side, FilterType::Triangle)
                .to_rgb8()
        } else {
            img.to_rgb8()
        };

        let (category, subcategory) = category_from_aspect(width, height);
        let color_hex = dominant_color(&raster);
        let pattern = detect_pattern(&raster);
        let palette = self.palette.extract(&raster, self.palette_size);

        tracing::debug!(
            width,
            height,
            category,
            subcategory,
            color = %color_hex,
            pattern,
            "Classified image"
        );

        Classification {
            color_hex,
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            palette,
            pattern: Some(pattern.to_string()),
            error: None,
        }
    }
}

/// Guesses `(category, subcategory)` from the width/height ratio
///
/// Breakpoints use strict `<` and are checked in ascending order, so a ratio
/// exactly on a breakpoint lands in the bucket above it.
pub fn category_from_aspect(width: u32, height: u32) -> (&'static str, &'static str) {
    let ratio = width as f64 / height as f64;

    if ratio < 0.7 {
        ("dress", "dress")
    } else if ratio < 0.9 {
        if ratio > 0.8 {
            ("top", "blouse")
        } else {
            ("top", "t-shirt")
        }
    } else if ratio < 1.2 {
        ("top", "shirt")
    } else if ratio < 1.5 {
        ("bottom", "skirt")
    } else {
        ("bottom", "pants")
    }
}

/// Pixel value -> (count, index of first occurrence)
fn pixel_counts(raster: &RgbImage) -> HashMap<[u8; 3], (usize, usize)> {
    let mut counts: HashMap<[u8; 3], (usize, usize)> = HashMap::new();
    for (idx, pixel) in raster.pixels().enumerate() {
        counts.entry(pixel.0).or_insert((0, idx)).0 += 1;
    }
    counts
}

/// Most frequent pixel value; ties go to the first one encountered
pub fn dominant_color(raster: &RgbImage) -> String {
    pixel_counts(raster)
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(rgb, _)| to_hex(rgb))
        .unwrap_or_else(|| DEFAULT_COLOR_HEX.to_string())
}

/// Classifies texture by grayscale variance
pub fn detect_pattern(raster: &RgbImage) -> &'static str {
    let gray = DynamicImage::ImageRgb8(raster.clone()).to_luma8();
    let n = gray.pixels().len() as f64;
    if n == 0.0 {
        return "solid";
    }

    let mean = gray.pixels().map(|p| p.0[0] as f64).sum::<f64>() / n;
    let variance = gray
        .pixels()
        .map(|p| {
            let d = p.0[0] as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    if variance < 50.0 {
        "solid"
    } else if variance < 200.0 {
        "striped"
    } else {
        "patterned"
    }
}

fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}
