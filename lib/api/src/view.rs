//! JSON cards the presentation layer renders.

use serde::Serialize;
use skinmatch_core::{MatchTier, Product, Recommendation};
use skinmatch_storage::ImageIndex;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    pub index: usize,
    pub name: String,
    pub brand: String,
    /// Upper-cased brand for headings
    pub brand_display: String,
    pub category: String,
    pub skin_type: String,
    pub active_ingredients: String,
    pub benefits: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductCard {
    pub fn new(index: usize, product: &Product, images: &ImageIndex) -> Self {
        let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
        Self {
            index,
            name: product.name.clone(),
            brand: product.brand.clone(),
            brand_display: product.brand.to_uppercase(),
            category: or_na(&product.category),
            skin_type: or_na(&product.skin_type),
            active_ingredients: product.active_ingredients.clone(),
            benefits: product.benefits.clone(),
            image_url: images
                .has_image(index)
                .then(|| format!("/products/{index}/image")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationCard {
    /// 1-based position in the result list
    pub rank: usize,
    #[serde(flatten)]
    pub product: ProductCard,
    pub score: f64,
    /// `score * 100`, rounded to one decimal
    pub similarity_percent: f64,
    /// e.g. `"87.5% Match"`
    pub match_label: String,
    pub tier: MatchTier,
}

impl RecommendationCard {
    pub fn new(rank: usize, rec: &Recommendation, images: &ImageIndex) -> Self {
        let percent = rec.similarity_percent();
        Self {
            rank,
            product: ProductCard::new(rec.index, &rec.product, images),
            score: rec.score,
            similarity_percent: (percent * 10.0).round() / 10.0,
            match_label: format!("{percent:.1}% Match"),
            tier: rec.tier(),
        }
    }
}

pub fn recommendation_cards(recs: &[Recommendation], images: &ImageIndex) -> Vec<RecommendationCard> {
    recs.iter()
        .enumerate()
        .map(|(i, rec)| RecommendationCard::new(i + 1, rec, images))
        .collect()
}

/// Product picker entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerEntry {
    pub index: usize,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_fills_missing_fields() {
        let product = Product::new("Toner", "Wardah").with_category("Toner");
        let card = ProductCard::new(3, &product, &ImageIndex::default());
        assert_eq!(card.brand_display, "WARDAH");
        assert_eq!(card.category, "Toner");
        assert_eq!(card.skin_type, "N/A");
        assert!(card.image_url.is_none());
    }

    #[test]
    fn test_recommendation_card_percent() {
        let rec = Recommendation {
            index: 1,
            score: 0.87549,
            product: Product::new("Serum", "Avoskin"),
        };
        let card = RecommendationCard::new(1, &rec, &ImageIndex::default());
        assert_eq!(card.similarity_percent, 87.5);
        assert_eq!(card.match_label, "87.5% Match");
        assert_eq!(card.tier, MatchTier::High);

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["name"], "Serum");
        assert_eq!(json["rank"], 1);
        assert_eq!(json["tier"], "High");
    }
}
