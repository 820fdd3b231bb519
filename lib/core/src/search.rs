//! Free-text search over active ingredients and product names.

use crate::filter::{Filter, FilterCondition};
use crate::{Catalog, Product};
use serde::Serialize;

/// How a search narrows its matches by brand
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BrandMode {
    #[default]
    All,
    /// Only the brand of the first match (in catalog order)
    SameAsFirst,
    Specific(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub term: String,
    pub brand_mode: BrandMode,
}

impl SearchRequest {
    #[must_use]
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            brand_mode: BrandMode::All,
        }
    }

    #[must_use]
    pub fn brand_mode(mut self, mode: BrandMode) -> Self {
        self.brand_mode = mode;
        self
    }

    /// A blank term means no search should run
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.term.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub index: usize,
    pub product: Product,
}

/// Catalog-order matches for `request`, or `None` when the term is blank.
///
/// Matching is a literal, case-insensitive substring test; there is no
/// ranking and no cap.
pub fn search(catalog: &Catalog, request: &SearchRequest) -> Option<Vec<SearchHit>> {
    if request.is_blank() {
        return None;
    }

    let needle = FilterCondition::text_contains(&request.term);
    let matches: Vec<SearchHit> = catalog
        .iter()
        .filter(|p| needle.matches(p.product))
        .map(|p| SearchHit {
            index: p.index,
            product: p.product.clone(),
        })
        .collect();

    let brand = match &request.brand_mode {
        BrandMode::All => return Some(matches),
        BrandMode::SameAsFirst => match matches.first() {
            Some(first) => first.product.brand.clone(),
            None => return Some(matches),
        },
        BrandMode::Specific(brand) => brand.clone(),
    };

    let by_brand = FilterCondition::BrandEquals(brand);
    Some(
        matches
            .into_iter()
            .filter(|hit| by_brand.matches(&hit.product))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatalogColumns;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                Product::new("Glow Toner", "Avoskin").with_active_ingredients("Niacinamide, AHA"),
                Product::new("Barrier Cream", "Wardah").with_active_ingredients("Ceramide"),
                Product::new("Niacinamide Serum", "Wardah").with_active_ingredients("Zinc"),
                Product::new("Night Serum", "Somethinc").with_active_ingredients("Retinol, niacinamide"),
                Product::new("C Booster", "Avoskin").with_active_ingredients("Vitamin C (10%)"),
            ],
            CatalogColumns::default(),
        )
    }

    fn indices(hits: &[SearchHit]) -> Vec<usize> {
        hits.iter().map(|h| h.index).collect()
    }

    #[test]
    fn test_matches_ingredients_or_name_in_catalog_order() {
        let hits = search(&catalog(), &SearchRequest::new("niacinamide")).unwrap();
        assert_eq!(indices(&hits), vec![0, 2, 3]);
    }

    #[test]
    fn test_case_insensitive() {
        let upper = search(&catalog(), &SearchRequest::new("NIACINAMIDE")).unwrap();
        let lower = search(&catalog(), &SearchRequest::new("niacinamide")).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_term_is_literal_not_pattern() {
        let hits = search(&catalog(), &SearchRequest::new("(10%)")).unwrap();
        assert_eq!(indices(&hits), vec![4]);
        assert!(search(&catalog(), &SearchRequest::new("c.*")).unwrap().is_empty());
    }

    #[test]
    fn test_blank_term_is_noop() {
        assert!(search(&catalog(), &SearchRequest::new("")).is_none());
        assert!(search(&catalog(), &SearchRequest::new("   ")).is_none());
    }

    #[test]
    fn test_same_as_first_brand() {
        let request = SearchRequest::new("niacinamide").brand_mode(BrandMode::SameAsFirst);
        let hits = search(&catalog(), &request).unwrap();
        assert_eq!(indices(&hits), vec![0]);
    }

    #[test]
    fn test_specific_brand() {
        let request =
            SearchRequest::new("serum").brand_mode(BrandMode::Specific("Wardah".to_string()));
        let hits = search(&catalog(), &request).unwrap();
        assert_eq!(indices(&hits), vec![2]);
    }

    #[test]
    fn test_no_matches_with_same_as_first() {
        let request = SearchRequest::new("bakuchiol").brand_mode(BrandMode::SameAsFirst);
        assert!(search(&catalog(), &request).unwrap().is_empty());
    }
}
