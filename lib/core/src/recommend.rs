//! Filtered top-K lookup over a precomputed similarity row.
//!
//! The lookup is a pure function of the catalog, the matrix and a
//! [`RecommendRequest`]: read row `p`, drop `p` itself, stable-sort the rest by
//! descending score (equal scores keep catalog order), then walk that order
//! collecting candidates that pass every active filter until `K` are found.

use crate::filter::{Filter, FilterCondition, ProductFilter};
use crate::{Catalog, Error, Product, Result, SimilarityMatrix};
use serde::Serialize;
use std::cmp::Ordering;

/// How many recommendations to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Limit {
    Top(usize),
    #[default]
    Unbounded,
}

impl Limit {
    #[inline]
    fn as_count(self) -> usize {
        match self {
            Limit::Top(k) => k,
            Limit::Unbounded => usize::MAX,
        }
    }
}

/// Parameters of one recommendation lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendRequest {
    pub product: usize,
    pub limit: Limit,
    /// Keep only candidates of exactly this brand
    pub brand: Option<String>,
    /// Keep only candidates of exactly this category; ignored when the catalog
    /// has no category column
    pub category: Option<String>,
    pub same_brand_only: bool,
    pub different_brand_only: bool,
}

impl RecommendRequest {
    #[must_use]
    pub fn new(product: usize) -> Self {
        Self {
            product,
            limit: Limit::Unbounded,
            brand: None,
            category: None,
            same_brand_only: false,
            different_brand_only: false,
        }
    }

    #[must_use]
    pub fn top(mut self, k: usize) -> Self {
        self.limit = Limit::Top(k);
        self
    }

    #[must_use]
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn same_brand_only(mut self, on: bool) -> Self {
        self.same_brand_only = on;
        self
    }

    #[must_use]
    pub fn different_brand_only(mut self, on: bool) -> Self {
        self.different_brand_only = on;
        self
    }

    /// Conjunction of every active condition, resolved against the target.
    ///
    /// Same-brand and different-brand are both pushed when both are set, so
    /// the conjunction rejects every candidate.
    pub fn filter_for(&self, target: &Product, catalog: &Catalog) -> ProductFilter {
        let mut filter = ProductFilter::new();
        if self.same_brand_only {
            filter.push(FilterCondition::BrandEquals(target.brand.clone()));
        }
        if self.different_brand_only {
            filter.push(FilterCondition::BrandNotEquals(target.brand.clone()));
        }
        if let Some(brand) = &self.brand {
            filter.push(FilterCondition::BrandEquals(brand.clone()));
        }
        if let Some(category) = &self.category {
            if catalog.has_category() {
                filter.push(FilterCondition::CategoryEquals(category.clone()));
            }
        }
        filter
    }
}

/// Visual bucket for a similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchTier {
    High,
    Medium,
    Low,
}

impl MatchTier {
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            MatchTier::High
        } else if percent >= 60.0 {
            MatchTier::Medium
        } else {
            MatchTier::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub index: usize,
    pub score: f64,
    pub product: Product,
}

impl Recommendation {
    /// Score scaled as if it were in 0..=1
    #[inline]
    pub fn similarity_percent(&self) -> f64 {
        self.score * 100.0
    }

    #[inline]
    pub fn tier(&self) -> MatchTier {
        MatchTier::from_percent(self.similarity_percent())
    }
}

/// Row `p` minus `p`, ordered by descending score with catalog order kept
/// among equal scores
pub fn ranked_candidates(matrix: &SimilarityMatrix, product: usize) -> Option<Vec<(usize, f64)>> {
    let row = matrix.row(product)?;
    let mut ranked: Vec<(usize, f64)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|(i, _)| *i != product)
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    Some(ranked)
}

pub fn recommend(
    catalog: &Catalog,
    matrix: &SimilarityMatrix,
    request: &RecommendRequest,
) -> Result<Vec<Recommendation>> {
    if request.limit == Limit::Top(0) {
        return Err(Error::InvalidRequest(
            "recommendation count must be positive".to_string(),
        ));
    }

    let out_of_range = || Error::ProductOutOfRange {
        index: request.product,
        len: catalog.len(),
    };
    let target = catalog.get(request.product).ok_or_else(out_of_range)?;
    let ranked = ranked_candidates(matrix, request.product).ok_or_else(out_of_range)?;

    let filter = request.filter_for(target, catalog);
    let results = ranked
        .into_iter()
        .filter_map(|(index, score)| {
            let product = catalog.get(index)?;
            filter.matches(product).then(|| Recommendation {
                index,
                score,
                product: product.clone(),
            })
        })
        .take(request.limit.as_count())
        .collect();

    Ok(results)
}
