use crate::recommend::{self, Recommendation, RecommendRequest};
use crate::search::{self, SearchHit, SearchRequest};
use crate::{Catalog, Error, Product, Result, SimilarityMatrix};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Largest `|m[i][j] - m[j][i]|` tolerated without a warning
const SYMMETRY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub products: usize,
    pub brands: usize,
}

/// Read-only catalog plus its similarity matrix, shared by every request
#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Arc<Catalog>,
    matrix: Arc<SimilarityMatrix>,
}

impl Engine {
    /// Pair a catalog with its matrix. The matrix must be N x N for a catalog
    /// of N products; asymmetry is logged but accepted.
    pub fn new(catalog: Catalog, matrix: SimilarityMatrix) -> Result<Self> {
        if matrix.dim() != catalog.len() {
            return Err(Error::DimensionMismatch {
                expected: catalog.len(),
                rows: matrix.dim(),
                cols: matrix.dim(),
            });
        }

        let asymmetry = matrix.max_asymmetry();
        if asymmetry > SYMMETRY_TOLERANCE {
            warn!(
                "Similarity matrix is not symmetric (max deviation {:.3e})",
                asymmetry
            );
        }

        Ok(Self {
            catalog: Arc::new(catalog),
            matrix: Arc::new(matrix),
        })
    }

    #[inline]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    #[inline]
    pub fn product(&self, index: usize) -> Option<&Product> {
        self.catalog.get(index)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            products: self.catalog.len(),
            brands: self.catalog.brand_count(),
        }
    }

    pub fn recommend(&self, request: &RecommendRequest) -> Result<Vec<Recommendation>> {
        let results = recommend::recommend(&self.catalog, &self.matrix, request)?;
        debug!(
            "Recommendations for product {}: {} result(s)",
            request.product,
            results.len()
        );
        Ok(results)
    }

    pub fn search(&self, request: &SearchRequest) -> Option<Vec<SearchHit>> {
        let hits = search::search(&self.catalog, request)?;
        debug!("Search {:?}: {} match(es)", request.term, hits.len());
        Some(hits)
    }
}
