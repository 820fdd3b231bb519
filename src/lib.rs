//! # Skinmatch
//!
//! A skincare product browser over a static catalog and a precomputed
//! similarity matrix.
//!
//! Users either search the active-ingredient text (and product names), or pick
//! a product and get its nearest neighbours by precomputed similarity, with
//! optional brand and category filters. Nothing is learned or computed at
//! query time: similarity comes straight from the exported matrix.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! skinmatch --artifacts-dir ./deployment_files --images-dir . --http-port 8501
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use skinmatch::prelude::*;
//!
//! let artifacts = Artifacts::load(&ArtifactPaths::in_dir("deployment_files"), ".").unwrap();
//!
//! // Five most similar products to product 0, other brands only
//! let request = RecommendRequest::new(0).top(5).different_brand_only(true);
//! let results = artifacts.engine.recommend(&request).unwrap();
//!
//! // Ingredient search
//! let hits = artifacts.engine.search(&SearchRequest::new("niacinamide"));
//! ```
//!
//! ## Crate Structure
//!
//! - `skinmatch-core` - Catalog, similarity matrix, filters, top-K lookup, search
//! - `skinmatch-storage` - Artifact loading (CSV, `.npy`, model) and the image index
//! - `skinmatch-api` - REST API, sessions and product cards
//!
//! ## Artifacts
//!
//! - `skincare_products.csv` - one row per product
//! - `similarity_matrix.npy` - N x N scores in catalog order
//! - `skincare_model.h5` - verified at startup, not used for serving

// Re-export core types
pub use skinmatch_core::{
    BrandMode, Catalog, CatalogColumns, Engine, Error, Limit, MatchTier, Product,
    Recommendation, RecommendRequest, Result, SearchHit, SearchRequest, SimilarityMatrix,
};

// Re-export storage
pub use skinmatch_storage::{ArtifactPaths, Artifacts, ImageIndex, ModelArtifact};

// Re-export API
pub use skinmatch_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AppState, ArtifactPaths, Artifacts, BrandMode, Catalog, CatalogColumns, Engine, Error,
        ImageIndex, Limit, Product, RecommendRequest, Recommendation, RestApi, Result,
        SearchRequest, SimilarityMatrix,
    };
}
