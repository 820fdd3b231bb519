//! # Skinmatch Core
//!
//! Core library for the Skinmatch product browser.
//!
//! This crate provides the data structures and the two request-path
//! operations:
//!
//! - [`Catalog`] / [`Product`] - the immutable product table
//! - [`SimilarityMatrix`] - precomputed N x N similarity scores
//! - [`recommend()`] - filtered top-K lookup over a similarity row
//! - [`search()`] - case-insensitive ingredient / name search
//! - [`Engine`] - catalog and matrix paired and validated, shared by requests
//!
//! ## Example
//!
//! ```rust
//! use skinmatch_core::{Catalog, CatalogColumns, Engine, Product, RecommendRequest, SimilarityMatrix};
//!
//! let catalog = Catalog::new(
//!     vec![
//!         Product::new("Glow Serum", "Somethinc"),
//!         Product::new("Barrier Cream", "Wardah"),
//!         Product::new("Night Serum", "Somethinc"),
//!     ],
//!     CatalogColumns::default(),
//! );
//! let matrix = SimilarityMatrix::from_rows(vec![
//!     vec![1.0, 0.4, 0.9],
//!     vec![0.4, 1.0, 0.3],
//!     vec![0.9, 0.3, 1.0],
//! ]).unwrap();
//!
//! let engine = Engine::new(catalog, matrix).unwrap();
//! let results = engine.recommend(&RecommendRequest::new(0).top(1)).unwrap();
//! assert_eq!(results[0].index, 2);
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod filter;
pub mod product;
pub mod recommend;
pub mod search;
pub mod similarity;

pub use catalog::{Catalog, CatalogColumns};
pub use engine::{CatalogStats, Engine};
pub use error::{ArtifactKind, Error, Result};
pub use filter::{Filter, FilterCondition, ProductFilter};
pub use product::{IndexedProduct, Product};
pub use recommend::{recommend, Limit, MatchTier, Recommendation, RecommendRequest};
pub use search::{search, BrandMode, SearchHit, SearchRequest};
pub use similarity::SimilarityMatrix;
