use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The three startup artifacts produced by the offline pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Catalog,
    SimilarityMatrix,
    Model,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Catalog,
        ArtifactKind::SimilarityMatrix,
        ArtifactKind::Model,
    ];

    /// File name the offline pipeline exports this artifact under
    #[inline]
    #[must_use]
    pub fn default_file_name(self) -> &'static str {
        match self {
            ArtifactKind::Catalog => "skincare_products.csv",
            ArtifactKind::SimilarityMatrix => "similarity_matrix.npy",
            ArtifactKind::Model => "skincare_model.h5",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Catalog => write!(f, "product catalog"),
            ArtifactKind::SimilarityMatrix => write!(f, "similarity matrix"),
            ArtifactKind::Model => write!(f, "model"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing {kind} artifact: {path}")]
    ArtifactMissing { kind: ArtifactKind, path: PathBuf },

    #[error("Corrupt {kind} artifact {path}: {reason}")]
    ArtifactCorrupt {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },

    #[error("Similarity matrix does not match catalog: expected {expected}x{expected}, got {rows}x{cols}")]
    DimensionMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Product index {index} out of range (catalog has {len} products)")]
    ProductOutOfRange { index: usize, len: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_message_names_file() {
        let err = Error::ArtifactMissing {
            kind: ArtifactKind::SimilarityMatrix,
            path: PathBuf::from("deployment_files/similarity_matrix.npy"),
        };
        let msg = err.to_string();
        assert!(msg.contains("similarity matrix"));
        assert!(msg.contains("similarity_matrix.npy"));
    }

    #[test]
    fn test_out_of_range_message() {
        let err = Error::ProductOutOfRange { index: 7, len: 5 };
        assert_eq!(
            err.to_string(),
            "Product index 7 out of range (catalog has 5 products)"
        );
    }
}
