use crate::catalog_csv::load_catalog;
use crate::images::ImageIndex;
use crate::model::ModelArtifact;
use crate::npy;
use skinmatch_core::{ArtifactKind, Catalog, Engine, Error, Result, SimilarityMatrix};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the three startup artifacts live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub catalog: PathBuf,
    pub similarity: PathBuf,
    pub model: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside one directory
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            catalog: dir.join(ArtifactKind::Catalog.default_file_name()),
            similarity: dir.join(ArtifactKind::SimilarityMatrix.default_file_name()),
            model: dir.join(ArtifactKind::Model.default_file_name()),
        }
    }

    #[inline]
    pub fn path(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Catalog => &self.catalog,
            ArtifactKind::SimilarityMatrix => &self.similarity,
            ArtifactKind::Model => &self.model,
        }
    }

    /// Operator-facing instructions shown when loading fails
    pub fn regeneration_hint(&self) -> String {
        let mut hint = String::from("Required files:\n");
        for (i, kind) in ArtifactKind::ALL.iter().enumerate() {
            hint.push_str(&format!(
                "  {}. {} - {}\n",
                i + 1,
                self.path(*kind).display(),
                kind
            ));
        }
        hint.push_str("Run the offline export pipeline to regenerate them, then restart.");
        hint
    }
}

fn load_matrix(path: &Path, expected: usize) -> Result<SimilarityMatrix> {
    if !path.is_file() {
        return Err(Error::ArtifactMissing {
            kind: ArtifactKind::SimilarityMatrix,
            path: path.to_path_buf(),
        });
    }
    let corrupt = |reason: String| Error::ArtifactCorrupt {
        kind: ArtifactKind::SimilarityMatrix,
        path: path.to_path_buf(),
        reason,
    };

    let array = npy::read(path).map_err(|e| corrupt(format!("{e:#}")))?;
    if array.rows != expected || array.cols != expected {
        return Err(Error::DimensionMismatch {
            expected,
            rows: array.rows,
            cols: array.cols,
        });
    }
    SimilarityMatrix::new(array.rows, array.data).map_err(|e| corrupt(e.to_string()))
}

fn load_model(path: &Path) -> Result<ModelArtifact> {
    if !path.is_file() {
        return Err(Error::ArtifactMissing {
            kind: ArtifactKind::Model,
            path: path.to_path_buf(),
        });
    }
    ModelArtifact::open(path).map_err(|e| Error::ArtifactCorrupt {
        kind: ArtifactKind::Model,
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })
}

/// Everything loaded at startup; immutable afterwards
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub engine: Engine,
    pub model: ModelArtifact,
    pub images: ImageIndex,
}

impl Artifacts {
    pub fn load<P: AsRef<Path>>(paths: &ArtifactPaths, images_root: P) -> Result<Self> {
        let catalog: Catalog = load_catalog(&paths.catalog)?;
        info!(
            "Catalog loaded: {} products, {} brands ({:?})",
            catalog.len(),
            catalog.brand_count(),
            paths.catalog
        );

        let matrix = load_matrix(&paths.similarity, catalog.len())?;
        info!(
            "Similarity matrix loaded: {}x{} ({:?})",
            matrix.dim(),
            matrix.dim(),
            paths.similarity
        );

        let model = load_model(&paths.model)?;
        info!(
            "Model artifact verified: {} bytes, sha256 {} ({:?}); not used for serving",
            model.size,
            model.short_digest(),
            model.path
        );

        let images = ImageIndex::build(images_root, &catalog);
        info!(
            "Product images: {}/{} found under {:?}",
            images.found(),
            catalog.len(),
            images.root()
        );

        let engine = Engine::new(catalog, matrix)?;
        Ok(Self {
            engine,
            model,
            images,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CSV: &str = "product_name,brand,product_type,skin_type,active_ingredients,benefits\n\
                       Glow Serum,Somethinc,Serum,Oily,Niacinamide,Brightening\n\
                       Barrier Cream,Wardah,Cream,Dry,Ceramide,Hydrating\n";

    fn write_artifacts(dir: &Path, matrix: &[f64], n: usize) -> ArtifactPaths {
        let paths = ArtifactPaths::in_dir(dir);
        fs::write(&paths.catalog, CSV).unwrap();
        fs::write(&paths.similarity, npy::encode(n, n, matrix).unwrap()).unwrap();
        fs::write(&paths.model, b"HDF5 model bytes").unwrap();
        paths
    }

    #[test]
    fn test_default_file_names() {
        let paths = ArtifactPaths::in_dir("deployment_files");
        assert_eq!(paths.catalog, Path::new("deployment_files/skincare_products.csv"));
        assert_eq!(paths.similarity, Path::new("deployment_files/similarity_matrix.npy"));
        assert_eq!(paths.model, Path::new("deployment_files/skincare_model.h5"));
    }

    #[test]
    fn test_hint_names_all_three_files() {
        let hint = ArtifactPaths::in_dir("d").regeneration_hint();
        assert!(hint.contains("skincare_products.csv"));
        assert!(hint.contains("similarity_matrix.npy"));
        assert!(hint.contains("skincare_model.h5"));
        assert!(hint.contains("regenerate"));
    }

    #[test]
    fn test_load_all() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_artifacts(dir.path(), &[1.0, 0.4, 0.4, 1.0], 2);
        let artifacts = Artifacts::load(&paths, dir.path()).unwrap();
        assert_eq!(artifacts.engine.catalog().len(), 2);
        assert_eq!(artifacts.engine.matrix().get(0, 1), Some(0.4));
        assert_eq!(artifacts.model.size, 16);
        assert_eq!(artifacts.images.found(), 0);
    }

    #[test]
    fn test_missing_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_artifacts(dir.path(), &[1.0, 0.4, 0.4, 1.0], 2);
        fs::remove_file(&paths.similarity).unwrap();
        let err = Artifacts::load(&paths, dir.path()).unwrap_err();
        assert!(matches!(
            err,
            Error::ArtifactMissing { kind: ArtifactKind::SimilarityMatrix, .. }
        ));
    }

    #[test]
    fn test_matrix_catalog_size_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_artifacts(dir.path(), &[1.0; 9], 3);
        let err = Artifacts::load(&paths, dir.path()).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, rows: 3, cols: 3 }));
    }

    #[test]
    fn test_corrupt_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_artifacts(dir.path(), &[1.0, 0.4, 0.4, 1.0], 2);
        fs::write(&paths.similarity, b"garbage").unwrap();
        let err = Artifacts::load(&paths, dir.path()).unwrap_err();
        assert!(matches!(
            err,
            Error::ArtifactCorrupt { kind: ArtifactKind::SimilarityMatrix, .. }
        ));
    }

    #[test]
    fn test_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_artifacts(dir.path(), &[1.0, 0.4, 0.4, 1.0], 2);
        fs::remove_file(&paths.model).unwrap();
        let err = Artifacts::load(&paths, dir.path()).unwrap_err();
        assert!(matches!(err, Error::ArtifactMissing { kind: ArtifactKind::Model, .. }));
    }
}
