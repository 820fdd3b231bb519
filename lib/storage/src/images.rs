//! Product image lookup.
//!
//! Images live under `<root>/<lower-cased brand>/<product name>.jpg` (or
//! `.png`). The index probes each catalog product once at startup; requests
//! only consult the index.

use skinmatch_core::Catalog;
use std::path::{Path, PathBuf};
use tracing::debug;

const EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// A name that cannot be a single path component never has an image
fn is_plain_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

/// Probe the filesystem for one product's image, `.jpg` before `.png`
pub fn resolve(root: &Path, brand: &str, product_name: &str) -> Option<PathBuf> {
    let brand_dir = brand.to_lowercase();
    if !is_plain_component(&brand_dir) || !is_plain_component(product_name) {
        return None;
    }
    let dir = root.join(brand_dir);
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{product_name}.{ext}")))
        .find(|candidate| candidate.is_file())
}

/// Image path per catalog index, resolved once
#[derive(Debug, Clone, Default)]
pub struct ImageIndex {
    root: PathBuf,
    paths: Vec<Option<PathBuf>>,
}

impl ImageIndex {
    pub fn build<P: AsRef<Path>>(root: P, catalog: &Catalog) -> Self {
        let root = root.as_ref().to_path_buf();
        let paths: Vec<Option<PathBuf>> = catalog
            .iter()
            .map(|p| resolve(&root, &p.product.brand, &p.product.name))
            .collect();
        let index = Self { root, paths };
        debug!(
            "Indexed {} product image(s) under {:?}",
            index.found(),
            index.root
        );
        index
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).and_then(|p| p.as_deref())
    }

    #[inline]
    pub fn has_image(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Number of products with an image
    pub fn found(&self) -> usize {
        self.paths.iter().filter(|p| p.is_some()).count()
    }
}
