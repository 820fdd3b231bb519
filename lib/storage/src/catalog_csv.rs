// CSV catalog loading
use csv::StringRecord;
use skinmatch_core::{ArtifactKind, Catalog, CatalogColumns, Error, Product, Result};
use std::path::Path;
use tracing::debug;

const NAME: &str = "product_name";
const BRAND: &str = "brand";
const ACTIVE_INGREDIENTS: &str = "active_ingredients";
const BENEFITS: &str = "benefits";
const CATEGORY: [&str; 2] = ["product_type", "category"];
const SKIN_TYPE: &str = "skin_type";

/// Column positions resolved from the header row
#[derive(Debug)]
struct Layout {
    name: usize,
    brand: usize,
    active_ingredients: usize,
    benefits: usize,
    category: Option<usize>,
    skin_type: Option<usize>,
}

impl Layout {
    fn from_headers(headers: &StringRecord, path: &Path) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| Error::ArtifactCorrupt {
                kind: ArtifactKind::Catalog,
                path: path.to_path_buf(),
                reason: format!(
                    "missing column '{}' (available: {:?})",
                    name,
                    headers.iter().collect::<Vec<_>>()
                ),
            })
        };

        Ok(Self {
            name: require(NAME)?,
            brand: require(BRAND)?,
            active_ingredients: require(ACTIVE_INGREDIENTS)?,
            benefits: require(BENEFITS)?,
            category: CATEGORY.iter().find_map(|c| find(*c)),
            skin_type: find(SKIN_TYPE),
        })
    }

    fn columns(&self) -> CatalogColumns {
        CatalogColumns {
            category: self.category.is_some(),
            skin_type: self.skin_type.is_some(),
        }
    }
}

/// Non-empty cell value; empty cells read as absent
fn cell(record: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// Load the product table. Row order defines product indices.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::ArtifactMissing {
            kind: ArtifactKind::Catalog,
            path: path.to_path_buf(),
        });
    }

    let corrupt = |reason: String| Error::ArtifactCorrupt {
        kind: ArtifactKind::Catalog,
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| corrupt(format!("failed to open CSV: {e}")))?;
    let headers = reader
        .headers()
        .map_err(|e| corrupt(format!("failed to read headers: {e}")))?
        .clone();
    let layout = Layout::from_headers(&headers, path)?;
    debug!("Catalog layout for {:?}: {:?}", path, layout);

    let mut products = Vec::new();
    for (row, result) in reader.records().enumerate() {
        // header is line 1
        let line = row + 2;
        let record = result.map_err(|e| corrupt(format!("line {line}: {e}")))?;

        let name = cell(&record, Some(layout.name))
            .ok_or_else(|| corrupt(format!("line {line}: empty '{NAME}'")))?;
        let brand = cell(&record, Some(layout.brand))
            .ok_or_else(|| corrupt(format!("line {line}: empty '{BRAND}'")))?;

        products.push(Product {
            name,
            brand,
            category: cell(&record, layout.category),
            skin_type: cell(&record, layout.skin_type),
            active_ingredients: cell(&record, Some(layout.active_ingredients)).unwrap_or_default(),
            benefits: cell(&record, Some(layout.benefits)).unwrap_or_default(),
        });
    }

    Ok(Catalog::new(products, layout.columns()))
}
