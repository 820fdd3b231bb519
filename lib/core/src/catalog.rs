use crate::product::{IndexedProduct, Product};
use ahash::AHashSet;

/// Optional columns the catalog file may or may not carry.
///
/// A filter on a column the catalog does not have is a no-op, which is
/// different from filtering on an empty value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogColumns {
    pub category: bool,
    pub skin_type: bool,
}

impl CatalogColumns {
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self {
            category: true,
            skin_type: true,
        }
    }
}

/// Immutable product table; a product's position is its index into the
/// similarity matrix
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    columns: CatalogColumns,
}

impl Catalog {
    #[must_use]
    pub fn new(products: Vec<Product>, columns: CatalogColumns) -> Self {
        Self { products, columns }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[inline]
    pub fn columns(&self) -> CatalogColumns {
        self.columns
    }

    #[inline]
    pub fn has_category(&self) -> bool {
        self.columns.category
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    #[inline]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> impl Iterator<Item = IndexedProduct<'_>> {
        self.products
            .iter()
            .enumerate()
            .map(|(index, product)| IndexedProduct { index, product })
    }

    /// Products of one brand, in catalog order
    pub fn by_brand<'a>(&'a self, brand: &'a str) -> impl Iterator<Item = IndexedProduct<'a>> {
        self.iter().filter(move |p| p.product.brand == brand)
    }

    /// Sorted distinct brand names
    pub fn brands(&self) -> Vec<String> {
        let set: AHashSet<&str> = self.products.iter().map(|p| p.brand.as_str()).collect();
        let mut brands: Vec<String> = set.into_iter().map(str::to_string).collect();
        brands.sort();
        brands
    }

    #[inline]
    pub fn brand_count(&self) -> usize {
        self.products
            .iter()
            .map(|p| p.brand.as_str())
            .collect::<AHashSet<_>>()
            .len()
    }

    /// Sorted distinct categories, or `None` if the catalog has no category
    /// column
    pub fn categories(&self) -> Option<Vec<String>> {
        if !self.columns.category {
            return None;
        }
        let set: AHashSet<&str> = self
            .products
            .iter()
            .filter_map(|p| p.category.as_deref())
            .collect();
        let mut categories: Vec<String> = set.into_iter().map(str::to_string).collect();
        categories.sort();
        Some(categories)
    }
}
