// Candidate filters for recommendations and search narrowing
use crate::Product;

pub trait Filter {
    fn matches(&self, product: &Product) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCondition {
    BrandEquals(String),
    BrandNotEquals(String),
    /// A product with no category never matches
    CategoryEquals(String),
    /// Case-insensitive substring over active ingredients or product name;
    /// the needle is stored lower-cased
    TextContains(String),
}

impl FilterCondition {
    #[must_use]
    pub fn text_contains(term: &str) -> Self {
        FilterCondition::TextContains(term.to_lowercase())
    }

    fn evaluate(&self, product: &Product) -> bool {
        match self {
            FilterCondition::BrandEquals(brand) => product.brand == *brand,
            FilterCondition::BrandNotEquals(brand) => product.brand != *brand,
            FilterCondition::CategoryEquals(category) => {
                product.category.as_deref() == Some(category.as_str())
            }
            FilterCondition::TextContains(needle) => {
                product.active_ingredients.to_lowercase().contains(needle.as_str())
                    || product.name.to_lowercase().contains(needle.as_str())
            }
        }
    }
}

/// Conjunction of conditions; an empty filter accepts everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    conditions: Vec<FilterCondition>,
}

impl ProductFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, condition: FilterCondition) {
        self.conditions.push(condition);
    }
}

impl Filter for ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        self.conditions.iter().all(|c| c.evaluate(product))
    }
}

impl Filter for FilterCondition {
    fn matches(&self, product: &Product) -> bool {
        self.evaluate(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serum() -> Product {
        Product::new("Bright Serum", "Wardah")
            .with_category("Serum")
            .with_active_ingredients("Niacinamide, Vitamin C")
    }

    #[test]
    fn test_empty_filter_accepts() {
        assert!(ProductFilter::new().matches(&serum()));
    }

    #[test]
    fn test_brand_conditions() {
        let p = serum();
        assert!(FilterCondition::BrandEquals("Wardah".into()).matches(&p));
        assert!(!FilterCondition::BrandEquals("wardah".into()).matches(&p));
        assert!(FilterCondition::BrandNotEquals("Avoskin".into()).matches(&p));
    }

    #[test]
    fn test_category_requires_value() {
        let p = Product::new("Plain", "Wardah");
        assert!(!FilterCondition::CategoryEquals("Serum".into()).matches(&p));
        assert!(FilterCondition::CategoryEquals("Serum".into()).matches(&serum()));
    }

    #[test]
    fn test_text_contains_is_case_insensitive() {
        let p = serum();
        assert!(FilterCondition::text_contains("NIACINAMIDE").matches(&p));
        assert!(FilterCondition::text_contains("bright").matches(&p));
        assert!(!FilterCondition::text_contains("retinol").matches(&p));
    }

    #[test]
    fn test_contradictory_conjunction_rejects() {
        let mut filter = ProductFilter::new();
        filter.push(FilterCondition::BrandEquals("Wardah".into()));
        filter.push(FilterCondition::BrandNotEquals("Wardah".into()));
        assert!(!filter.matches(&serum()));
    }
}
