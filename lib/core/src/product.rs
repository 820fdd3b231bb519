use serde::{Deserialize, Serialize};

/// A single catalog row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub brand: String,
    /// Product type (serum, toner, ...); `None` when the cell is empty or the
    /// catalog has no such column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_type: Option<String>,
    pub active_ingredients: String,
    pub benefits: String,
}

impl Product {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            category: None,
            skin_type: None,
            active_ingredients: String::new(),
            benefits: String::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_skin_type(mut self, skin_type: impl Into<String>) -> Self {
        self.skin_type = Some(skin_type.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_active_ingredients(mut self, ingredients: impl Into<String>) -> Self {
        self.active_ingredients = ingredients.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_benefits(mut self, benefits: impl Into<String>) -> Self {
        self.benefits = benefits.into();
        self
    }

    /// Picker label, e.g. `"Brightening Serum - SOMETHINC"`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.brand.to_uppercase())
    }
}

/// A product together with its stable catalog index
#[derive(Debug, Clone, Copy)]
pub struct IndexedProduct<'a> {
    pub index: usize,
    pub product: &'a Product,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_optional_fields() {
        let p = Product::new("Glow Serum", "Somethinc")
            .with_category("Serum")
            .with_active_ingredients("Niacinamide 10%");
        assert_eq!(p.category.as_deref(), Some("Serum"));
        assert!(p.skin_type.is_none());
        assert_eq!(p.active_ingredients, "Niacinamide 10%");
    }

    #[test]
    fn test_label_uppercases_brand() {
        let p = Product::new("Glow Serum", "Somethinc");
        assert_eq!(p.label(), "Glow Serum - SOMETHINC");
    }

    #[test]
    fn test_missing_optionals_skipped_in_json() {
        let p = Product::new("Toner", "Wardah");
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("category").is_none());
        assert_eq!(json["brand"], "Wardah");
    }
}
