//! Product catalog and filtering.

use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::domain::aggregates::Product;
use crate::domain::value_objects::ProductId;

const BUILTIN_CATALOG: &str = include_str!("../data/products.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
}

/// Read-only product list.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

/// Catalog query. Every set predicate must hold (AND); unset ones match
/// everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductFilter {
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    /// Product category must be one of these. Empty means any.
    pub categories: Vec<String>,
    /// Inclusive lower bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound.
    pub max_price: Option<Decimal>,
    /// Product must carry at least one of these tags. Empty means any.
    pub tags: Vec<String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && (self.categories.is_empty() || self.categories.iter().any(|c| *c == product.category))
            && self.min_price.map_or(true, |min| product.price >= min)
            && self.max_price.map_or(true, |max| product.price <= max)
            && (self.tags.is_empty() || self.tags.iter().any(|t| product.has_tag(t)))
    }

    fn matches_search(&self, product: &Product) -> bool {
        let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return true;
        };
        let needle = needle.to_lowercase();
        product.title.to_lowercase().contains(&needle) || product.description.to_lowercase().contains(&needle)
    }
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for p in &products {
            if !seen.insert(p.id) {
                return Err(CatalogError::DuplicateId(p.id));
            }
        }
        Ok(Self { products })
    }

    /// The catalog bundled with the binary.
    pub fn builtin() -> Result<Self, CatalogError> { Self::from_json(BUILTIN_CATALOG) }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> { Self::new(serde_json::from_str(json)?) }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| CatalogError::Io { path: path.display().to_string(), source })?;
        let catalog = Self::from_json(&json)?;
        info!(path = %path.display(), products = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] { &self.products }
    pub fn len(&self) -> usize { self.products.len() }
    pub fn is_empty(&self) -> bool { self.products.is_empty() }

    pub fn find(&self, id: ProductId) -> Option<&Product> { self.products.iter().find(|p| p.id == id) }

    pub fn filter(&self, filter: &ProductFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }

    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.products.iter().filter(|p| p.category == category).collect()
    }

    /// Admin search: text plus a single category, where `all` matches any.
    pub fn search(&self, text: &str, category: &str) -> Vec<&Product> {
        let filter = ProductFilter {
            search: Some(text.to_string()),
            categories: if category == "all" { vec![] } else { vec![category.to_string()] },
            ..Default::default()
        };
        self.filter(&filter)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> { distinct(self.products.iter().map(|p| p.category.as_str())) }

    /// Distinct tags in first-seen order.
    pub fn tags(&self) -> Vec<&str> { distinct(self.products.iter().flat_map(|p| p.tags.iter().map(String::as_str))) }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

/// Heading shown for a category page.
pub fn category_title(category: &str) -> &'static str {
    match category {
        "new-arrivals" => "New Arrivals",
        "trending" => "Trending Now",
        "streetwear" => "Streetwear",
        "accessories" => "Accessories",
        _ => "Products",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::product::fixtures::product;

    fn fixture() -> Catalog {
        let mut a = product(1, 1000);
        a.category = "streetwear".into();
        a.tags = vec!["cotton".into(), "summer".into()];
        let mut b = product(2, 2500);
        b.category = "streetwear".into();
        b.tags = vec!["denim".into()];
        let mut c = product(3, 1500);
        c.category = "accessories".into();
        c.tags = vec!["summer".into()];
        let mut d = product(4, 4000);
        d.category = "streetwear".into();
        d.tags = vec!["summer".into()];
        d.title = "Linen Shirt".into();
        let mut e = product(5, 1800);
        e.category = "streetwear".into();
        e.tags = vec!["summer".into(), "linen".into()];
        Catalog::new(vec![a, b, c, d, e]).unwrap()
    }

    fn ids(products: Vec<&Product>) -> Vec<u32> { products.into_iter().map(|p| p.id.value()).collect() }

    #[test]
    fn test_category_price_and_tag_are_anded() {
        let filter = ProductFilter {
            categories: vec!["streetwear".into()],
            min_price: Some(Decimal::from(1000)),
            max_price: Some(Decimal::from(2000)),
            tags: vec!["summer".into()],
            ..Default::default()
        };
        assert_eq!(ids(fixture().filter(&filter)), vec![1, 5]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let filter = ProductFilter {
            min_price: Some(Decimal::from(1500)),
            max_price: Some(Decimal::from(2500)),
            ..Default::default()
        };
        assert_eq!(ids(fixture().filter(&filter)), vec![2, 3, 5]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let catalog = fixture();
        let by_title = ProductFilter { search: Some("linen".into()), ..Default::default() };
        assert_eq!(ids(catalog.filter(&by_title)), vec![4]);
        let by_description = ProductFilter { search: Some("HEAVYWEIGHT".into()), ..Default::default() };
        assert_eq!(catalog.filter(&by_description).len(), 5);
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        assert_eq!(fixture().filter(&ProductFilter::default()).len(), 5);
    }

    #[test]
    fn test_admin_search_all_category() {
        let catalog = fixture();
        assert_eq!(catalog.search("", "all").len(), 5);
        assert_eq!(ids(catalog.search("", "accessories")), vec![3]);
    }

    #[test]
    fn test_distinct_categories_and_tags() {
        let catalog = fixture();
        assert_eq!(catalog.categories(), vec!["streetwear", "accessories"]);
        assert_eq!(catalog.tags(), vec!["cotton", "summer", "denim", "linen"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = Catalog::new(vec![product(1, 10), product(1, 20)]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == ProductId::new(1)));
    }

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.find(ProductId::new(3)).map(|p| p.title.as_str()), Some("Puffer Jacket"));
        assert_eq!(category_title("trending"), "Trending Now");
        assert_eq!(category_title("unknown"), "Products");
    }
}
