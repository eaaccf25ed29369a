//! Catalog routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{category_title, ProductFilter};
use crate::domain::aggregates::Product;
use crate::domain::value_objects::ProductId;
use crate::error::AppError;
use crate::state::AppState;
use crate::StorefrontError;

/// Query string for the product listing. `category` and `tags` are
/// comma-separated.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub tags: Option<String>,
}

impl From<ListParams> for ProductFilter {
    fn from(p: ListParams) -> Self {
        Self {
            search: p.search,
            categories: split_list(p.category.as_deref()),
            min_price: p.min_price,
            max_price: p.max_price,
            tags: split_list(p.tags.as_deref()),
        }
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| v.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect())
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub category: String,
    pub title: &'static str,
    pub products: Vec<Product>,
}

pub async fn list(State(s): State<AppState>, Query(p): Query<ListParams>) -> Json<ProductList> {
    let catalog = s.catalog();
    let filter = ProductFilter::from(p);
    Json(ProductList {
        products: catalog.filter(&filter).into_iter().cloned().collect(),
        categories: catalog.categories().into_iter().map(String::from).collect(),
        tags: catalog.tags().into_iter().map(String::from).collect(),
    })
}

pub async fn detail(State(s): State<AppState>, Path(id): Path<u32>) -> Result<Json<Product>, AppError> {
    s.catalog()
        .find(ProductId::new(id))
        .cloned()
        .map(Json)
        .ok_or(AppError::Domain(StorefrontError::ProductNotFound))
}

pub async fn category(State(s): State<AppState>, Path(category): Path<String>) -> Json<CategoryPage> {
    let products = s.catalog().by_category(&category).into_iter().cloned().collect();
    Json(CategoryPage { title: category_title(&category), category, products })
}
