//! Cache types for public catalogue responses.

use souk_core::models::{Category, Page, Product};

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Page<Product>),
    Categories(Vec<Category>),
    Settings(serde_json::Value),
}

/// Cache key for a product detail.
pub fn product_key(slug: &str) -> String {
    format!("product:{slug}")
}

/// Cache key for a catalogue page. Search queries are never cached.
pub fn products_key(page: u32, take: u32, category: Option<&str>) -> String {
    format!("products:{page}:{take}:{}", category.unwrap_or(""))
}

pub const CATEGORIES_KEY: &str = "categories";
pub const SETTINGS_KEY: &str = "settings";
