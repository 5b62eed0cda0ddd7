//! Product DTO.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Extra, StoreRef, de};
use crate::types::ProductId;

/// A catalogue product as returned by the backend.
///
/// The allocation heuristic reads `rating`, `sales`, `created_at`, `price`,
/// `discount` and `store`; everything else is carried for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: ProductId,
    #[serde(default, alias = "title")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Decimal>,
    #[serde(default, deserialize_with = "de::flag", alias = "isDiscounted")]
    pub discount: bool,
    /// Average rating, 0 to 5.
    #[serde(default, deserialize_with = "de::number", alias = "averageRating")]
    pub rating: f64,
    /// Units sold.
    #[serde(
        default,
        deserialize_with = "de::number",
        alias = "sold",
        alias = "totalSold",
        alias = "salesCount"
    )]
    pub sales: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "seller")]
    pub store: Option<StoreRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Product {
    /// Minimal product, mostly useful in tests and fixtures.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            price: Decimal::ZERO,
            discount_price: None,
            discount: false,
            rating: 0.0,
            sales: 0.0,
            created_at: None,
            updated_at: None,
            store: None,
            images: Vec::new(),
            extra: Extra::new(),
        }
    }

    /// Whether the product is on offer: flagged, or priced below list.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.discount
            || self
                .discount_price
                .is_some_and(|d| d > Decimal::ZERO && d < self.price)
    }

    /// Whether the product belongs to a store the backend populated by name.
    #[must_use]
    pub fn has_known_store(&self) -> bool {
        self.store.as_ref().is_some_and(StoreRef::is_known)
    }

    /// Price a shopper pays: the discount price when one applies.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.discount_price {
            Some(d) if d > Decimal::ZERO && d < self.price => d,
            _ => self.price,
        }
    }

    /// Path segment used in storefront URLs (`/product/{handle}`).
    #[must_use]
    pub fn handle(&self) -> &str {
        self.slug
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.id.as_str())
    }

    /// Most recent timestamp known for the product.
    #[must_use]
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_shape() {
        let json = r#"{
            "_id": "p1",
            "name": "Ankara Tote",
            "slug": "ankara-tote",
            "price": 15000,
            "discountPrice": "12000",
            "averageRating": 4.5,
            "sold": 12,
            "createdAt": "2026-10-01T10:00:00Z",
            "store": {"_id": "s1", "name": "Lagos Crafts"},
            "stock": 4
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert!(product.is_discounted());
        assert!(!product.discount);
        assert!(product.has_known_store());
        assert!((product.rating - 4.5).abs() < f64::EPSILON);
        assert!((product.sales - 12.0).abs() < f64::EPSILON);
        assert_eq!(product.effective_price(), Decimal::from(12_000));
        assert_eq!(product.handle(), "ankara-tote");
        assert_eq!(product.extra.get("stock"), Some(&serde_json::json!(4)));
    }

    #[test]
    fn test_lenient_flags_and_store_id() {
        let json = r#"{"id": "p2", "discount": 15, "rating": null, "store": "s9"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.discount);
        assert!(product.rating.abs() < f64::EPSILON);
        assert!(!product.has_known_store());
        assert_eq!(product.handle(), "p2");
    }

    #[test]
    fn test_serialize_keeps_extra_fields() {
        let json = r#"{"_id": "p3", "name": "Shea Butter", "brand": "Kano"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        let out = serde_json::to_value(&product).unwrap();
        assert_eq!(out["id"], "p3");
        assert_eq!(out["brand"], "Kano");
    }
}
