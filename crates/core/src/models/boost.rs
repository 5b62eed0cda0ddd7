//! Boost (promotion) request DTOs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Extra;
use crate::types::{BoostRequestId, BoostStatus, PlanId, ProductId};
use crate::validation::{self, ValidationError};

/// A seller's request to feature products for a time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostRequest {
    #[serde(alias = "_id")]
    pub id: BoostRequestId,
    #[serde(default, alias = "productIds")]
    pub products: Vec<ProductId>,
    #[serde(default)]
    pub status: BoostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl BoostRequest {
    /// Whether the boost window covers `now`.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, BoostStatus::Approved | BoostStatus::Active)
            && self.start_date.is_none_or(|start| start <= now)
            && self.end_date.is_none_or(|end| now < end)
    }
}

/// Body of a new boost request from the seller dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBoostRequest {
    #[serde(alias = "productIds")]
    pub products: Vec<ProductId>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewBoostRequest {
    /// Boost form rules.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.products.is_empty() {
            return Err(ValidationError::EmptySelection("product".to_string()));
        }
        validation::date_range(self.start_date, self.end_date)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_new_boost_request_rules() {
        let now = Utc::now();
        let mut req = NewBoostRequest {
            products: vec![],
            start_date: now,
            end_date: now + Duration::days(3),
            plan: None,
            note: None,
        };
        assert_eq!(
            req.validate(),
            Err(ValidationError::EmptySelection("product".to_string()))
        );
        req.products.push(ProductId::new("p1"));
        assert!(req.validate().is_ok());
        req.end_date = now - Duration::days(1);
        assert_eq!(req.validate(), Err(ValidationError::InvalidDateRange));
    }

    #[test]
    fn test_is_live() {
        let now = Utc::now();
        let boost: BoostRequest = serde_json::from_value(serde_json::json!({
            "_id": "b1",
            "productIds": ["p1"],
            "status": "approved",
            "startDate": (now - Duration::days(1)).to_rfc3339(),
            "endDate": (now + Duration::days(1)).to_rfc3339(),
        }))
        .unwrap();
        assert!(boost.is_live(now));
        assert!(!boost.is_live(now + Duration::days(2)));
    }
}
