//! Subscription, invoice, settlement and payment-split DTOs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Extra;
use crate::types::{Email, InvoiceId, PaymentStatus, PlanId, SettlementId, StoreId};
use crate::validation::{self, ValidationError};

/// A seller subscription plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    #[serde(alias = "_id")]
    pub id: PlanId,
    pub name: String,
    pub price: Decimal,
    /// Billing interval as the gateway names it (`monthly`, `annually`).
    #[serde(default)]
    pub interval: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "planCode")]
    pub paystack_plan_code: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A subscription or boost invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(alias = "_id")]
    pub id: InvoiceId,
    pub amount: Decimal,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A periodic payout reconciling a seller's balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    #[serde(alias = "_id")]
    pub id: SettlementId,
    #[serde(default, alias = "seller")]
    pub store: Option<StoreId>,
    pub amount: Decimal,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_end: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A payment-splitting account registered with the gateway for one seller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subaccount {
    pub business_name: String,
    pub settlement_bank: String,
    pub account_number: String,
    /// Share of each sale routed to the seller, in percent.
    pub percentage_charge: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subaccount_code: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Subaccount {
    /// Subaccount form rules.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::require("businessName", &self.business_name)?;
        validation::require("settlementBank", &self.settlement_bank)?;
        if self.account_number.len() != 10 || !self.account_number.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ValidationError::Invalid(
                "account number must be 10 digits".to_string(),
            ));
        }
        if self.percentage_charge <= Decimal::ZERO || self.percentage_charge > Decimal::ONE_HUNDRED {
            return Err(ValidationError::Invalid(
                "percentage charge must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }
}

/// Body sent to the backend to start a Paystack transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitialization {
    pub email: Email,
    /// Amount in minor units (kobo).
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn subaccount() -> Subaccount {
        serde_json::from_value(serde_json::json!({
            "businessName": "Aba Shoes",
            "settlementBank": "058",
            "accountNumber": "0123456789",
            "percentageCharge": 90
        }))
        .unwrap()
    }

    #[test]
    fn test_subaccount_rules() {
        assert!(subaccount().validate().is_ok());

        let mut bad = subaccount();
        bad.account_number = "12345".to_string();
        assert!(bad.validate().is_err());

        let mut bad = subaccount();
        bad.percentage_charge = Decimal::from(120);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_plan_code_alias() {
        let plan: SubscriptionPlan = serde_json::from_value(serde_json::json!({
            "_id": "plan1",
            "name": "Gold",
            "price": "15000",
            "interval": "monthly",
            "planCode": "PLN_abc"
        }))
        .unwrap();
        assert_eq!(plan.paystack_plan_code.as_deref(), Some("PLN_abc"));
    }
}
