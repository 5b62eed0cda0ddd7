//! Store and seller onboarding DTOs.

use serde::{Deserialize, Serialize};

use super::Extra;
use crate::types::{Email, SellerStatus, StoreId};
use crate::validation::{self, ValidationError};

/// A populated store reference embedded in product payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    #[serde(default, alias = "_id")]
    pub id: StoreId,
    #[serde(default, alias = "storeName", alias = "businessName")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SellerStatus>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Store field on a product: populated object or bare id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreRef {
    Summary(StoreSummary),
    Id(StoreId),
}

impl StoreRef {
    /// A store is "known" when the backend populated it with a name.
    #[must_use]
    pub fn is_known(&self) -> bool {
        match self {
            Self::Summary(store) => !store.name.trim().is_empty(),
            Self::Id(_) => false,
        }
    }
}

/// Seller onboarding form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerApplication {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: String,
    pub password: String,
    pub store_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl SellerApplication {
    /// Apply the onboarding form rules.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::require("firstName", &self.first_name)?;
        validation::require("lastName", &self.last_name)?;
        validation::require("storeName", &self.store_name)?;
        validation::phone(&self.phone)?;
        validation::password(&self.password)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn application() -> SellerApplication {
        serde_json::from_value(serde_json::json!({
            "firstName": "Ngozi",
            "lastName": "Okafor",
            "email": "ngozi@shop.ng",
            "phone": "+234 803 123 4567",
            "password": "longenough",
            "storeName": "Ngozi Naturals",
            "bankCode": "058"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_application() {
        let app = application();
        assert!(app.validate().is_ok());
        assert_eq!(app.extra.get("bankCode"), Some(&serde_json::json!("058")));
    }

    #[test]
    fn test_application_rules() {
        let mut app = application();
        app.password = "short".to_string();
        assert!(matches!(
            app.validate(),
            Err(ValidationError::PasswordTooShort { .. })
        ));

        let mut app = application();
        app.store_name = "  ".to_string();
        assert!(matches!(
            app.validate(),
            Err(ValidationError::Required(field)) if field == "storeName"
        ));
    }

    #[test]
    fn test_store_ref_untagged() {
        let id: StoreRef = serde_json::from_str("\"s1\"").unwrap();
        assert!(!id.is_known());
        let populated: StoreRef = serde_json::from_str(r#"{"_id":"s1","storeName":"Aba Shoes"}"#).unwrap();
        assert!(populated.is_known());
    }
}
