//! Roles and status enums mirrored from the marketplace backend.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Error returned when a role string is not one the marketplace knows.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct RoleParseError(pub String);

/// Account role, as carried in the backend's auth payload.
///
/// Route gating compares against these; anything the backend sends that is
/// not listed here is rejected at login rather than treated as a customer.
/// Deserialization goes through [`FromStr`], so the backend's aliases
/// (`customer`, `vendor`, `superadmin`) are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Shopper account.
    User,
    /// Store owner with a seller dashboard.
    Seller,
    /// Back-office administrator.
    Admin,
}

impl UserRole {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Seller => "seller",
            Self::Admin => "admin",
        }
    }

    /// Whether this role can open the seller dashboard.
    #[must_use]
    pub const fn can_sell(self) -> bool {
        matches!(self, Self::Seller | Self::Admin)
    }

    /// Whether this role can open the admin back-office.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "customer" | "buyer" => Ok(Self::User),
            "seller" | "vendor" => Ok(Self::Seller),
            "admin" | "superadmin" | "super_admin" => Ok(Self::Admin),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Seller onboarding state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SellerStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Suspended,
}

/// Boost (promotion) request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoostStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Active,
    Expired,
}

/// Order lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

/// Payment state of an order, invoice or subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Success,
    Failed,
    Abandoned,
    Refunded,
}

/// Admin decision on a pending seller or boost request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    /// Resulting seller status.
    #[must_use]
    pub const fn seller_status(self) -> SellerStatus {
        match self {
            Self::Approve => SellerStatus::Approved,
            Self::Reject => SellerStatus::Rejected,
        }
    }

    /// Resulting boost status.
    #[must_use]
    pub const fn boost_status(self) -> BoostStatus {
        match self {
            Self::Approve => BoostStatus::Approved,
            Self::Reject => BoostStatus::Rejected,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_aliases() {
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("vendor".parse::<UserRole>().unwrap(), UserRole::Seller);
        assert_eq!(" user ".parse::<UserRole>().unwrap(), UserRole::User);
        assert_eq!(
            "guest".parse::<UserRole>(),
            Err(RoleParseError("guest".to_string()))
        );
    }

    #[test]
    fn test_role_deserialize_uses_aliases() {
        let role: UserRole = serde_json::from_str("\"SuperAdmin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"admin\"");
        assert!(serde_json::from_str::<UserRole>("\"guest\"").is_err());
    }

    #[test]
    fn test_role_capabilities() {
        assert!(UserRole::Admin.can_sell());
        assert!(UserRole::Seller.can_sell());
        assert!(!UserRole::User.can_sell());
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Seller.is_admin());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&SellerStatus::Approved).unwrap(),
            "\"approved\""
        );
        let status: BoostStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(status, BoostStatus::Active);
        assert_eq!(
            ReviewDecision::Reject.seller_status(),
            SellerStatus::Rejected
        );
    }
}
