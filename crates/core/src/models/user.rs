//! User account DTO.

use serde::{Deserialize, Serialize};

use super::Extra;
use crate::types::{Email, UserId, UserRole};

/// A user as returned by the backend auth and admin endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub email: Email,
    #[serde(default, alias = "firstName", alias = "fullName")]
    pub name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}
