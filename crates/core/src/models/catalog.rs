//! Category and news (CMS) DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Extra;
use crate::types::{CategoryId, NewsId};
use crate::validation::{self, ValidationError};

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default, alias = "_id", skip_serializing_if = "CategoryId::is_empty")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<CategoryId>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Category {
    /// Category form rules.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] when the name is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::require("name", &self.name)
    }
}

/// A news/blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    #[serde(default, alias = "_id", skip_serializing_if = "NewsId::is_empty")]
    pub id: NewsId,
    pub title: String,
    #[serde(default, alias = "body")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl News {
    /// News form rules.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] for a blank title or body.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::require("title", &self.title)?;
        validation::require("content", &self.content)
    }
}
