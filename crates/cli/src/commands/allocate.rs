//! Offline run of the allocation heuristic.
//!
//! Reads a product export and prints the sections the storefront would
//! show, so tier tuning can be checked without deploying.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use souk_core::allocation::{AllocationConfig, ProductAllocation, allocate_products};
use souk_core::models::Product;

use super::{CommandError, emit};

/// Accepted input shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AllocateInput {
    Wrapped {
        products: Vec<Product>,
        #[serde(default)]
        config: Option<AllocationConfig>,
    },
    Bare(Vec<Product>),
}

impl AllocateInput {
    fn into_parts(self) -> (Vec<Product>, AllocationConfig) {
        match self {
            Self::Wrapped { products, config } => (products, config.unwrap_or_default()),
            Self::Bare(products) => (products, AllocationConfig::default()),
        }
    }
}

fn allocate_json(raw: &str, now: DateTime<Utc>) -> Result<ProductAllocation, CommandError> {
    let input: AllocateInput = serde_json::from_str(raw)?;
    let (products, config) = input.into_parts();
    config.validate()?;
    Ok(allocate_products(&products, now, &config))
}

/// Allocate the products in `input` and print the result as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a product list.
pub fn run(input: &Path, now: DateTime<Utc>, stats_only: bool) -> Result<(), CommandError> {
    let raw = std::fs::read_to_string(input).map_err(|e| CommandError::io(input, e))?;
    let allocation = allocate_json(&raw, now)?;
    let stats = allocation.stats();

    tracing::info!(
        total = stats.total,
        platinum = stats.platinum,
        gold = stats.gold,
        silver = stats.silver,
        discounted = stats.discounted,
        "Allocation complete"
    );

    let output = if stats_only {
        serde_json::to_string_pretty(&stats)?
    } else {
        serde_json::to_string_pretty(&serde_json::json!({
            "data": allocation,
            "stats": stats,
        }))?
    };
    emit(None, &output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_json_shapes() {
        let now = Utc::now();
        let bare = r#"[{"_id":"p1","name":"Adire scarf","price":"4500"}]"#;
        let allocation = allocate_json(bare, now).unwrap();
        assert_eq!(allocation.stats().total, 1);

        let wrapped = r#"{"products":[{"_id":"p1","name":"Adire scarf","price":"4500"}],"config":{"platinumPercent":100}}"#;
        let allocation = allocate_json(wrapped, now).unwrap();
        assert_eq!(allocation.stats().total, 1);

        assert!(allocate_json(r#"{"items":[]}"#, now).is_err());

        let oversized = r#"{"products":[],"config":{"goldPercent":4294967295}}"#;
        assert!(matches!(
            allocate_json(oversized, now),
            Err(CommandError::Config(_))
        ));
    }
}
