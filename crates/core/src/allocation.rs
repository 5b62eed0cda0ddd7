//! Product allocation for the home page sections.
//!
//! Every product gets an additive score from independent signals, the list is
//! ranked by score, and the ranking is sliced into four display sections:
//!
//! | section    | share | fill order |
//! |------------|-------|------------|
//! | discounted | 20%   | 1st, discounted products only, then backfilled last |
//! | platinum   | 15%   | 2nd |
//! | gold       | 25%   | 3rd |
//! | silver     | 30%   | 4th |
//!
//! Section capacity is `ceil(share * unique products)`. A product lands in at
//! most one section; whatever does not fit is returned as `unallocated`.
//!
//! # Scoring
//!
//! | signal       | points |
//! |--------------|--------|
//! | rating 0-5   | 0-30, linear |
//! | units sold   | 0-25, linear up to 100 units |
//! | age          | 20 (<= 7d), 15 (<= 30d), 10 (<= 90d), 5 otherwise |
//! | price        | 15 (>= 100k), 10 (>= 50k), 5 (>= 10k), 0 |
//! | discounted   | +10 |
//! | known store  | +5 |
//!
//! The total is capped at 100. Ranking is a stable sort, so equal scores keep
//! input order and the same input always yields the same sections.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::validation::ValidationError;

/// Highest score a product can reach.
pub const MAX_SCORE: u32 = 100;

/// Tunables for scoring and section sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllocationConfig {
    /// Section shares in percent of unique products.
    pub platinum_percent: u32,
    pub gold_percent: u32,
    pub silver_percent: u32,
    pub discounted_percent: u32,
    pub max_rating_points: u32,
    pub max_sales_points: u32,
    /// Units sold at which the sales signal saturates.
    pub sales_cap: u32,
    /// Age thresholds in days with the points awarded at or under each.
    pub recency_tiers: Vec<(i64, u32)>,
    /// Points for products older than every recency tier, or undated.
    pub stale_points: u32,
    /// Price floors (major units) with their points, highest first.
    pub price_tiers: Vec<(Decimal, u32)>,
    pub discount_points: u32,
    pub known_store_points: u32,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            platinum_percent: 15,
            gold_percent: 25,
            silver_percent: 30,
            discounted_percent: 20,
            max_rating_points: 30,
            max_sales_points: 25,
            sales_cap: 100,
            recency_tiers: vec![(7, 20), (30, 15), (90, 10)],
            stale_points: 5,
            price_tiers: vec![
                (Decimal::from(100_000), 15),
                (Decimal::from(50_000), 10),
                (Decimal::from(10_000), 5),
            ],
            discount_points: 10,
            known_store_points: 5,
        }
    }
}

impl AllocationConfig {
    /// Reject shares above 100% and point values above [`MAX_SCORE`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let percents = [
            ("platinumPercent", self.platinum_percent),
            ("goldPercent", self.gold_percent),
            ("silverPercent", self.silver_percent),
            ("discountedPercent", self.discounted_percent),
        ];
        if let Some((field, _)) = percents.iter().find(|(_, percent)| *percent > 100) {
            return Err(ValidationError::Invalid(format!(
                "{field} must be at most 100"
            )));
        }

        let points = [
            ("maxRatingPoints", self.max_rating_points),
            ("maxSalesPoints", self.max_sales_points),
            ("stalePoints", self.stale_points),
            ("discountPoints", self.discount_points),
            ("knownStorePoints", self.known_store_points),
        ]
        .into_iter()
        .chain(self.recency_tiers.iter().map(|&(_, p)| ("recencyTiers", p)))
        .chain(self.price_tiers.iter().map(|&(_, p)| ("priceTiers", p)));
        for (field, value) in points {
            if value > MAX_SCORE {
                return Err(ValidationError::Invalid(format!(
                    "{field} must be at most {MAX_SCORE}"
                )));
            }
        }
        Ok(())
    }
}

/// Capacity of each section for a given number of unique products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSizes {
    pub platinum: usize,
    pub gold: usize,
    pub silver: usize,
    pub discounted: usize,
}

/// Compute `ceil(total * percent / 100)` for every section, never more than
/// `total`.
#[must_use]
pub fn section_sizes(total: usize, config: &AllocationConfig) -> SectionSizes {
    let share = |percent: u32| {
        total
            .saturating_mul(percent as usize)
            .div_ceil(100)
            .min(total)
    };
    SectionSizes {
        platinum: share(config.platinum_percent),
        gold: share(config.gold_percent),
        silver: share(config.silver_percent),
        discounted: share(config.discounted_percent),
    }
}

/// Score a product between 0 and [`MAX_SCORE`].
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn score_product(product: &Product, now: DateTime<Utc>, config: &AllocationConfig) -> u32 {
    let linear = |value: f64, max_value: f64, max_points: u32| -> u32 {
        if !value.is_finite() || max_value <= 0.0 {
            return 0;
        }
        // value is clamped to [0, max_value], so the result fits in max_points
        (value.clamp(0.0, max_value) / max_value * f64::from(max_points)).round() as u32
    };

    let rating = linear(product.rating, 5.0, config.max_rating_points);
    let sales = linear(
        product.sales,
        f64::from(config.sales_cap),
        config.max_sales_points,
    );

    let recency = product.created_at.map_or(config.stale_points, |created| {
        let age_days = (now - created).num_days().max(0);
        config
            .recency_tiers
            .iter()
            .find(|(days, _)| age_days <= *days)
            .map_or(config.stale_points, |(_, points)| *points)
    });

    let price = config
        .price_tiers
        .iter()
        .find(|(floor, _)| product.price >= *floor)
        .map_or(0, |(_, points)| *points);

    let discount = if product.is_discounted() {
        config.discount_points
    } else {
        0
    };
    let store = if product.has_known_store() {
        config.known_store_points
    } else {
        0
    };

    [rating, sales, recency, price, discount, store]
        .into_iter()
        .fold(0_u32, u32::saturating_add)
        .min(MAX_SCORE)
}

/// The four display sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sections {
    pub platinum: Vec<Product>,
    pub gold: Vec<Product>,
    pub silver: Vec<Product>,
    pub discounted: Vec<Product>,
}

/// Result of [`allocate_products`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductAllocation {
    pub platinum: Vec<Product>,
    pub gold: Vec<Product>,
    pub silver: Vec<Product>,
    pub discounted: Vec<Product>,
    pub unallocated: Vec<Product>,
}

/// Section counts for an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationStats {
    pub total: usize,
    pub platinum: usize,
    pub gold: usize,
    pub silver: usize,
    pub discounted: usize,
    pub unallocated: usize,
}

impl ProductAllocation {
    /// Count products per section.
    #[must_use]
    pub fn stats(&self) -> AllocationStats {
        AllocationStats {
            total: self.platinum.len()
                + self.gold.len()
                + self.silver.len()
                + self.discounted.len()
                + self.unallocated.len(),
            platinum: self.platinum.len(),
            gold: self.gold.len(),
            silver: self.silver.len(),
            discounted: self.discounted.len(),
            unallocated: self.unallocated.len(),
        }
    }

    /// Drop the leftovers and keep the display sections.
    #[must_use]
    pub fn into_sections(self) -> Sections {
        Sections {
            platinum: self.platinum,
            gold: self.gold,
            silver: self.silver,
            discounted: self.discounted,
        }
    }
}

/// Take up to `limit` products from `ranked`, in rank order, that are not yet
/// used and satisfy `eligible`. Marks what it takes as used.
fn take<'a>(
    ranked: &[&'a Product],
    used: &mut HashSet<&'a str>,
    limit: usize,
    eligible: impl Fn(&Product) -> bool,
) -> Vec<Product> {
    let mut picked = Vec::with_capacity(limit.min(ranked.len()));
    for &product in ranked {
        if picked.len() >= limit {
            break;
        }
        let id = product.id.as_str();
        if !used.contains(id) && eligible(product) {
            used.insert(id);
            picked.push(product.clone());
        }
    }
    picked
}

/// Sort products into the display sections.
///
/// Duplicate ids in the input are collapsed to their first occurrence before
/// anything else happens. `now` anchors the recency signal.
#[must_use]
pub fn allocate_products(
    products: &[Product],
    now: DateTime<Utc>,
    config: &AllocationConfig,
) -> ProductAllocation {
    let mut seen = HashSet::new();
    let mut scored: Vec<(u32, &Product)> = products
        .iter()
        .filter(|p| seen.insert(p.id.as_str()))
        .map(|p| (score_product(p, now, config), p))
        .collect();

    if scored.is_empty() {
        return ProductAllocation::default();
    }

    // stable: equal scores keep input order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    let ranked: Vec<&Product> = scored.into_iter().map(|(_, p)| p).collect();
    let sizes = section_sizes(ranked.len(), config);

    let mut used = HashSet::with_capacity(ranked.len());
    let mut discounted = take(&ranked, &mut used, sizes.discounted, Product::is_discounted);
    let platinum = take(&ranked, &mut used, sizes.platinum, |_| true);
    let gold = take(&ranked, &mut used, sizes.gold, |_| true);
    let silver = take(&ranked, &mut used, sizes.silver, |_| true);
    let backfill = sizes.discounted.saturating_sub(discounted.len());
    discounted.extend(take(&ranked, &mut used, backfill, |_| true));

    let unallocated = ranked
        .iter()
        .filter(|p| !used.contains(p.id.as_str()))
        .map(|p| (*p).clone())
        .collect();

    ProductAllocation {
        platinum,
        gold,
        silver,
        discounted,
        unallocated,
    }
}

/// Strip duplicates from four sections chosen elsewhere.
///
/// The first occurrence wins in priority order platinum, gold, silver,
/// discounted; repeats inside one section are dropped as well.
#[must_use]
pub fn ensure_no_product_duplicate_across_sections(
    platinum: Vec<Product>,
    gold: Vec<Product>,
    silver: Vec<Product>,
    discounted: Vec<Product>,
) -> Sections {
    let mut seen: HashSet<String> = HashSet::new();
    let mut keep = |section: Vec<Product>| -> Vec<Product> {
        section
            .into_iter()
            .filter(|p| seen.insert(p.id.as_str().to_owned()))
            .collect()
    };

    Sections {
        platinum: keep(platinum),
        gold: keep(gold),
        silver: keep(silver),
        discounted: keep(discounted),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::models::{StoreRef, StoreSummary};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn product(id: &str) -> Product {
        Product::new(id, format!("Product {id}"))
    }

    fn known_store() -> StoreRef {
        StoreRef::Summary(StoreSummary {
            id: "s1".into(),
            name: "Lagos Crafts".to_string(),
            slug: None,
            logo: None,
            status: None,
            extra: serde_json::Map::new(),
        })
    }

    /// Deterministic mixed catalogue of `n` products.
    fn catalogue(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| {
                let mut p = product(&format!("p{i}"));
                p.rating = (i % 6) as f64;
                p.sales = ((i * 37) % 140) as f64;
                p.price = Decimal::from((i as i64 * 7_919) % 150_000);
                p.discount = i % 4 == 0;
                p.created_at = Some(now() - Duration::days(((i * 13) % 200) as i64));
                if i % 3 == 0 {
                    p.store = Some(known_store());
                }
                p
            })
            .collect()
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    fn all_ids(allocation: &ProductAllocation) -> Vec<&str> {
        [
            &allocation.platinum,
            &allocation.gold,
            &allocation.silver,
            &allocation.discounted,
            &allocation.unallocated,
        ]
        .into_iter()
        .flat_map(|s| ids(s))
        .collect()
    }

    #[test]
    fn test_score_components() {
        let config = AllocationConfig::default();
        let mut p = product("a");
        assert_eq!(score_product(&p, now(), &config), 5);

        p.rating = 5.0;
        assert_eq!(score_product(&p, now(), &config), 35);

        p.sales = 50.0;
        assert_eq!(score_product(&p, now(), &config), 48);

        p.created_at = Some(now() - Duration::days(3));
        assert_eq!(score_product(&p, now(), &config), 63);

        p.price = Decimal::from(60_000);
        assert_eq!(score_product(&p, now(), &config), 73);

        p.discount = true;
        assert_eq!(score_product(&p, now(), &config), 83);

        p.store = Some(known_store());
        assert_eq!(score_product(&p, now(), &config), 88);
    }

    #[test]
    fn test_score_caps_and_clamps() {
        let config = AllocationConfig::default();
        let mut p = product("max");
        p.rating = 9.0;
        p.sales = 10_000.0;
        p.created_at = Some(now());
        p.price = Decimal::from(1_000_000);
        p.discount = true;
        p.store = Some(known_store());
        assert_eq!(score_product(&p, now(), &config), MAX_SCORE);

        let mut negative = product("neg");
        negative.rating = -3.0;
        negative.sales = f64::NAN;
        assert_eq!(score_product(&negative, now(), &config), 5);
    }

    #[test]
    fn test_recency_tiers() {
        let config = AllocationConfig::default();
        let at_age = |days: i64| {
            let mut p = product("r");
            p.created_at = Some(now() - Duration::days(days));
            score_product(&p, now(), &config)
        };
        assert_eq!(at_age(0), 20);
        assert_eq!(at_age(7), 20);
        assert_eq!(at_age(8), 15);
        assert_eq!(at_age(30), 15);
        assert_eq!(at_age(90), 10);
        assert_eq!(at_age(91), 5);
        // future timestamps count as brand new
        assert_eq!(at_age(-5), 20);
    }

    #[test]
    fn test_section_sizes_ceil() {
        let config = AllocationConfig::default();
        assert_eq!(
            section_sizes(20, &config),
            SectionSizes {
                platinum: 3,
                gold: 5,
                silver: 6,
                discounted: 4
            }
        );
        assert_eq!(
            section_sizes(1, &config),
            SectionSizes {
                platinum: 1,
                gold: 1,
                silver: 1,
                discounted: 1
            }
        );
        assert_eq!(section_sizes(0, &config).platinum, 0);
    }

    #[test]
    fn test_empty_input() {
        let allocation = allocate_products(&[], now(), &AllocationConfig::default());
        assert_eq!(allocation, ProductAllocation::default());
        assert_eq!(allocation.stats().total, 0);
    }

    #[test]
    fn test_no_duplicates_and_subset_for_many_sizes() {
        let config = AllocationConfig::default();
        for n in 0..80 {
            let input = catalogue(n);
            let allocation = allocate_products(&input, now(), &config);
            let out = all_ids(&allocation);

            let unique: HashSet<&str> = out.iter().copied().collect();
            assert_eq!(unique.len(), out.len(), "duplicate id for n={n}");

            let input_ids: HashSet<&str> = ids(&input).into_iter().collect();
            assert!(unique.is_subset(&input_ids), "foreign id for n={n}");
            assert_eq!(unique.len(), input_ids.len(), "lost a product for n={n}");
        }
    }

    #[test]
    fn test_section_sizes_match_shares() {
        let config = AllocationConfig::default();
        let allocation = allocate_products(&catalogue(100), now(), &config);
        let stats = allocation.stats();
        assert_eq!(stats.platinum, 15);
        assert_eq!(stats.gold, 25);
        assert_eq!(stats.silver, 30);
        assert_eq!(stats.discounted, 20);
        assert_eq!(stats.unallocated, 10);
        assert_eq!(stats.total, 100);
    }

    #[test]
    fn test_small_input_starves_later_sections() {
        let config = AllocationConfig::default();
        let allocation = allocate_products(&catalogue(3), now(), &config);
        let stats = allocation.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.unallocated, 0);
        assert!(stats.platinum <= 1 && stats.gold <= 1 && stats.silver <= 1);
    }

    #[test]
    fn test_duplicate_input_ids_collapse() {
        let config = AllocationConfig::default();
        let mut input = catalogue(10);
        input.extend(catalogue(10));
        let allocation = allocate_products(&input, now(), &config);
        assert_eq!(allocation.stats().total, 10);
        assert_eq!(section_sizes(10, &config).platinum, allocation.platinum.len());
    }

    #[test]
    fn test_discounted_products_prefer_discounted_section() {
        let config = AllocationConfig::default();
        let mut input: Vec<Product> = (0..10).map(|i| product(&format!("p{i}"))).collect();
        // a top scorer that is also discounted
        input[0].rating = 5.0;
        input[0].sales = 100.0;
        input[0].discount = true;
        input[5].discount_price = Some(Decimal::from(10));
        input[5].price = Decimal::from(20);

        let allocation = allocate_products(&input, now(), &config);
        let discounted = ids(&allocation.discounted);
        assert!(discounted.contains(&"p0"));
        assert!(discounted.contains(&"p5"));
        assert!(!ids(&allocation.platinum).contains(&"p0"));
    }

    #[test]
    fn test_discounted_section_is_backfilled() {
        let config = AllocationConfig::default();
        let input: Vec<Product> = (0..10).map(|i| product(&format!("p{i}"))).collect();
        let allocation = allocate_products(&input, now(), &config);
        // 2 + 3 + 3 fill the ranked sections, the remaining 2 backfill discounted
        assert_eq!(allocation.discounted.len(), 2);
        assert!(allocation.unallocated.is_empty());
    }

    #[test]
    fn test_ranking_orders_platinum_first() {
        let config = AllocationConfig::default();
        let mut input: Vec<Product> = (0..20).map(|i| product(&format!("p{i}"))).collect();
        input[17].rating = 5.0;
        input[11].rating = 4.0;
        input[3].rating = 3.0;

        let allocation = allocate_products(&input, now(), &config);
        assert_eq!(ids(&allocation.platinum), vec!["p17", "p11", "p3"]);
        // ties keep input order
        assert_eq!(ids(&allocation.gold), vec!["p0", "p1", "p2", "p4", "p5"]);
    }

    #[test]
    fn test_allocation_is_deterministic() {
        let config = AllocationConfig::default();
        let input = catalogue(57);
        let first = allocate_products(&input, now(), &config);
        let second = allocate_products(&input, now(), &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ensure_no_duplicates_priority() {
        let sections = ensure_no_product_duplicate_across_sections(
            vec![product("a"), product("b")],
            vec![product("b"), product("c"), product("c")],
            vec![product("a"), product("d")],
            vec![product("d"), product("e")],
        );
        assert_eq!(ids(&sections.platinum), vec!["a", "b"]);
        assert_eq!(ids(&sections.gold), vec!["c"]);
        assert_eq!(ids(&sections.silver), vec!["d"]);
        assert_eq!(ids(&sections.discounted), vec!["e"]);
    }

    #[test]
    fn test_config_validate_bounds() {
        assert!(AllocationConfig::default().validate().is_ok());

        let config: AllocationConfig =
            serde_json::from_str(r#"{"platinumPercent": 4294967295}"#).unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::Invalid(
                "platinumPercent must be at most 100".to_string()
            ))
        );

        let config = AllocationConfig {
            price_tiers: vec![(Decimal::ZERO, MAX_SCORE + 1)],
            ..AllocationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_config_stays_bounded() {
        let config = AllocationConfig {
            platinum_percent: u32::MAX,
            gold_percent: u32::MAX,
            ..AllocationConfig::default()
        };
        let sizes = section_sizes(3, &config);
        assert_eq!(sizes.platinum, 3);
        assert_eq!(sizes.gold, 3);

        let allocation = allocate_products(&catalogue(3), now(), &config);
        assert_eq!(allocation.platinum.len() + allocation.discounted.len(), 3);
        assert!(allocation.unallocated.is_empty());
        assert_eq!(allocation.stats().total, 3);
    }

    #[test]
    fn test_huge_points_saturate_at_cap() {
        let config = AllocationConfig {
            max_rating_points: u32::MAX,
            stale_points: u32::MAX,
            ..AllocationConfig::default()
        };
        let mut p = product("p1");
        p.rating = 5.0;
        assert_eq!(score_product(&p, now(), &config), MAX_SCORE);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: AllocationConfig =
            serde_json::from_str(r#"{"platinumPercent": 10}"#).unwrap();
        assert_eq!(config.platinum_percent, 10);
        assert_eq!(config.gold_percent, 25);
    }
}
