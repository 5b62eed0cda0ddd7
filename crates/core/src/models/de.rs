//! Lenient deserializers for fields the backend is inconsistent about.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagOrNumber {
    Flag(bool),
    Number(f64),
    Text(String),
}

/// Accept `true`/`false`, a number (non-zero means set) or `"true"`/`"false"`.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FlagOrNumber>::deserialize(deserializer)? {
        None => false,
        Some(FlagOrNumber::Flag(b)) => b,
        Some(FlagOrNumber::Number(n)) => n > 0.0,
        Some(FlagOrNumber::Text(s)) => matches!(s.trim(), "true" | "1" | "yes"),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accept a number, a numeric string or null (null and garbage read as 0).
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) if n.is_finite() => n,
        Some(NumberOrText::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    })
}
