//! NSE index payload types

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Response of `/api/equity-stockIndices`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSnapshot {
    /// Index name, e.g. "NIFTY 50"
    #[serde(default)]
    pub name: Option<String>,
    /// Last update, `DD-Mon-YYYY HH:MM:SS` IST
    #[serde(default)]
    pub timestamp: Option<String>,
    /// One row for the index itself followed by its constituents
    #[serde(default)]
    pub data: Vec<IndexRow>,
}

/// A single row of the index table
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRow {
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub open: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub day_high: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub day_low: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub last_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub previous_close: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub change: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub p_change: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total_traded_volume: Option<Decimal>,
    #[serde(default)]
    pub last_update_time: Option<String>,
}

/// Accept a JSON number or numeric string; anything else becomes `None`
///
/// NSE uses placeholders such as `"-"` for missing values.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        serde_json::Value::String(s) => Decimal::from_str(s.trim().replace(',', "").as_str()).ok(),
        _ => None,
    })
}
