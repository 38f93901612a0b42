use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 行情接口返回的单日记录，字段均可能缺失
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockDailyRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub volume: Option<f64>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub exchange_code: Option<String>,
    #[serde(default)]
    pub price_currency: Option<String>,
}

/// End-of-day payload, newest record first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EodResponse {
    #[serde(deserialize_with = "lenient_records")]
    pub data: Vec<StockDailyRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Value>,
}

/// 价格和成交量可能是数字或数字字符串，其他值视为缺失
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|n| n.is_finite()))
}

/// Keeps every array slot so `data[0]` stays the latest record. Entries that
/// are not usable objects become empty records and are dropped downstream.
fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<StockDailyRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Vec::<Value>::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            if !row.is_object() {
                warn!("Record {} is not an object: {}", i, row);
                return StockDailyRecord::default();
            }
            serde_json::from_value(row).unwrap_or_else(|e| {
                warn!("Record {} could not be read: {}", i, e);
                StockDailyRecord::default()
            })
        })
        .collect())
}
