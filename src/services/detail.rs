use crate::models::stock::StockDailyRecord;
use crate::util::{date_portion, format_grouped};
use chrono::NaiveDate;
use std::fmt;

const NOT_AVAILABLE: &str = "N/A";

/// 最新交易日详情面板
#[derive(Debug, Clone, PartialEq)]
pub struct StockDetail {
    pub title: String,
    pub exchange: String,
    pub price: String,
    pub change: Option<PriceChange>,
    pub open: String,
    pub high: String,
    pub low: String,
    pub volume: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceChange {
    pub positive: bool,
    pub amount: String,
    pub percent: Option<String>,
}

impl PriceChange {
    pub fn arrow(&self) -> &'static str {
        if self.positive {
            "▲"
        } else {
            "▼"
        }
    }
}

impl StockDetail {
    pub fn from_record(record: &StockDailyRecord) -> Self {
        let currency = record
            .price_currency
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or("USD");
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let change = match (record.close, record.open) {
            (Some(close), Some(open)) => Some(PriceChange {
                positive: close >= open,
                amount: format_currency(Some((close - open).abs()), currency),
                percent: (open != 0.0).then(|| format!("{:.2}%", (close - open) / open * 100.0)),
            }),
            _ => None,
        };

        Self {
            title: format!("{} ({})", text(&record.name), text(&record.symbol)),
            exchange: format!("{}: {}", text(&record.exchange_code), text(&record.exchange)),
            price: format_currency(record.close, currency),
            change,
            open: format_currency(record.open, currency),
            high: format_currency(record.high, currency),
            low: format_currency(record.low, currency),
            volume: format_volume(record.volume),
            date: record
                .date
                .as_deref()
                .and_then(format_long_date)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

impl fmt::Display for StockDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.exchange)?;
        match &self.change {
            Some(change) => writeln!(
                f,
                "{}  {} {} ({})",
                self.price,
                change.arrow(),
                change.amount,
                change.percent.as_deref().unwrap_or(NOT_AVAILABLE)
            )?,
            None => writeln!(f, "{}", self.price)?,
        }
        writeln!(f, "{:<8}{}", "Open:", self.open)?;
        writeln!(f, "{:<8}{}", "High:", self.high)?;
        writeln!(f, "{:<8}{}", "Low:", self.low)?;
        writeln!(f, "{:<8}{}", "Volume:", self.volume)?;
        write!(f, "{:<8}{}", "Date:", self.date)
    }
}

/// en-US currency formatting for the common quote currencies
pub fn format_currency(value: Option<f64>, currency: &str) -> String {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => return NOT_AVAILABLE.to_string(),
    };
    let code = currency.trim().to_uppercase();
    let (symbol, decimals) = match code.as_str() {
        "USD" => ("$", 2),
        "EUR" => ("€", 2),
        "GBP" => ("£", 2),
        "JPY" => ("¥", 0),
        "CNY" => ("CN¥", 2),
        "INR" => ("₹", 2),
        "CAD" => ("CA$", 2),
        "AUD" => ("A$", 2),
        "HKD" => ("HK$", 2),
        _ => ("", 2),
    };
    let number = format_grouped(value.abs(), decimals);
    let sign = if value < 0.0 && number.chars().any(|c| ('1'..='9').contains(&c)) {
        "-"
    } else {
        ""
    };
    if symbol.is_empty() {
        format!("{}{} {}", sign, code, number)
    } else {
        format!("{}{}{}", sign, symbol, number)
    }
}

fn format_volume(volume: Option<f64>) -> String {
    match volume {
        Some(v) if v != 0.0 && v.is_finite() => format_grouped(v, 0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn format_long_date(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date_portion(date), "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%B %-d, %Y").to_string())
}
