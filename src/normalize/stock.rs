use crate::errors::{DashboardError, Result};
use crate::models::chart::{CellValue, ChartSeries, Series, SeriesStyle};
use crate::models::stock::{EodResponse, StockDailyRecord};
use crate::util::date_portion;
use log::{debug, info};

/// 股票查询结果：收盘价序列和最新一条记录
#[derive(Debug, Clone, PartialEq)]
pub struct StockChart {
    pub symbol: String,
    pub series: ChartSeries,
    pub latest: StockDailyRecord,
}

fn closing_price_style() -> SeriesStyle {
    SeriesStyle {
        border_color: "#4a6cf7".to_string(),
        background_color: "rgba(74, 108, 247, 0.1)".to_string(),
        border_width: 2,
        fill: true,
        tension: Some(0.3),
    }
}

/// Turns a newest-first EOD payload into an ascending closing-price series.
///
/// Records without both `date` and `close` are dropped, not padded. The first
/// record of the payload is kept as the latest record for the detail panel.
pub fn normalize_eod(response: &EodResponse, symbol: &str) -> Result<StockChart> {
    let symbol = symbol.trim().to_uppercase();
    let latest = response
        .data
        .first()
        .cloned()
        .ok_or_else(|| DashboardError::NoDataError {
            symbol: symbol.clone(),
        })?;

    let mut labels = Vec::with_capacity(response.data.len());
    let mut closes = Vec::with_capacity(response.data.len());

    // 接口按日期降序返回，倒序遍历得到升序
    for record in response.data.iter().rev() {
        match (&record.date, record.close) {
            (Some(date), Some(close)) => {
                labels.push(date_portion(date).to_string());
                closes.push(CellValue::Number(close));
            }
            _ => debug!("Skipping incomplete record for {}: {:?}", symbol, record.date),
        }
    }

    if labels.is_empty() {
        return Err(DashboardError::NoValidDataError { symbol });
    }

    let dropped = response.data.len() - labels.len();
    info!(
        "Normalized {} records for {} ({} dropped)",
        labels.len(),
        symbol,
        dropped
    );

    let series = Series::new(format!("{} Closing Price", symbol), closes)
        .with_style(closing_price_style());

    Ok(StockChart {
        series: ChartSeries::new(labels, vec![series])?,
        symbol,
        latest,
    })
}
