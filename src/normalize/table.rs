use crate::errors::Result;
use crate::models::chart::{CellValue, ChartSeries, Series, SeriesStyle};
use crate::models::table::RawCsvTable;
use crate::util::random_color;
use log::debug;
use rand::Rng;

/// 将上传表格转换为图表数据
///
/// 第一列作为标签（转为字符串，缺失时为空串），其余每一列成为一个数据集，
/// 值保持解析器推断出的原样。只有一列时返回空数据集列表。
pub fn normalize_table<R: Rng + ?Sized>(table: &RawCsvTable, rng: &mut R) -> Result<ChartSeries> {
    let label_header = table.label_header();
    let labels: Vec<String> = table
        .rows
        .iter()
        .map(|row| {
            label_header
                .and_then(|h| row.get(h))
                .map(CellValue::to_label)
                .unwrap_or_default()
        })
        .collect();

    let series: Vec<Series> = table
        .headers
        .iter()
        .skip(1)
        .map(|header| {
            let values = table
                .rows
                .iter()
                .map(|row| row.get(header).cloned().unwrap_or(CellValue::Null))
                .collect();
            Series::new(header.clone(), values).with_style(table_style(rng))
        })
        .collect();

    debug!(
        "Normalized table into {} labels and {} series",
        labels.len(),
        series.len()
    );

    ChartSeries::new(labels, series)
}

fn table_style<R: Rng + ?Sized>(rng: &mut R) -> SeriesStyle {
    SeriesStyle {
        border_color: random_color(rng, 1.0),
        background_color: random_color(rng, 0.2),
        border_width: 2,
        fill: true,
        tension: None,
    }
}
