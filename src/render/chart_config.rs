use crate::errors::{DashboardError, Result};
use crate::models::chart::{CellValue, ChartKind, ChartSeries, Series, SeriesStyle};
use crate::util::random_color;
use rand::Rng;
use serde::Serialize;
use serde_json::{json, Value};

/// 饼图最多显示的扇区数
pub const PIE_SLICE_LIMIT: usize = 10;

/// Chart.js 风格的图表配置：`{type, data: {labels, datasets}, options}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<CellValue>,
    pub border_color: String,
    pub background_color: Paint,
    pub border_width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

/// Builds the chart configuration for one kind of chart.
///
/// Line and bar pass every series through (bar stacks both axes). Pie uses the
/// first series only, cut to the first [`PIE_SLICE_LIMIT`] points, with a random
/// colour per slice.
pub fn build_chart_config<R: Rng + ?Sized>(
    series: &ChartSeries,
    kind: ChartKind,
    rng: &mut R,
) -> Result<ChartConfig> {
    if !series.is_renderable() {
        return Err(DashboardError::DataError("no series to chart".to_string()));
    }

    let config = match kind {
        ChartKind::Line | ChartKind::Bar => {
            let datasets = series
                .series
                .iter()
                .map(|s| series_dataset(s, rng))
                .collect();
            let options = if kind == ChartKind::Bar {
                stacked_options()
            } else {
                common_options()
            };
            ChartConfig {
                kind,
                data: ChartData {
                    labels: series.labels.clone(),
                    datasets,
                },
                options,
            }
        }
        ChartKind::Pie => {
            let first = &series.series[0];
            let n = series.labels.len().min(PIE_SLICE_LIMIT);
            let colors = (0..n).map(|_| random_color(rng, 0.7)).collect();
            ChartConfig {
                kind,
                data: ChartData {
                    labels: series.labels[..n].to_vec(),
                    datasets: vec![Dataset {
                        label: None,
                        data: first.values[..n].to_vec(),
                        border_color: "#1e1e1e".to_string(),
                        background_color: Paint::Many(colors),
                        border_width: 1,
                        fill: None,
                        tension: None,
                    }],
                },
                options: pie_options(),
            }
        }
    };

    Ok(config)
}

fn series_dataset<R: Rng + ?Sized>(series: &Series, rng: &mut R) -> Dataset {
    let style = match &series.style {
        Some(style) => style.clone(),
        None => SeriesStyle {
            border_color: random_color(rng, 1.0),
            background_color: random_color(rng, 0.2),
            border_width: 2,
            fill: true,
            tension: None,
        },
    };
    Dataset {
        label: Some(series.name.clone()),
        data: series.values.clone(),
        border_color: style.border_color,
        background_color: Paint::One(style.background_color),
        border_width: style.border_width,
        fill: Some(style.fill),
        tension: style.tension,
    }
}

fn axis() -> Value {
    json!({
        "grid": { "color": "rgba(255, 255, 255, 0.1)" },
        "ticks": { "color": "#b3b3b3" }
    })
}

fn common_options() -> Value {
    json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": {
            "legend": {
                "position": "top",
                "labels": { "color": "#ffffff" }
            },
            "tooltip": {
                "mode": "index",
                "intersect": false,
                "backgroundColor": "rgba(0, 0, 0, 0.8)",
                "titleColor": "#ffffff",
                "bodyColor": "#ffffff",
                "titleFont": { "size": 14 },
                "bodyFont": { "size": 12 },
                "padding": 12,
                "cornerRadius": 4,
                "displayColors": true
            }
        },
        "scales": {
            "x": axis(),
            "y": axis()
        },
        "animation": {
            "duration": 1000,
            "easing": "easeInOutQuart"
        }
    })
}

fn stacked_options() -> Value {
    let mut options = common_options();
    for key in ["x", "y"] {
        options["scales"][key]["stacked"] = json!(true);
    }
    options
}

fn pie_options() -> Value {
    let mut options = common_options();
    options["plugins"]["legend"]["position"] = json!("right");
    options
}
