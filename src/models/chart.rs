use crate::errors::{DashboardError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// 单元格值：解析阶段推断出的类型
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Null,
}

impl CellValue {
    /// Label text for the x axis. Missing cells become an empty label.
    pub fn to_label(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Null => String::new(),
        }
    }

    /// 数值视图，文本单元格按图表库的方式尝试解析
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            CellValue::Null => None,
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// 数据集样式
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStyle {
    pub border_color: String,
    pub background_color: String,
    pub border_width: u32,
    pub fill: bool,
    pub tension: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<CellValue>,
    #[serde(skip)]
    pub style: Option<SeriesStyle>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
            style: None,
        }
    }

    pub fn with_style(mut self, style: SeriesStyle) -> Self {
        self.style = Some(style);
        self
    }
}

/// Chart-ready data: one shared label axis plus named series of equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartSeries {
    pub fn new(labels: Vec<String>, series: Vec<Series>) -> Result<Self> {
        if let Some(bad) = series.iter().find(|s| s.values.len() != labels.len()) {
            return Err(DashboardError::DataError(format!(
                "series '{}' has {} values for {} labels",
                bad.name,
                bad.values.len(),
                labels.len()
            )));
        }
        Ok(Self { labels, series })
    }

    /// 没有数据集时视为无数据，而不是错误
    pub fn is_renderable(&self) -> bool {
        !self.series.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            "pie" => Ok(ChartKind::Pie),
            other => Err(DashboardError::DataError(format!("Unknown chart type: {}", other))),
        }
    }
}
