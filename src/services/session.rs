use crate::models::chart::{ChartKind, ChartSeries};
use crate::render::backend::ChartHandle;

/// 当前会话状态：图表数据、图表类型和当前图表实例
///
/// Data is only ever replaced as a whole; a new load never merges with the
/// previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    series: Option<ChartSeries>,
    kind: ChartKind,
    chart: Option<ChartHandle>,
}

impl SessionState {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            series: None,
            kind,
            chart: None,
        }
    }

    pub fn series(&self) -> Option<&ChartSeries> {
        self.series.as_ref()
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn chart(&self) -> Option<ChartHandle> {
        self.chart
    }

    /// 绘制成功后整体写入新数据、类型和图表实例
    pub fn commit(&mut self, series: ChartSeries, kind: ChartKind, chart: Option<ChartHandle>) {
        self.series = Some(series);
        self.kind = kind;
        self.chart = chart;
    }

    pub fn set_kind(&mut self, kind: ChartKind) {
        self.kind = kind;
    }

    pub fn take_chart(&mut self) -> Option<ChartHandle> {
        self.chart.take()
    }

}
