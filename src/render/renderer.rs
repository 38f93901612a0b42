use crate::errors::Result;
use crate::models::chart::{ChartKind, ChartSeries};
use crate::render::backend::{ChartBackend, ChartHandle};
use crate::render::chart_config::{build_chart_config, ChartConfig};
use log::{debug, info};
use rand::Rng;

/// 图表渲染器：先释放旧图表再创建新图表，任何时刻最多一个实例
pub struct ChartRenderer<B: ChartBackend> {
    backend: B,
}

impl<B: ChartBackend> ChartRenderer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 生成图表配置，不触碰当前图表
    ///
    /// Returns `None` when the series has nothing to chart; the caller shows the
    /// empty state instead.
    pub fn prepare<R: Rng + ?Sized>(
        &self,
        series: &ChartSeries,
        kind: ChartKind,
        rng: &mut R,
    ) -> Result<Option<ChartConfig>> {
        if !series.is_renderable() {
            info!("No series to chart, showing empty state");
            return Ok(None);
        }
        build_chart_config(series, kind, rng).map(Some)
    }

    /// Release `previous`, then draw `config` if there is one.
    pub fn show(
        &mut self,
        previous: Option<ChartHandle>,
        config: Option<&ChartConfig>,
    ) -> Result<Option<ChartHandle>> {
        if let Some(handle) = previous {
            self.release(handle)?;
        }

        let config = match config {
            Some(config) => config,
            None => return Ok(None),
        };
        let handle = self.backend.create(config)?;
        debug!(
            "Created {} chart {} on {} backend ({} points)",
            config.kind,
            handle.id(),
            self.backend.name(),
            config.data.labels.len()
        );
        Ok(Some(handle))
    }

    pub fn release(&mut self, handle: ChartHandle) -> Result<()> {
        debug!("Destroying chart {}", handle.id());
        self.backend.destroy(handle)
    }
}
