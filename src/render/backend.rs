use crate::errors::Result;
use crate::render::chart_config::{ChartConfig, Paint};
use log::{debug, info};
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};

/// Opaque handle to a live chart instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartHandle(u64);

impl ChartHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Base trait for chart drawing surfaces
pub trait ChartBackend {
    /// Backend name, used in logs
    fn name(&self) -> &'static str;

    /// Draw a chart and return a handle to it
    fn create(&mut self, config: &ChartConfig) -> Result<ChartHandle>;

    /// Release a chart created by this backend
    fn destroy(&mut self, handle: ChartHandle) -> Result<()>;
}

impl<B: ChartBackend + ?Sized> ChartBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn create(&mut self, config: &ChartConfig) -> Result<ChartHandle> {
        (**self).create(config)
    }

    fn destroy(&mut self, handle: ChartHandle) -> Result<()> {
        (**self).destroy(handle)
    }
}

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Chart Dashboard</title>
<script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
<style>
  body { margin: 0; background: #121212; font-family: sans-serif; }
  .chart-container { position: relative; height: 90vh; padding: 1.5rem; }
</style>
</head>
<body>
<div class="chart-container"><canvas id="dataChart"></canvas></div>
<script>
  const config = __CHART_CONFIG__;
  new Chart(document.getElementById('dataChart').getContext('2d'), config);
</script>
</body>
</html>
"#;

/// 将图表写成独立的 HTML 页面（Chart.js 渲染），销毁时删除页面
pub struct HtmlFileBackend {
    path: PathBuf,
    next_id: u64,
    live: Option<ChartHandle>,
}

impl HtmlFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            next_id: 1,
            live: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn live(&self) -> Option<ChartHandle> {
        self.live
    }

    pub fn page(config: &ChartConfig) -> Result<String> {
        // 防止数据中的 </script> 提前结束脚本
        let json = serde_json::to_string(config)?.replace("</", "<\\/");
        Ok(HTML_TEMPLATE.replace("__CHART_CONFIG__", &json))
    }
}

impl ChartBackend for HtmlFileBackend {
    fn name(&self) -> &'static str {
        "html"
    }

    fn create(&mut self, config: &ChartConfig) -> Result<ChartHandle> {
        let page = Self::page(config)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, page)?;

        let handle = ChartHandle::new(self.next_id);
        self.next_id += 1;
        self.live = Some(handle);
        info!("Wrote {} chart to {}", config.kind, self.path.display());
        Ok(handle)
    }

    fn destroy(&mut self, handle: ChartHandle) -> Result<()> {
        if self.live != Some(handle) {
            debug!("Chart {} already released", handle.id());
            return Ok(());
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.live = None;
        debug!("Removed chart page {}", self.path.display());
        Ok(())
    }
}

/// 在终端中以文本条形图显示图表
pub struct TerminalBackend<W: Write = Stdout> {
    out: W,
    width: usize,
    next_id: u64,
}

impl TerminalBackend<Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> TerminalBackend<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            width: 40,
            next_id: 1,
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, config: &ChartConfig) -> io::Result<()> {
        let labels = &config.data.labels;
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0).max(5);
        writeln!(self.out, "== {} chart ==", config.kind)?;

        for dataset in &config.data.datasets {
            let values: Vec<Option<f64>> = dataset.data.iter().map(|v| v.as_f64()).collect();
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            let min = present.iter().copied().fold(f64::INFINITY, f64::min);
            let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            // 饼图按绝对值计算占比
            let total: f64 = present.iter().map(|v| v.abs()).sum();
            let is_pie = matches!(dataset.background_color, Paint::Many(_));

            if let Some(name) = &dataset.label {
                writeln!(self.out, "-- {}", name)?;
            }
            if present.is_empty() {
                writeln!(self.out, "   (no numeric values)")?;
                continue;
            }
            writeln!(self.out, "   min {:.2}  max {:.2}", min, max)?;

            for (label, value) in labels.iter().zip(values.iter()) {
                match value {
                    Some(v) if is_pie => {
                        let share = if total > 0.0 { v.abs() / total } else { 0.0 };
                        let len = ((share * self.width as f64).round() as usize).min(self.width);
                        writeln!(
                            self.out,
                            "   {:<w$} {} {:.1}%",
                            label,
                            "#".repeat(len),
                            share * 100.0,
                            w = label_width
                        )?;
                    }
                    Some(v) => {
                        let len = if max > min {
                            (((v - min) / (max - min)) * (self.width - 1) as f64).round() as usize + 1
                        } else {
                            self.width
                        };
                        writeln!(
                            self.out,
                            "   {:<w$} {} {}",
                            label,
                            "#".repeat(len),
                            v,
                            w = label_width
                        )?;
                    }
                    None => writeln!(self.out, "   {:<w$} -", label, w = label_width)?,
                }
            }
        }
        self.out.flush()
    }
}

impl<W: Write> ChartBackend for TerminalBackend<W> {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn create(&mut self, config: &ChartConfig) -> Result<ChartHandle> {
        self.draw(config)?;
        let handle = ChartHandle::new(self.next_id);
        self.next_id += 1;
        Ok(handle)
    }

    fn destroy(&mut self, handle: ChartHandle) -> Result<()> {
        // 文本输出无需释放资源
        debug!("Released terminal chart {}", handle.id());
        Ok(())
    }
}
