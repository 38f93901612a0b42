pub mod backend;
pub mod chart_config;
pub mod renderer;

pub use backend::{ChartBackend, ChartHandle, HtmlFileBackend, TerminalBackend};
pub use chart_config::{build_chart_config, ChartConfig, PIE_SLICE_LIMIT};
pub use renderer::ChartRenderer;
