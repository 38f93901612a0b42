// 公开导出的模块，供外部使用
pub mod models;
pub mod errors;
pub mod config;
pub mod ingest;
pub mod normalize;
pub mod api;
pub mod render;
pub mod services;

#[doc(hidden)]
pub mod util;

// 重新导出常用类型，方便使用
pub use models::chart::{CellValue, ChartKind, ChartSeries, Series};
pub use models::stock::{EodResponse, StockDailyRecord};
pub use models::table::RawCsvTable;
pub use services::dashboard::Dashboard;
pub use errors::{Result, DashboardError};
