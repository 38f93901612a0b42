pub mod stock;
pub mod table;

pub use stock::{normalize_eod, StockChart};
pub use table::normalize_table;
