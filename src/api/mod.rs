pub mod base;
pub mod marketstack;

pub use base::StockApi;
pub use marketstack::{interpret_eod_response, MarketstackClient};
