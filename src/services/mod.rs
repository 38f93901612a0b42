pub mod dashboard;
pub mod detail;
pub mod session;

pub use dashboard::{classify_query_error, ChartView, Dashboard, QueryPanel, QueryTicket, ViewState};
pub use detail::StockDetail;
pub use session::SessionState;
