pub mod chart;
pub mod stock;
pub mod table;
