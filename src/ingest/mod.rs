pub mod base;
pub mod csv;
