use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// 解析器报告的第一条错误
    #[error("{0}")]
    ParseError(String),

    #[error("The uploaded CSV file is empty")]
    EmptyDataError,

    #[error("{message}")]
    ApiError { status: u16, message: String },

    #[error("No data available for the specified symbol: {symbol}")]
    NoDataError { symbol: String },

    #[error("No valid date/price data found in the response for {symbol}")]
    NoValidDataError { symbol: String },

    #[error("Data error: {0}")]
    DataError(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
