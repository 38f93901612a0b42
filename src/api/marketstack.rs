use crate::api::base::StockApi;
use crate::config::Config;
use crate::errors::{DashboardError, Result};
use crate::models::stock::EodResponse;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;

/// Marketstack 日线接口客户端，每次查询只发一个请求，不重试
pub struct MarketstackClient {
    client: Client,
    eod_url: String,
    access_key: String,
    limit: u32,
    sort: String,
}

impl MarketstackClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(DashboardError::RequestError)?;

        Ok(Self {
            client,
            eod_url: config.eod_url(),
            access_key: config.access_key.clone(),
            limit: config.limit,
            sort: config.sort.clone(),
        })
    }
}

#[async_trait]
impl StockApi for MarketstackClient {
    fn provider_name(&self) -> &'static str {
        "marketstack"
    }

    async fn fetch_eod(&self, symbol: &str) -> Result<EodResponse> {
        let symbol = symbol.trim().to_uppercase();
        let limit = self.limit.to_string();
        info!("Fetching data for symbol: {}", symbol);
        debug!(
            "GET {}?access_key=***&symbols={}&limit={}&sort={}",
            self.eod_url, symbol, limit, self.sort
        );

        let response = self
            .client
            .get(&self.eod_url)
            .query(&[
                ("access_key", self.access_key.as_str()),
                ("symbols", symbol.as_str()),
                ("limit", limit.as_str()),
                ("sort", self.sort.as_str()),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("Received {} bytes with status {}", body.len(), status);

        interpret_eod_response(status, &body, &symbol)
    }
}

/// 解析接口响应
///
/// 非 2xx 状态优先使用接口返回的错误信息；2xx 但带 `error` 字段同样视为接口错误；
/// `data` 缺失、不是数组或为空时返回无数据错误。其余情况原样返回。
pub fn interpret_eod_response(status: u16, body: &str, symbol: &str) -> Result<EodResponse> {
    let success = (200..300).contains(&status);

    if !success {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| format!("API request failed with status {}", status));
        return Err(DashboardError::ApiError { status, message });
    }

    let json: Value = serde_json::from_str(body)?;

    if json.get("error").is_some_and(|e| !e.is_null()) {
        let message =
            error_message(&json).unwrap_or_else(|| "Error fetching stock data".to_string());
        return Err(DashboardError::ApiError { status, message });
    }

    let has_rows = json
        .get("data")
        .and_then(Value::as_array)
        .is_some_and(|rows| !rows.is_empty());
    if !has_rows {
        return Err(DashboardError::NoDataError {
            symbol: symbol.trim().to_uppercase(),
        });
    }

    let response: EodResponse = serde_json::from_value(json)?;
    info!("API returned {} records for {}", response.data.len(), symbol);
    Ok(response)
}

fn error_message(json: &Value) -> Option<String> {
    json.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
