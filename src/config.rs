use crate::models::chart::ChartKind;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.marketstack.com/v2";
pub const ACCESS_KEY_ENV: &str = "MARKETSTACK_ACCESS_KEY";
pub const BASE_URL_ENV: &str = "MARKETSTACK_BASE_URL";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub access_key: String,
    pub limit: u32,
    pub sort: String,
    pub request_timeout: Option<Duration>,
    pub default_chart_kind: ChartKind,
    pub output_path: PathBuf,
    pub color_seed: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            access_key: String::new(),
            limit: 30,
            sort: "DESC".to_string(),
            request_timeout: None, // 使用传输层默认值
            default_chart_kind: ChartKind::Line,
            output_path: PathBuf::from("chart.html"),
            color_seed: None,
        }
    }

    /// 从环境变量读取接口地址和密钥
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(key) = std::env::var(ACCESS_KEY_ENV) {
            config.access_key = key;
        }
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }
        config
    }

    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_access_key(mut self, key: &str) -> Self {
        self.access_key = key.to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_default_chart_kind(mut self, kind: ChartKind) -> Self {
        self.default_chart_kind = kind;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_color_seed(mut self, seed: Option<u64>) -> Self {
        self.color_seed = seed;
        self
    }

    /// 日线接口完整地址
    pub fn eod_url(&self) -> String {
        format!("{}/eod", self.api_base_url.trim_end_matches('/'))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
