use crate::models::chart::CellValue;
use std::collections::HashMap;

/// 上传文件解析后的原始表格，第一列作为标签列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, CellValue>>,
}

impl RawCsvTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn label_header(&self) -> Option<&str> {
        self.headers.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
