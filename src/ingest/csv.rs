use crate::errors::{DashboardError, Result};
use crate::ingest::base::TableIngestor;
use crate::models::chart::CellValue;
use crate::models::table::RawCsvTable;
use ::csv::ReaderBuilder;
use log::{debug, info};
use std::collections::{HashMap, HashSet};

/// CSV 文件解析器：首行为表头，按单元格推断数值类型，跳过空行
#[derive(Debug, Clone)]
pub struct CsvIngestor {
    delimiter: u8,
}

impl CsvIngestor {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Default for CsvIngestor {
    fn default() -> Self {
        Self::new()
    }
}

impl TableIngestor for CsvIngestor {
    fn format_name(&self) -> &'static str {
        "CSV"
    }

    fn ingest_bytes(&self, bytes: &[u8]) -> Result<RawCsvTable> {
        // csv reader 自动跳过完全空白的行；字段数不一致时报错
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .delimiter(self.delimiter)
            .from_reader(bytes);

        let raw_headers = reader
            .headers()
            .map_err(|e| DashboardError::ParseError(e.to_string()))?
            .clone();
        let headers = dedupe_headers(raw_headers.iter());
        let mut table = RawCsvTable::new(headers);

        for record in reader.records() {
            // 只保留第一条错误，不返回部分结果
            let record = record.map_err(|e| DashboardError::ParseError(e.to_string()))?;
            let row: HashMap<String, CellValue> = table
                .headers
                .iter()
                .zip(record.iter())
                .map(|(header, raw)| (header.clone(), infer_cell(raw)))
                .collect();
            table.rows.push(row);
        }

        info!(
            "Parsed CSV with {} columns and {} rows",
            table.headers.len(),
            table.rows.len()
        );
        Ok(table)
    }
}

/// 重复的表头追加序号，保证每一列都能被按名访问
fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for header in headers {
        let mut name = header.to_string();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{}_{}", header, n);
            n += 1;
        }
        if name != header {
            debug!("Renamed duplicate header {} to {}", header, name);
        }
        seen.insert(name.clone());
        out.push(name);
    }
    out
}

/// Per-cell type inference: numeric strings become numbers, empty cells become null.
pub fn infer_cell(raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Null;
    }
    if looks_numeric(raw) {
        if let Ok(n) = raw.trim().parse::<f64>() {
            if n.is_finite() {
                return CellValue::Number(n);
            }
        }
    }
    CellValue::Text(raw.to_string())
}

// -?(\d+\.?|\.\d+|\d+\.\d+)([eE][-+]?\d+)? 前后允许空白
fn looks_numeric(raw: &str) -> bool {
    let s = raw.trim();
    let s = s.strip_prefix('-').unwrap_or(s);
    let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    };

    let mantissa_ok = match mantissa.split_once('.') {
        Some((int, frac)) => {
            let int_ok = int.chars().all(|c| c.is_ascii_digit());
            let frac_ok = frac.chars().all(|c| c.is_ascii_digit());
            int_ok && frac_ok && !(int.is_empty() && frac.is_empty())
        }
        None => !mantissa.is_empty() && mantissa.chars().all(|c| c.is_ascii_digit()),
    };

    let exponent_ok = match exponent {
        Some(exp) => {
            let digits = exp.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(exp);
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        }
        None => true,
    };

    mantissa_ok && exponent_ok
}
