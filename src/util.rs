use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// 颜色工具
/// Random `rgba(r, g, b, alpha)` string; channels fall in `0..255`.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R, alpha: f64) -> String {
    let r: u8 = rng.gen_range(0..255);
    let g: u8 = rng.gen_range(0..255);
    let b: u8 = rng.gen_range(0..255);
    format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}

/// 有种子时可复现，否则使用系统熵
pub fn color_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

// 日期工具
/// Calendar-date part of an ISO-8601 timestamp (`2024-01-02T00:00:00+0000` -> `2024-01-02`).
pub fn date_portion(date: &str) -> &str {
    let date = date.trim();
    date.split(|c: char| c == 'T' || c == ' ').next().unwrap_or(date)
}

// 数字格式化
/// en-US style grouping: `1234567.891` with 2 decimals -> `1,234,567.89`.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
