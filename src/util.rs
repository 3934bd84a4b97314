// Utility helpers for decoding and parsing raw CSV cells.
//
// This module centralizes the "dirty" text/number handling so the
// normalizer can work with typed values.
use num_format::{Locale, ToFormattedString};

/// Decode single-byte Latin-1 text. Every byte maps to the code point of the
/// same value, so this never fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Parse a numeric cell into `f64`.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (`"Unknown"`), but
///   accepts exponents such as `1e3`.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for blank or unparseable cells.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an integer cell. Float-formatted integers (`"3.0"`), which show up
/// when a column with gaps went through a spreadsheet, are accepted.
pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i32>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    if v.fract() != 0.0 || v < f64::from(i32::MIN) || v > f64::from(i32::MAX) {
        return None;
    }
    Some(v as i32)
}

/// Trimmed text cell, or `None` when blank.
pub fn clean_text(s: Option<String>) -> Option<String> {
    let s = s?;
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Format an optional casualty figure: whole numbers without decimals,
/// missing values as `-`.
pub fn format_casualties(v: Option<f64>) -> String {
    match v {
        None => "-".to_string(),
        Some(n) if n.fract() == 0.0 && n.abs() < 1e15 => format_int(n as i64),
        Some(n) => format!("{n:.1}"),
    }
}
