//! Best-effort field coercions for heterogeneous CEE exports
//!
//! Every helper here degrades instead of failing: an unparsable value maps
//! to a documented default, never to an error.

use chrono::{NaiveDate, NaiveDateTime};

/// Mandataire value substituted for blank or missing cells
pub const MANDATAIRE_NOT_SPECIFIED: &str = "Non renseigné";

/// Period assumed when neither PERIODE nor a Depot batch label gives one
pub const DEFAULT_PERIOD: &str = "P5";

/// Date formats seen across emitters' exports
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a date cell; unparsable values become "missing", not an error
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.date());
        }
    }
    None
}

/// Coerce a numeric cell to f64, defaulting to 0.0.
/// Accepts a comma decimal separator and embedded thousands spaces,
/// both common in French exports.
pub fn parse_amount(raw: Option<&str>) -> f64 {
    let Some(value) = raw else { return 0.0 };
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Derive the two-character department code from a postal code:
/// left-zero-pad to 5 characters, take the first 2.
pub fn department(postal_code: &str) -> String {
    let padded = format!("{:0>5}", postal_code.trim());
    padded.chars().take(2).collect()
}

/// Three-tier period derivation: explicit PERIODE (uppercased), else a
/// `P<digit>` token extracted from the Depot batch label, else "P5".
pub fn period(periode: Option<&str>, deposit_batch: Option<&str>) -> String {
    if let Some(value) = periode {
        return value.trim().to_uppercase();
    }
    if let Some(label) = deposit_batch {
        if let Some(token) = extract_period_token(label) {
            return token;
        }
    }
    DEFAULT_PERIOD.to_string()
}

/// First `P` followed by a digit in the label, e.g. "Depot P4-2021" → "P4"
fn extract_period_token(label: &str) -> Option<String> {
    let bytes = label.as_bytes();
    for (i, byte) in bytes.iter().enumerate() {
        if *byte == b'P' {
            if let Some(digit) = bytes.get(i + 1) {
                if digit.is_ascii_digit() {
                    return Some(format!("P{}", *digit as char));
                }
            }
        }
    }
    None
}

/// Normalize the mandated-third-party name; missing, blank, or `nan`
/// values become "Non renseigné" regardless of how the record was built
pub fn mandataire(raw: Option<&str>) -> String {
    let trimmed = raw.map(str::trim).unwrap_or("");
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return MANDATAIRE_NOT_SPECIFIED.to_string();
    }
    trimmed.to_string()
}
