//! Parsers for the loosely formatted text columns of the staging tables.

use serde_json::{Map, Value};

use crate::companies::Address;

const STREET_KEYS: &[&str] = &["street", "addressLine", "streetAddress", "address"];
const POSTAL_CODE_KEYS: &[&str] = &["postalCode", "zipCode", "postCode", "zip"];
const CITY_KEYS: &[&str] = &["city", "postPlace", "postalArea", "town"];
const MUNICIPALITY_KEYS: &[&str] = &["municipality", "kommun"];
const COUNTY_KEYS: &[&str] = &["county", "lan", "län"];

/// Parses the scraped address column.
///
/// Returns `Err` with a warning message when the value is not JSON.
pub fn parse_address(raw: &str) -> Result<Option<Address>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| format!("invalid address JSON: {}", e))?;

    let value = match value {
        Value::String(inner) => {
            let inner = inner.trim();
            if inner.is_empty() {
                return Ok(None);
            }
            match serde_json::from_str::<Value>(inner) {
                Ok(decoded) => decoded,
                // A bare string is taken as the street line.
                Err(_) => {
                    return Ok(Some(Address {
                        street: Some(inner.to_string()),
                        ..Default::default()
                    }))
                }
            }
        }
        other => other,
    };

    let Value::Object(map) = value else {
        return Ok(None);
    };

    let flat = address_from_object(&map);
    let visitor = map
        .get("visitorAddress")
        .and_then(Value::as_object)
        .map(address_from_object)
        .unwrap_or_default();
    let postal = map
        .get("postalAddress")
        .and_then(Value::as_object)
        .map(address_from_object)
        .unwrap_or_default();

    let address = fill_gaps(fill_gaps(visitor, postal), flat);
    Ok((!address.is_empty()).then_some(address))
}

fn fill_gaps(primary: Address, fallback: Address) -> Address {
    Address {
        street: primary.street.or(fallback.street),
        postal_code: primary.postal_code.or(fallback.postal_code),
        city: primary.city.or(fallback.city),
        municipality: primary.municipality.or(fallback.municipality),
        county: primary.county.or(fallback.county),
    }
}

fn address_from_object(map: &Map<String, Value>) -> Address {
    Address {
        street: first_text(map, STREET_KEYS),
        postal_code: first_text(map, POSTAL_CODE_KEYS).and_then(|v| format_postal_code(&v)),
        city: first_text(map, CITY_KEYS),
        municipality: first_text(map, MUNICIPALITY_KEYS),
        county: first_text(map, COUNTY_KEYS),
    }
}

fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match map.get(*key)? {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Swedish postal codes are five digits, written `NNN NN`.
pub fn format_postal_code(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.len() {
        0 => None,
        5 => Some(format!("{} {}", &digits[..3], &digits[3..])),
        _ => Some(digits),
    }
}

/// Parses the segment column into distinct, trimmed names (first occurrence
/// order kept).
pub fn parse_segments(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let names: Vec<String> = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(m) => m.get("name").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect(),
        Ok(Value::String(s)) => vec![s],
        _ => trimmed
            .split([',', ';', '|'])
            .map(str::to_string)
            .collect(),
    };

    let mut segments: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !segments.iter().any(|s| s == name) {
            segments.push(name.to_string());
        }
    }
    segments
}

/// Drops `.` thousands separators (`1.200`, `12.500.000`). A dot followed by
/// anything but exactly three digits is left as a decimal point.
fn strip_dot_grouping(value: &str) -> String {
    let mut groups = value.split('.');
    let head = groups.next().unwrap_or_default();
    let tail: Vec<&str> = groups.collect();
    let is_digits = |g: &str| !g.is_empty() && g.chars().all(|c| c.is_ascii_digit());
    if !tail.is_empty() && is_digits(head) && tail.iter().all(|g| g.len() == 3 && is_digits(g)) {
        value.replace('.', "")
    } else {
        value.to_string()
    }
}

/// Headcount from values like `42`, `1 200`, `1.200`, `10-19` (lower bound) or `500+`.
pub fn parse_employees(raw: &str) -> Option<i32> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '\u{a0}')
        .collect();
    let compact = compact.trim_end_matches('+');
    let lower = if compact.starts_with('-') {
        compact
    } else {
        compact.split(['-', '–']).next().unwrap_or_default()
    };
    if lower.is_empty() {
        return None;
    }
    let lower = strip_dot_grouping(lower);

    let value = match lower.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            let f = lower.parse::<f64>().ok()?;
            if !f.is_finite() {
                return None;
            }
            f.round() as i64
        }
    };
    if value < 0 {
        return None;
    }
    i32::try_from(value).ok()
}

/// First four-digit year in `1800..=current_year` found in the value.
pub fn parse_foundation_year(raw: &str, current_year: i32) -> Option<i32> {
    let bytes = raw.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if !bytes[idx].is_ascii_digit() {
            idx += 1;
            continue;
        }
        let start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx - start >= 4 {
            if let Ok(year) = raw[start..start + 4].parse::<i32>() {
                if (1800..=current_year).contains(&year) {
                    return Some(year);
                }
            }
        }
    }
    None
}

pub fn normalize_homepage(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("http://{}", trimmed))
    }
}

/// Resolves the fiscal year and `YYYY-MM` period of a staging row.
///
/// `period` may be `YYYY-MM`, `YYYYMM`, `YYYY-MM-DD` or `YYYY`; a bare year
/// means a calendar fiscal year ending in December. Falls back to `year`.
pub fn parse_period(period: Option<&str>, year: Option<i32>) -> Option<(i32, String)> {
    let from_period = period.and_then(|p| {
        let digits: String = p.chars().filter(char::is_ascii_digit).collect();
        let (y, m) = match digits.len() {
            4 => (digits.parse::<i32>().ok()?, 12),
            n if n >= 6 => (digits[..4].parse::<i32>().ok()?, digits[4..6].parse::<u32>().ok()?),
            _ => return None,
        };
        valid_period(y, m)
    });

    from_period.or_else(|| year.and_then(|y| valid_period(y, 12)))
}

fn valid_period(year: i32, month: u32) -> Option<(i32, String)> {
    if !(1800..=2200).contains(&year) || !(1..=12).contains(&month) {
        return None;
    }
    Some((year, format!("{:04}-{:02}", year, month)))
}
