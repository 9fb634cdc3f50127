//! Swedish organisation number (orgnr) helpers.

use crate::errors::{Result, ValidationError};

/// Normalizes an organisation number to its 10-digit form.
///
/// Accepts the usual separators (`556677-8899`, `556677 8899`) and the
/// 12-digit form with the `16` century prefix used by some registries.
pub fn normalize_orgnr(raw: &str) -> Result<String> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '-' | '+' | ' ' | '.' | '\t'))
        .collect();

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidOrgnr(raw.trim().to_string()).into());
    }

    let digits = match digits.len() {
        10 => digits,
        12 if digits.starts_with("16") => digits[2..].to_string(),
        _ => return Err(ValidationError::InvalidOrgnr(raw.trim().to_string()).into()),
    };

    Ok(digits)
}

/// Luhn check over a normalized 10-digit orgnr.
pub fn has_valid_check_digit(orgnr: &str) -> bool {
    if orgnr.len() != 10 {
        return false;
    }
    let mut sum = 0u32;
    for (idx, c) in orgnr.chars().enumerate() {
        let Some(mut d) = c.to_digit(10) else {
            return false;
        };
        if idx % 2 == 0 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

/// Display form `NNNNNN-NNNN`.
pub fn format_orgnr(orgnr: &str) -> String {
    if orgnr.len() == 10 && orgnr.is_ascii() {
        format!("{}-{}", &orgnr[..6], &orgnr[6..])
    } else {
        orgnr.to_string()
    }
}
