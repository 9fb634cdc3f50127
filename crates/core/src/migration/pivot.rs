//! Turns long-format staging rows (one account code per row) into one
//! `CompanyFinancial` per company and period.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::constants::{
    ACCOUNT_DEPRECIATION, ACCOUNT_EBITDA, ACCOUNT_EMPLOYEES, ACCOUNT_NET_PROFIT,
    ACCOUNT_NET_SALES, ACCOUNT_OPERATING_RESULT, REPORTING_CURRENCY,
};
use crate::financials::{financial_row_id, AccountCodes, CompanyFinancial};
use crate::utils::orgnr::normalize_orgnr;

use super::field_mapping::parse_period;
use super::migration_model::StagingFinancialRow;

#[derive(Debug, Default)]
pub struct PivotOutcome {
    pub financials: Vec<CompanyFinancial>,
    pub warnings: Vec<String>,
}

/// Groups rows by (orgnr, period). Later rows override earlier ones for the
/// same code, so callers pass rows in id order.
pub fn pivot_financials(
    rows: &[StagingFinancialRow],
    amount_multiplier: f64,
    created_at: NaiveDateTime,
) -> PivotOutcome {
    let mut outcome = PivotOutcome::default();
    let mut grouped: BTreeMap<(String, String), (i32, AccountCodes)> = BTreeMap::new();

    for row in rows {
        let Ok(orgnr) = normalize_orgnr(&row.orgnr) else {
            outcome.warnings.push(format!(
                "staging_financials {}: invalid orgnr '{}'",
                row.id, row.orgnr
            ));
            continue;
        };
        let Some((year, period)) = parse_period(row.period.as_deref(), row.year) else {
            outcome.warnings.push(format!(
                "staging_financials {}: no usable period or year for {}",
                row.id, orgnr
            ));
            continue;
        };
        let Some(amount) = row.amount.filter(|a| a.is_finite()) else {
            continue;
        };
        let code = row.account_code.trim().to_uppercase();
        if code.is_empty() {
            continue;
        }

        grouped
            .entry((orgnr, period))
            .or_insert_with(|| (year, AccountCodes::new()))
            .1
            .insert(code, amount);
    }

    outcome.financials = grouped
        .into_iter()
        .map(|((orgnr, period), (year, codes))| {
            build_financial(orgnr, year, period, codes, amount_multiplier, created_at)
        })
        .collect();
    outcome
}

fn build_financial(
    orgnr: String,
    year: i32,
    period: String,
    account_codes: AccountCodes,
    multiplier: f64,
    created_at: NaiveDateTime,
) -> CompanyFinancial {
    let code = |name: &str| account_codes.get(name).copied();
    let scaled = |name: &str| code(name).map(|v| v * multiplier);

    let ebit = scaled(ACCOUNT_OPERATING_RESULT);
    // Depreciation is added back whichever sign it was reported with.
    let ebitda = scaled(ACCOUNT_EBITDA).or_else(|| {
        let depreciation = scaled(ACCOUNT_DEPRECIATION)?;
        Some(ebit? + depreciation.abs())
    });
    let employees = code(ACCOUNT_EMPLOYEES)
        .filter(|v| *v >= 0.0)
        .and_then(|v| i32::try_from(v.round() as i64).ok());

    CompanyFinancial {
        id: financial_row_id(&orgnr, &period),
        orgnr,
        year,
        period,
        currency: REPORTING_CURRENCY.to_string(),
        revenue: scaled(ACCOUNT_NET_SALES),
        profit: scaled(ACCOUNT_NET_PROFIT),
        ebit,
        ebitda,
        employees,
        account_codes,
        created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::now_naive;

    fn row(id: i64, orgnr: &str, period: Option<&str>, year: Option<i32>, code: &str, amount: Option<f64>) -> StagingFinancialRow {
        StagingFinancialRow {
            id,
            orgnr: orgnr.to_string(),
            year,
            period: period.map(str::to_string),
            account_code: code.to_string(),
            amount,
        }
    }

    #[test]
    fn test_pivot_groups_by_period_and_scales() {
        let rows = vec![
            row(1, "556012-5790", Some("2023-12"), Some(2023), "sdi", Some(12_000.0)),
            row(2, "5560125790", Some("2023-12"), Some(2023), "RG", Some(1_500.0)),
            row(3, "5560125790", Some("2023-12"), Some(2023), "AVS", Some(-300.0)),
            row(4, "5560125790", Some("2023-12"), Some(2023), "ANT", Some(14.0)),
            row(5, "5560125790", None, Some(2022), "SDI", Some(10_000.0)),
            row(6, "5560125790", Some("2023-12"), Some(2023), "DR", None),
        ];
        let outcome = pivot_financials(&rows, 1000.0, now_naive());
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.financials.len(), 2);

        let latest = &outcome.financials[1];
        assert_eq!(latest.id, "5560125790_2023-12");
        assert_eq!(latest.year, 2023);
        assert_eq!(latest.revenue, Some(12_000_000.0));
        assert_eq!(latest.ebit, Some(1_500_000.0));
        assert_eq!(latest.ebitda, Some(1_800_000.0));
        assert_eq!(latest.profit, None);
        assert_eq!(latest.employees, Some(14));
        assert_eq!(latest.currency, "SEK");
        // raw codes are kept as reported
        assert_eq!(latest.account_codes.get("SDI"), Some(&12_000.0));
        assert!(!latest.account_codes.contains_key("DR"));

        assert_eq!(outcome.financials[0].period, "2022-12");
    }

    #[test]
    fn test_reported_ebitda_wins_and_last_duplicate_wins() {
        let rows = vec![
            row(1, "5560125790", Some("2023-12"), None, "RG", Some(100.0)),
            row(2, "5560125790", Some("2023-12"), None, "AVS", Some(50.0)),
            row(3, "5560125790", Some("2023-12"), None, "EBITDA", Some(140.0)),
            row(4, "5560125790", Some("2023-12"), None, "EBITDA", Some(160.0)),
        ];
        let outcome = pivot_financials(&rows, 1.0, now_naive());
        assert_eq!(outcome.financials[0].ebitda, Some(160.0));
    }

    #[test]
    fn test_unusable_rows_are_reported() {
        let rows = vec![
            row(1, "bogus", Some("2023-12"), None, "SDI", Some(1.0)),
            row(2, "5560125790", None, None, "SDI", Some(1.0)),
        ];
        let outcome = pivot_financials(&rows, 1.0, now_naive());
        assert!(outcome.financials.is_empty());
        assert_eq!(outcome.warnings.len(), 2);
    }
}
