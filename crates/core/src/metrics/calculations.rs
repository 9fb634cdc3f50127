//! Financial ratio helpers over a company's reported periods.

use std::collections::BTreeMap;

use crate::constants::CAGR_YEARS;
use crate::financials::CompanyFinancial;

/// Compound annual growth rate between two values `years` apart.
pub fn cagr(start: f64, end: f64, years: i32) -> Option<f64> {
    if years <= 0 || !start.is_finite() || !end.is_finite() || start <= 0.0 || end < 0.0 {
        return None;
    }
    Some((end / start).powf(1.0 / f64::from(years)) - 1.0)
}

/// Relative change from `previous` to `current`.
pub fn growth_rate(previous: f64, current: f64) -> Option<f64> {
    if !previous.is_finite() || !current.is_finite() || previous <= 0.0 {
        return None;
    }
    Some(current / previous - 1.0)
}

/// `numerator / revenue`, only for positive revenue.
pub fn margin(numerator: Option<f64>, revenue: Option<f64>) -> Option<f64> {
    match (numerator, revenue) {
        (Some(n), Some(r)) if n.is_finite() && r.is_finite() && r > 0.0 => Some(n / r),
        _ => None,
    }
}

/// One representative period per fiscal year.
///
/// When a year holds several periods (shortened or extended fiscal years),
/// the one ending last is kept.
pub fn periods_by_year(financials: &[CompanyFinancial]) -> BTreeMap<i32, &CompanyFinancial> {
    let mut by_year: BTreeMap<i32, &CompanyFinancial> = BTreeMap::new();
    for row in financials {
        by_year
            .entry(row.year)
            .and_modify(|current| {
                if row.period > current.period {
                    *current = row;
                }
            })
            .or_insert(row);
    }
    by_year
}

/// Ratios derived from the latest fiscal year with reported revenue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestFigures {
    pub year: Option<i32>,
    pub revenue: Option<f64>,
    pub profit: Option<f64>,
    pub ebit: Option<f64>,
    pub ebitda: Option<f64>,
    pub employees: Option<i32>,
    pub revenue_growth_yoy: Option<f64>,
    pub revenue_cagr_3y: Option<f64>,
}

pub fn latest_figures(financials: &[CompanyFinancial]) -> LatestFigures {
    let by_year = periods_by_year(financials);
    let Some((&year, latest)) = by_year.iter().rev().find(|(_, f)| f.revenue.is_some()) else {
        return LatestFigures::default();
    };

    let revenue_of = |y: i32| by_year.get(&y).and_then(|f| f.revenue);
    let revenue = latest.revenue;

    let revenue_growth_yoy = match (revenue_of(year - 1), revenue) {
        (Some(prev), Some(cur)) => growth_rate(prev, cur),
        _ => None,
    };
    let revenue_cagr_3y = match (revenue_of(year - CAGR_YEARS), revenue) {
        (Some(start), Some(end)) => cagr(start, end, CAGR_YEARS),
        _ => None,
    };

    LatestFigures {
        year: Some(year),
        revenue,
        profit: latest.profit,
        ebit: latest.ebit,
        ebitda: latest.ebitda,
        employees: latest.employees,
        revenue_growth_yoy,
        revenue_cagr_3y,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::financials::financial_row_id;
    use chrono::NaiveDate;

    pub fn period(orgnr: &str, year: i32, revenue: Option<f64>, ebit: Option<f64>) -> CompanyFinancial {
        let period = format!("{}-12", year);
        CompanyFinancial {
            id: financial_row_id(orgnr, &period),
            orgnr: orgnr.to_string(),
            year,
            period,
            currency: "SEK".to_string(),
            revenue,
            profit: ebit.map(|e| e * 0.78),
            ebit,
            ebitda: ebit.map(|e| e + 1_000_000.0),
            employees: None,
            account_codes: Default::default(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::period;
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_cagr() {
        let c = cagr(100.0, 172.8, 3).unwrap();
        assert!(approx(c, 0.2));
        assert!(approx(cagr(100.0, 0.0, 3).unwrap(), -1.0));
        assert_eq!(cagr(0.0, 100.0, 3), None);
        assert_eq!(cagr(-5.0, 100.0, 3), None);
        assert_eq!(cagr(100.0, -1.0, 3), None);
        assert_eq!(cagr(100.0, 120.0, 0), None);
    }

    #[test]
    fn test_growth_rate_and_margin() {
        assert!(approx(growth_rate(100.0, 110.0).unwrap(), 0.1));
        assert_eq!(growth_rate(0.0, 110.0), None);
        assert!(approx(margin(Some(15.0), Some(100.0)).unwrap(), 0.15));
        assert_eq!(margin(Some(15.0), Some(0.0)), None);
        assert_eq!(margin(None, Some(100.0)), None);
    }

    #[test]
    fn test_latest_figures_uses_year_three_back() {
        let rows = vec![
            period("5560125790", 2020, Some(100.0), Some(5.0)),
            period("5560125790", 2021, Some(120.0), Some(8.0)),
            period("5560125790", 2022, Some(150.0), Some(12.0)),
            period("5560125790", 2023, Some(172.8), Some(20.0)),
        ];
        let f = latest_figures(&rows);
        assert_eq!(f.year, Some(2023));
        assert_eq!(f.revenue, Some(172.8));
        assert!(approx(f.revenue_cagr_3y.unwrap(), 0.2));
        assert!(approx(f.revenue_growth_yoy.unwrap(), 172.8 / 150.0 - 1.0));
    }

    #[test]
    fn test_latest_figures_without_base_year() {
        let rows = vec![
            period("5560125790", 2022, Some(150.0), None),
            period("5560125790", 2023, Some(160.0), None),
        ];
        let f = latest_figures(&rows);
        assert_eq!(f.revenue_cagr_3y, None);
        assert!(f.revenue_growth_yoy.is_some());
    }

    #[test]
    fn test_latest_year_skips_years_without_revenue() {
        let rows = vec![
            period("5560125790", 2022, Some(150.0), None),
            period("5560125790", 2023, None, Some(3.0)),
        ];
        assert_eq!(latest_figures(&rows).year, Some(2022));
        assert_eq!(latest_figures(&[]), LatestFigures::default());
    }

    #[test]
    fn test_periods_by_year_prefers_later_period_end() {
        let mut short = period("5560125790", 2023, Some(50.0), None);
        short.period = "2023-04".to_string();
        let full = period("5560125790", 2023, Some(200.0), None);
        let rows = vec![full, short];
        let by_year = periods_by_year(&rows);
        assert_eq!(by_year[&2023].revenue, Some(200.0));
    }
}
