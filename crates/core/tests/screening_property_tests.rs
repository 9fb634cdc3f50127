//! Property-based tests for the scoring and normalization rules.

use proptest::prelude::*;
use sme_screener_core::metrics::calculations::cagr;
use sme_screener_core::metrics::{
    fit_score, CategoryThresholds, FitInputs, FitScoreConfig, GrowthCategory,
};
use sme_screener_core::utils::orgnr::{format_orgnr, normalize_orgnr};

// =============================================================================
// Generators
// =============================================================================

fn arb_ratio() -> impl Strategy<Value = Option<f64>> {
    proptest::option::of(prop_oneof![
        -5.0f64..5.0,
        Just(f64::NAN),
        Just(f64::INFINITY),
    ])
}

fn arb_fit_inputs() -> impl Strategy<Value = FitInputs> {
    (
        arb_ratio(),
        arb_ratio(),
        proptest::option::of(-100i32..100_000),
        proptest::option::of(-1e9f64..1e12),
    )
        .prop_map(|(revenue_cagr, ebit_margin, employees, revenue)| FitInputs {
            revenue_cagr,
            ebit_margin,
            employees,
            revenue,
        })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The fit score is always within 0..=100, whatever the inputs.
    #[test]
    fn prop_fit_score_is_bounded(inputs in arb_fit_inputs()) {
        let score = fit_score(&inputs, &FitScoreConfig::default());
        prop_assert!((0..=100).contains(&score.total));
    }

    /// More growth never lowers the fit score.
    #[test]
    fn prop_fit_score_monotone_in_growth(a in -1.0f64..1.0, b in -1.0f64..1.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let config = FitScoreConfig::default();
        let base = FitInputs { ebit_margin: Some(0.1), employees: Some(40), revenue: Some(5e7), ..Default::default() };
        let s_low = fit_score(&FitInputs { revenue_cagr: Some(low), ..base }, &config);
        let s_high = fit_score(&FitInputs { revenue_cagr: Some(high), ..base }, &config);
        prop_assert!(s_low.total <= s_high.total);
    }

    /// A higher CAGR never lands in a lower growth bucket.
    #[test]
    fn prop_growth_category_is_monotone(a in -2.0f64..2.0, b in -2.0f64..2.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let thresholds = CategoryThresholds::default();
        let c_low = thresholds.growth_category(Some(low));
        let c_high = thresholds.growth_category(Some(high));
        prop_assert_ne!(c_low, GrowthCategory::Unknown);
        // Variants are declared from best to worst.
        prop_assert!(c_high <= c_low);
    }

    /// Normalizing an already normalized orgnr is a no-op, and the display
    /// form normalizes back.
    #[test]
    fn prop_orgnr_normalization_is_idempotent(digits in "[0-9]{10}") {
        let once = normalize_orgnr(&digits).unwrap();
        prop_assert_eq!(&once, &digits);
        prop_assert_eq!(normalize_orgnr(&once).unwrap(), once.clone());
        prop_assert_eq!(normalize_orgnr(&format_orgnr(&once)).unwrap(), once);
    }

    /// CAGR over any positive series reproduces the end value.
    #[test]
    fn prop_cagr_reproduces_end_value(start in 1.0f64..1e9, end in 1.0f64..1e9, years in 1i32..10) {
        let rate = cagr(start, end, years).unwrap();
        let projected = start * (1.0 + rate).powi(years);
        prop_assert!((projected - end).abs() / end < 1e-9);
    }
}
