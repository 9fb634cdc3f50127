//! Metrics domain models and category labels.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ValidationError};

/// Pre-computed latest-year figures and derived ratios for one company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMetrics {
    pub orgnr: String,
    pub latest_year: Option<i32>,
    pub latest_revenue: Option<f64>,
    pub latest_profit: Option<f64>,
    pub latest_ebit: Option<f64>,
    pub latest_ebitda: Option<f64>,
    pub revenue_growth_yoy: Option<f64>,
    pub revenue_cagr_3y: Option<f64>,
    pub ebit_margin: Option<f64>,
    pub net_margin: Option<f64>,
    pub ebitda_margin: Option<f64>,
    pub size_category: SizeCategory,
    pub growth_category: GrowthCategory,
    pub profitability_category: ProfitabilityCategory,
    pub fit_score: i32,
    pub calculated_at: NaiveDateTime,
}

/// Declares a category enum whose serialized form is its display label.
macro_rules! category_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(ValidationError::InvalidInput(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        other
                    ))
                    .into()),
                }
            }
        }
    };
}

category_enum!(
    /// Headcount bucket.
    SizeCategory {
        Micro => "Micro",
        Small => "Small",
        Medium => "Medium",
        Large => "Large",
        Unknown => "Unknown",
    }
);

category_enum!(
    /// Bucket over the 3-year revenue CAGR.
    GrowthCategory {
        HighGrowth => "High Growth",
        ModerateGrowth => "Moderate Growth",
        LowGrowth => "Low Growth",
        Declining => "Declining",
        Unknown => "Unknown",
    }
);

category_enum!(
    /// Bucket over the EBIT margin.
    ProfitabilityCategory {
        HighlyProfitable => "Highly Profitable",
        Profitable => "Profitable",
        BreakEven => "Break-even",
        LossMaking => "Loss-making",
        Unknown => "Unknown",
    }
);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecomputeReport {
    pub companies: usize,
    pub metrics_written: usize,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for c in GrowthCategory::ALL {
            assert_eq!(c.as_str().parse::<GrowthCategory>().unwrap(), *c);
        }
        for c in ProfitabilityCategory::ALL {
            assert_eq!(c.as_str().parse::<ProfitabilityCategory>().unwrap(), *c);
        }
        for c in SizeCategory::ALL {
            assert_eq!(c.as_str().parse::<SizeCategory>().unwrap(), *c);
        }
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&GrowthCategory::HighGrowth).unwrap();
        assert_eq!(json, "\"High Growth\"");
        let parsed: ProfitabilityCategory = serde_json::from_str("\"Break-even\"").unwrap();
        assert_eq!(parsed, ProfitabilityCategory::BreakEven);
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        assert!("Huge".parse::<SizeCategory>().is_err());
    }
}
