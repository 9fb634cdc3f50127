/// Reporting currency of every normalized financial row
pub const REPORTING_CURRENCY: &str = "SEK";

/// Legacy staging amounts are reported in thousands of SEK
pub const DEFAULT_AMOUNT_MULTIPLIER: f64 = 1000.0;

/// Account code: net sales (nettoomsättning)
pub const ACCOUNT_NET_SALES: &str = "SDI";

/// Account code: operating result (rörelseresultat, EBIT)
pub const ACCOUNT_OPERATING_RESULT: &str = "RG";

/// Account code: net profit for the year (årets resultat)
pub const ACCOUNT_NET_PROFIT: &str = "DR";

/// Account code: depreciation and amortisation (avskrivningar)
pub const ACCOUNT_DEPRECIATION: &str = "AVS";

/// Account code: EBITDA when reported directly
pub const ACCOUNT_EBITDA: &str = "EBITDA";

/// Account code: average number of employees
pub const ACCOUNT_EMPLOYEES: &str = "ANT";

/// Years spanned by the revenue CAGR stored on metrics
pub const CAGR_YEARS: i32 = 3;

/// Default page size for company searches
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Upper bound for company search page sizes
pub const MAX_PAGE_SIZE: i64 = 500;

/// Maximum length for user supplied names (lists, analysis runs)
pub const MAX_NAME_LENGTH: usize = 120;

/// Number of segments reported on the dashboard summary
pub const TOP_SEGMENTS: usize = 10;

/// Companies per batch when recomputing every metrics row
pub const RECOMPUTE_BATCH_SIZE: usize = 500;
