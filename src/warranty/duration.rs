use chrono::{Duration, NaiveDate};

/// Calendar dates are stored as plain `YYYY-MM-DD` strings.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Warranty duration policy, stored as a code string on the record.
///
/// Every fixed policy maps to a flat day count. "1 year" is 365 days, never
/// calendar-year addition; a leap day inside the span shifts the resulting
/// calendar date accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationPolicy {
    Days90,
    OneYear,
    TwoYears,
    ThreeYears,
    FiveYears,
    TenYears,
    Custom,
}

impl DurationPolicy {
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "90_days" => Some(Self::Days90),
            "1_year" => Some(Self::OneYear),
            "2_years" => Some(Self::TwoYears),
            "3_years" => Some(Self::ThreeYears),
            "5_years" => Some(Self::FiveYears),
            "10_years" => Some(Self::TenYears),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Days90 => "90_days",
            Self::OneYear => "1_year",
            Self::TwoYears => "2_years",
            Self::ThreeYears => "3_years",
            Self::FiveYears => "5_years",
            Self::TenYears => "10_years",
            Self::Custom => "custom",
        }
    }

    /// Day count for this policy. For `Custom`, an absent or negative
    /// caller-supplied count is treated as 0.
    pub fn day_count(&self, custom_days: Option<i64>) -> i64 {
        match self {
            Self::Days90 => 90,
            Self::OneYear => 365,
            Self::TwoYears => 730,
            Self::ThreeYears => 1095,
            Self::FiveYears => 1825,
            Self::TenYears => 3650,
            Self::Custom => custom_days.filter(|d| *d >= 0).unwrap_or(0),
        }
    }
}

/// Compute the stored expiration date from a purchase date and duration code.
///
/// Returns None when the purchase date is missing or unparseable, or the
/// duration code is unrecognized. Plain day arithmetic only.
pub fn expiration_date(
    purchase_date: Option<&str>,
    duration: &str,
    custom_days: Option<i64>,
) -> Option<String> {
    let purchased = NaiveDate::parse_from_str(purchase_date?, DATE_FORMAT).ok()?;
    let policy = DurationPolicy::parse(duration)?;
    let expires = purchased + Duration::days(policy.day_count(custom_days));
    Some(expires.format(DATE_FORMAT).to_string())
}
