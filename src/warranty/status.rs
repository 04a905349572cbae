use super::duration::DATE_FORMAT;
use chrono::{Duration, NaiveDate};

/// Days ahead of today that still count as "expiring soon", inclusive.
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 30;

/// Three-way derived status shown as the record badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpirationStatus {
    Active,
    ExpiringSoon,
    Expired,
}

impl ExpirationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::ExpiringSoon => "expiring-soon",
            Self::Expired => "expired",
        }
    }
}

/// Classify an expiration date relative to `today`.
///
/// Expired iff strictly in the past; expiring-soon iff today through
/// today+30 inclusive; active beyond that. A date exactly 30 days out is
/// expiring-soon, 31 days out is active.
pub fn classify(expiration: NaiveDate, today: NaiveDate) -> ExpirationStatus {
    if expiration < today {
        ExpirationStatus::Expired
    } else if expiration <= today + Duration::days(EXPIRING_SOON_WINDOW_DAYS) {
        ExpirationStatus::ExpiringSoon
    } else {
        ExpirationStatus::Active
    }
}

/// Classify a stored date string; None when missing or unparseable.
pub fn classify_stored(expiration_date: Option<&str>, today: NaiveDate) -> Option<ExpirationStatus> {
    let expiration = NaiveDate::parse_from_str(expiration_date?, DATE_FORMAT).ok()?;
    Some(classify(expiration, today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_expired_strictly_past() {
        let today = date("2024-06-01");
        assert_eq!(classify(date("2024-05-31"), today), ExpirationStatus::Expired);
        assert_eq!(classify(date("2020-01-01"), today), ExpirationStatus::Expired);
    }

    #[test]
    fn test_today_is_expiring_soon_not_expired() {
        let today = date("2024-06-01");
        assert_eq!(classify(today, today), ExpirationStatus::ExpiringSoon);
    }

    #[test]
    fn test_thirty_day_boundary() {
        let today = date("2024-06-01");
        // exactly 30 days out: expiring-soon
        assert_eq!(
            classify(date("2024-07-01"), today),
            ExpirationStatus::ExpiringSoon
        );
        // 31 days out: active
        assert_eq!(classify(date("2024-07-02"), today), ExpirationStatus::Active);
    }

    #[test]
    fn test_far_future_is_active() {
        let today = date("2024-06-01");
        assert_eq!(classify(date("2030-01-01"), today), ExpirationStatus::Active);
    }

    #[test]
    fn test_classify_stored() {
        let today = date("2024-06-01");
        assert_eq!(
            classify_stored(Some("2024-05-01"), today),
            Some(ExpirationStatus::Expired)
        );
        assert_eq!(classify_stored(None, today), None);
        assert_eq!(classify_stored(Some("garbage"), today), None);
    }

    #[test]
    fn test_badge_strings() {
        assert_eq!(ExpirationStatus::Active.as_str(), "active");
        assert_eq!(ExpirationStatus::ExpiringSoon.as_str(), "expiring-soon");
        assert_eq!(ExpirationStatus::Expired.as_str(), "expired");
    }
}
