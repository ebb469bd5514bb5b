use models::period::parse_period;
use uuid::Uuid;

use super::domain::SubscriptionFilter;
use super::errors::SubscriptionError;

/// Assemble an aggregation filter from request parameters.
///
/// Both periods are required `MM-YYYY` texts; the window is closed and may
/// span a single month (`end == start`), but `end < start` is rejected.
pub fn build_filter(
    user_id: Option<Uuid>,
    service_name: Option<String>,
    start_period: &str,
    end_period: &str,
) -> Result<SubscriptionFilter, SubscriptionError> {
    if start_period.is_empty() {
        return Err(SubscriptionError::MissingRequiredPeriod { field: "start_period" });
    }
    if end_period.is_empty() {
        return Err(SubscriptionError::MissingRequiredPeriod { field: "end_period" });
    }
    let start_date = parse_period(start_period)
        .map_err(|_| SubscriptionError::InvalidPeriodFormat { field: "start_period", input: start_period.to_string() })?;
    let end_date = parse_period(end_period)
        .map_err(|_| SubscriptionError::InvalidPeriodFormat { field: "end_period", input: end_period.to_string() })?;
    if end_date < start_date {
        return Err(SubscriptionError::InvalidWindow);
    }
    Ok(SubscriptionFilter { user_id, service_name, start_date, end_date })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn builds_window_from_anchor_dates() {
        let uid = Uuid::new_v4();
        let f = build_filter(Some(uid), Some("Netflix".into()), "01-2024", "12-2024").unwrap();
        assert_eq!(f.user_id, Some(uid));
        assert_eq!(f.service_name.as_deref(), Some("Netflix"));
        assert_eq!(f.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(f.end_date, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
    }

    #[test]
    fn single_month_window_is_allowed() {
        let f = build_filter(None, None, "05-2024", "05-2024").unwrap();
        assert_eq!(f.start_date, f.end_date);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = build_filter(None, None, "12-2024", "01-2024").unwrap_err();
        assert!(matches!(err, SubscriptionError::InvalidWindow));
    }

    #[test]
    fn missing_periods_are_reported_first() {
        assert!(matches!(
            build_filter(None, None, "", "bogus"),
            Err(SubscriptionError::MissingRequiredPeriod { field: "start_period" })
        ));
        assert!(matches!(
            build_filter(None, None, "bogus", ""),
            Err(SubscriptionError::MissingRequiredPeriod { field: "end_period" })
        ));
    }

    #[test]
    fn malformed_periods_name_the_field() {
        assert!(matches!(
            build_filter(None, None, "2024-01", "12-2024"),
            Err(SubscriptionError::InvalidPeriodFormat { field: "start_period", .. })
        ));
        assert!(matches!(
            build_filter(None, None, "01-2024", "13-2024"),
            Err(SubscriptionError::InvalidPeriodFormat { field: "end_period", .. })
        ));
    }
}
