//! Subscription field invariants.
//!
//! Rules are checked in a fixed order and the first violation is reported:
//! service name present, service name length, positive price, owner present,
//! start date present, end date not before start date.

use chrono::NaiveDate;
use models::period::parse_period;
use models::subscription::SERVICE_NAME_MAX_LEN;

use super::domain::{NewSubscription, SubscriptionDraft};
use super::errors::SubscriptionError;

/// Which operation the draft belongs to. Updates never resubmit the owner,
/// so the owner rule is skipped for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationScope {
    Create,
    Update,
}

pub fn validate(draft: &SubscriptionDraft, scope: ValidationScope) -> Result<(), SubscriptionError> {
    if draft.service_name.is_empty() {
        return Err(SubscriptionError::validation("service_name", "service name is required"));
    }
    if draft.service_name.chars().count() > SERVICE_NAME_MAX_LEN {
        return Err(SubscriptionError::validation("service_name", "service name too long"));
    }
    if draft.price <= 0 {
        return Err(SubscriptionError::validation("price", "price must be positive"));
    }
    if scope == ValidationScope::Create && draft.user_id.is_nil() {
        return Err(SubscriptionError::validation("user_id", "user ID is required"));
    }
    let Some(start) = draft.start_date else {
        return Err(SubscriptionError::validation("start_date", "start date is required"));
    };
    if draft.end_date.is_some_and(|end| end < start) {
        return Err(SubscriptionError::validation("end_date", "end date cannot be before start date"));
    }
    Ok(())
}

impl SubscriptionDraft {
    /// Validated construction.
    pub fn validate(self, scope: ValidationScope) -> Result<NewSubscription, SubscriptionError> {
        validate(&self, scope)?;
        let start_date = self
            .start_date
            .ok_or_else(|| SubscriptionError::validation("start_date", "start date is required"))?;
        Ok(NewSubscription {
            service_name: self.service_name,
            price: self.price,
            user_id: self.user_id,
            start_date,
            end_date: self.end_date,
        })
    }
}

/// Parse a month field from a request body. Empty text means "not given" and
/// is left for the validator to report.
pub(crate) fn parse_date_field(field: &'static str, text: &str) -> Result<Option<NaiveDate>, SubscriptionError> {
    if text.is_empty() {
        return Ok(None);
    }
    parse_period(text)
        .map(Some)
        .map_err(|_| SubscriptionError::InvalidPeriodFormat { field, input: text.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn draft() -> SubscriptionDraft {
        SubscriptionDraft {
            service_name: "Netflix".into(),
            price: 799,
            user_id: Uuid::from_u128(7),
            start_date: parse_period("01-2024").ok(),
            end_date: None,
        }
    }

    fn field_of(r: Result<(), SubscriptionError>) -> &'static str {
        match r {
            Err(SubscriptionError::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(validate(&draft(), ValidationScope::Create).is_ok());
    }

    #[test]
    fn each_rule_is_reported() {
        let mut d = draft();
        d.service_name.clear();
        assert_eq!(field_of(validate(&d, ValidationScope::Create)), "service_name");

        let mut d = draft();
        d.service_name = "x".repeat(256);
        assert_eq!(field_of(validate(&d, ValidationScope::Create)), "service_name");

        let mut d = draft();
        d.price = 0;
        assert_eq!(field_of(validate(&d, ValidationScope::Create)), "price");
        d.price = -5;
        assert_eq!(field_of(validate(&d, ValidationScope::Create)), "price");

        let mut d = draft();
        d.user_id = Uuid::nil();
        assert_eq!(field_of(validate(&d, ValidationScope::Create)), "user_id");

        let mut d = draft();
        d.start_date = None;
        assert_eq!(field_of(validate(&d, ValidationScope::Create)), "start_date");

        let mut d = draft();
        d.end_date = parse_period("12-2023").ok();
        assert_eq!(field_of(validate(&d, ValidationScope::Create)), "end_date");
    }

    #[test]
    fn first_violation_wins() {
        let d = SubscriptionDraft {
            service_name: String::new(),
            price: 0,
            user_id: Uuid::nil(),
            start_date: None,
            end_date: None,
        };
        assert_eq!(field_of(validate(&d, ValidationScope::Create)), "service_name");

        let d = SubscriptionDraft { service_name: "a".into(), ..d };
        assert_eq!(field_of(validate(&d, ValidationScope::Create)), "price");

        let d = SubscriptionDraft { price: 1, ..d };
        assert_eq!(field_of(validate(&d, ValidationScope::Create)), "user_id");
        assert_eq!(field_of(validate(&d, ValidationScope::Update)), "start_date");
    }

    #[test]
    fn length_limit_counts_characters() {
        let mut d = draft();
        d.service_name = "я".repeat(255);
        assert!(validate(&d, ValidationScope::Create).is_ok());
    }

    #[test]
    fn boundaries_are_accepted() {
        let mut d = draft();
        d.price = 1;
        d.service_name = "x".repeat(255);
        d.end_date = d.start_date;
        let new = d.validate(ValidationScope::Create).unwrap();
        assert_eq!(new.end_date, Some(new.start_date));
    }

    #[test]
    fn update_scope_skips_owner() {
        let mut d = draft();
        d.user_id = Uuid::nil();
        assert!(validate(&d, ValidationScope::Update).is_ok());
    }

    #[test]
    fn date_field_parsing() {
        assert_eq!(parse_date_field("start_date", "").unwrap(), None);
        assert_eq!(parse_date_field("start_date", "02-2024").unwrap(), parse_period("02-2024").ok());
        assert!(matches!(
            parse_date_field("end_date", "2024-02"),
            Err(SubscriptionError::InvalidPeriodFormat { field: "end_date", .. })
        ));
    }
}
