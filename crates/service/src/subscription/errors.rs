use thiserror::Error;

/// Failure reported by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("subscription not found")]
    NotFound,
    #[error("{0}")]
    Backend(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e {
            sea_orm::DbErr::RecordNotFound(_) => StoreError::NotFound,
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Why an in-flight storage call was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CancelCause {
    #[error("cancellation requested")]
    Requested,
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Business errors for subscription workflows.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("validation failed: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("invalid {field} format: {input:?} (expected MM-YYYY)")]
    InvalidPeriodFormat { field: &'static str, input: String },
    #[error("end period cannot be before start period")]
    InvalidWindow,
    #[error("{field} is required")]
    MissingRequiredPeriod { field: &'static str },
    #[error("subscription not found")]
    NotFound,
    /// Storage failure; the backend detail stays in `source`.
    #[error("failed to {operation}")]
    Storage {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("{operation} aborted: {cause}")]
    Cancelled { operation: &'static str, cause: CancelCause },
}

impl SubscriptionError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation { field, reason: reason.into() }
    }

    /// Pass `NotFound` through untouched, wrap everything else with the operation.
    pub fn from_store(operation: &'static str, e: StoreError) -> Self {
        match e {
            StoreError::NotFound => Self::NotFound,
            source => Self::Storage { operation, source },
        }
    }

    /// True for errors caused by the request itself rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::InvalidPeriodFormat { .. } | Self::InvalidWindow | Self::MissingRequiredPeriod { .. }
        )
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 2001,
            Self::InvalidPeriodFormat { .. } => 2002,
            Self::InvalidWindow => 2003,
            Self::MissingRequiredPeriod { .. } => 2004,
            Self::NotFound => 2101,
            Self::Storage { .. } => 2201,
            Self::Cancelled { .. } => 2202,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_passes_through_unwrapped() {
        let e = SubscriptionError::from_store("get subscription", StoreError::NotFound);
        assert!(matches!(e, SubscriptionError::NotFound));
    }

    #[test]
    fn backend_errors_hide_detail_behind_operation() {
        let e = SubscriptionError::from_store("update subscription", StoreError::Backend("relation does not exist".into()));
        assert_eq!(e.to_string(), "failed to update subscription");
        let source = std::error::Error::source(&e).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("relation does not exist"));
    }

    #[test]
    fn client_errors_are_classified_by_variant() {
        assert!(SubscriptionError::InvalidWindow.is_client_error());
        assert!(SubscriptionError::validation("price", "price must be positive").is_client_error());
        assert!(!SubscriptionError::NotFound.is_client_error());
        assert!(!SubscriptionError::Cancelled { operation: "x", cause: CancelCause::Requested }.is_client_error());
    }

    #[test]
    fn cancellation_message_names_the_cause() {
        let e = SubscriptionError::Cancelled { operation: "list subscriptions", cause: CancelCause::DeadlineExceeded };
        assert_eq!(e.to_string(), "list subscriptions aborted: deadline exceeded");
        assert_eq!(CancelCause::Requested.to_string(), "cancellation requested");
    }

    #[test]
    fn record_not_found_maps_to_not_found() {
        let e: StoreError = sea_orm::DbErr::RecordNotFound("subscriptions".into()).into();
        assert!(matches!(e, StoreError::NotFound));
    }
}
