use chrono::{DateTime, NaiveDate, Utc};
use models::period::format_period;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Currency every price and total is denominated in.
pub const CURRENCY: &str = "RUB";

/// Stored subscription (business view).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    /// `None` means the subscription is still active.
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated subscription that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Candidate fields before validation. `start_date` is optional here so
/// that a missing start is reported by the validator in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionDraft {
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Subscription {
    /// Replace every mutable field; id, owner and timestamps are kept.
    pub fn apply(mut self, fields: NewSubscription) -> Self {
        self.service_name = fields.service_name;
        self.price = fields.price;
        self.start_date = fields.start_date;
        self.end_date = fields.end_date;
        self
    }
}

/// Aggregation query: optional owner and service, mandatory month window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SubscriptionFilter {
    /// Reference predicate every storage backend must implement:
    /// owner and service match when given, and
    /// `sub.start <= window.end AND (sub.end IS NULL OR sub.end >= window.start)`.
    pub fn matches(&self, sub: &Subscription) -> bool {
        if self.user_id.is_some_and(|u| u != sub.user_id) {
            return false;
        }
        if self.service_name.as_deref().is_some_and(|s| s != sub.service_name) {
            return false;
        }
        sub.start_date <= self.end_date && sub.end_date.map_or(true, |end| end >= self.start_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    /// `MM-YYYY`
    pub start_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub service_name: String,
    pub price: i32,
    /// `MM-YYYY`
    pub start_date: String,
    /// `MM-YYYY`; absent or null keeps the subscription open-ended.
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListSubscriptionsQuery {
    pub user_id: Option<Uuid>,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TotalCostRequest {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub start_period: String,
    pub end_period: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: String,
    pub end_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Subscription> for SubscriptionResponse {
    fn from(s: &Subscription) -> Self {
        Self {
            id: s.id,
            service_name: s.service_name.clone(),
            price: s.price,
            user_id: s.user_id,
            start_date: format_period(s.start_date),
            end_date: s.end_date.map(format_period),
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub total: u64,
    pub data: Vec<SubscriptionResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalCostResponse {
    pub total_cost: i64,
    pub currency: String,
    pub period: String,
}
