use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewSubscription, Subscription, SubscriptionFilter};
use super::errors::StoreError;

/// Storage capability the subscription service depends on.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert; storage assigns id, `created_at` and `updated_at`.
    async fn create(&self, new: NewSubscription) -> Result<Subscription, StoreError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, StoreError>;
    /// Replace all mutable fields of an existing row and refresh `updated_at`.
    async fn update(&self, subscription: Subscription) -> Result<Subscription, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
    /// Newest first. The returned count is the number of items in this page.
    async fn list(&self, user_id: Option<Uuid>, limit: u64, offset: u64) -> Result<(Vec<Subscription>, u64), StoreError>;
    /// Sum of `price` over rows matching [`SubscriptionFilter::matches`]; 0 when nothing matches.
    async fn total_cost(&self, filter: SubscriptionFilter) -> Result<i64, StoreError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};
    use std::time::Duration;

    use chrono::Utc;

    #[derive(Default)]
    pub struct MockSubscriptionRepository {
        rows: Mutex<Vec<Subscription>>, // insertion order
        writes: AtomicUsize,
        calls: AtomicUsize,
        latency: Option<Duration>,
        failure: Mutex<Option<String>>,
    }

    impl MockSubscriptionRepository {
        /// Every call sleeps for `latency` first; used to exercise deadlines.
        pub fn with_latency(latency: Duration) -> Self {
            Self { latency: Some(latency), ..Default::default() }
        }

        /// Make every subsequent call fail with a backend error.
        pub fn fail_with(&self, message: &str) {
            if let Ok(mut f) = self.failure.lock() {
                *f = Some(message.to_string());
            }
        }

        /// Number of create/update/delete calls that reached the store.
        pub fn writes(&self) -> usize { self.writes.load(Ordering::SeqCst) }

        /// Number of calls of any kind that reached the store.
        pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

        /// Insert a fully formed row, bypassing the service.
        pub fn seed(&self, subscription: Subscription) {
            if let Ok(mut rows) = self.rows.lock() {
                rows.push(subscription);
            }
        }

        async fn enter(&self, write: bool) -> Result<MutexGuard<'_, Vec<Subscription>>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if write {
                self.writes.fetch_add(1, Ordering::SeqCst);
            }
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            let failure = self.failure.lock().map_err(|e| StoreError::Backend(e.to_string()))?.clone();
            if let Some(message) = failure {
                return Err(StoreError::Backend(message));
            }
            self.rows.lock().map_err(|e| StoreError::Backend(e.to_string()))
        }
    }

    #[async_trait]
    impl SubscriptionRepository for MockSubscriptionRepository {
        async fn create(&self, new: NewSubscription) -> Result<Subscription, StoreError> {
            let mut rows = self.enter(true).await?;
            let now = Utc::now();
            let sub = Subscription {
                id: Uuid::new_v4(),
                service_name: new.service_name,
                price: new.price,
                user_id: new.user_id,
                start_date: new.start_date,
                end_date: new.end_date,
                created_at: now,
                updated_at: now,
            };
            rows.push(sub.clone());
            Ok(sub)
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Subscription, StoreError> {
            let rows = self.enter(false).await?;
            rows.iter().find(|s| s.id == id).cloned().ok_or(StoreError::NotFound)
        }

        async fn update(&self, subscription: Subscription) -> Result<Subscription, StoreError> {
            let mut rows = self.enter(true).await?;
            let slot = rows.iter_mut().find(|s| s.id == subscription.id).ok_or(StoreError::NotFound)?;
            *slot = Subscription { updated_at: Utc::now(), ..subscription };
            Ok(slot.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
            let mut rows = self.enter(true).await?;
            let before = rows.len();
            rows.retain(|s| s.id != id);
            if rows.len() == before {
                return Err(StoreError::NotFound);
            }
            Ok(())
        }

        async fn list(&self, user_id: Option<Uuid>, limit: u64, offset: u64) -> Result<(Vec<Subscription>, u64), StoreError> {
            let rows = self.enter(false).await?;
            let page: Vec<Subscription> = rows
                .iter()
                .rev()
                .filter(|s| user_id.map_or(true, |u| s.user_id == u))
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect();
            let count = page.len() as u64;
            Ok((page, count))
        }

        async fn total_cost(&self, filter: SubscriptionFilter) -> Result<i64, StoreError> {
            let rows = self.enter(false).await?;
            Ok(rows.iter().filter(|s| filter.matches(s)).map(|s| i64::from(s.price)).sum())
        }
    }
}
