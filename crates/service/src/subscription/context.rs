use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::errors::{CancelCause, StoreError, SubscriptionError};

/// Per-request cancellation signal and optional deadline, checked around
/// every storage call. Cloning shares the same token.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new() -> Self { Self::default() }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { token: CancellationToken::new(), deadline: Some(Instant::now() + timeout) }
    }

    /// Tie the context to an externally owned token (e.g. server shutdown).
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn cancel(&self) { self.token.cancel(); }

    /// Drive a storage future, aborting as soon as the token fires or the
    /// deadline passes. Storage errors are classified via
    /// [`SubscriptionError::from_store`].
    pub async fn run<T, F>(&self, operation: &'static str, fut: F) -> Result<T, SubscriptionError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        if self.token.is_cancelled() {
            return Err(SubscriptionError::Cancelled { operation, cause: CancelCause::Requested });
        }
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(SubscriptionError::Cancelled { operation, cause: CancelCause::Requested }),
            _ = deadline => Err(SubscriptionError::Cancelled { operation, cause: CancelCause::DeadlineExceeded }),
            res = fut => res.map_err(|e| SubscriptionError::from_store(operation, e)),
        }
    }
}
