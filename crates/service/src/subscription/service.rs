use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::pagination::Pagination;

use super::context::RequestContext;
use super::domain::{
    CreateSubscriptionRequest, ListResponse, ListSubscriptionsQuery, SubscriptionDraft, SubscriptionResponse,
    TotalCostRequest, TotalCostResponse, UpdateSubscriptionRequest, CURRENCY,
};
use super::errors::SubscriptionError;
use super::filter::build_filter;
use super::repository::SubscriptionRepository;
use super::validation::{parse_date_field, validate, ValidationScope};

/// Subscription business service independent of web framework.
///
/// Every input is parsed and validated before storage is touched; storage
/// calls run under the caller's [`RequestContext`].
pub struct SubscriptionService<R: SubscriptionRepository + ?Sized> {
    repo: Arc<R>,
}

fn require_id(id: Uuid) -> Result<(), SubscriptionError> {
    if id.is_nil() {
        return Err(SubscriptionError::validation("id", "subscription ID is required"));
    }
    Ok(())
}

impl<R: SubscriptionRepository + ?Sized> SubscriptionService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a subscription starting at `start_date` with no end date.
    ///
    /// # Examples
    /// ```
    /// use service::subscription::{SubscriptionService, RequestContext, CreateSubscriptionRequest};
    /// use service::subscription::repository::mock::MockSubscriptionRepository;
    /// use std::sync::Arc;
    /// let svc = SubscriptionService::new(Arc::new(MockSubscriptionRepository::default()));
    /// let req = CreateSubscriptionRequest {
    ///     service_name: "Netflix".into(),
    ///     price: 799,
    ///     user_id: uuid::Uuid::new_v4(),
    ///     start_date: "01-2024".into(),
    /// };
    /// let created = tokio_test::block_on(svc.create_subscription(&RequestContext::new(), req)).unwrap();
    /// assert_eq!(created.start_date, "01-2024");
    /// assert!(created.end_date.is_none());
    /// ```
    #[instrument(skip(self, ctx, req), fields(user_id = %req.user_id, service_name = %req.service_name))]
    pub async fn create_subscription(
        &self,
        ctx: &RequestContext,
        req: CreateSubscriptionRequest,
    ) -> Result<SubscriptionResponse, SubscriptionError> {
        let start_date = parse_date_field("start_date", &req.start_date)?;
        let new = SubscriptionDraft {
            service_name: req.service_name,
            price: req.price,
            user_id: req.user_id,
            start_date,
            end_date: None,
        }
        .validate(ValidationScope::Create)?;

        let created = ctx.run("create subscription", self.repo.create(new)).await?;
        info!(subscription_id = %created.id, user_id = %created.user_id, event = "subscription_created", "subscription created");
        Ok(SubscriptionResponse::from(&created))
    }

    #[instrument(skip(self, ctx), fields(subscription_id = %id))]
    pub async fn get_subscription(&self, ctx: &RequestContext, id: Uuid) -> Result<SubscriptionResponse, SubscriptionError> {
        require_id(id)?;
        let found = ctx.run("get subscription", self.repo.get_by_id(id)).await?;
        Ok(SubscriptionResponse::from(&found))
    }

    /// Full-field replace of service name, price and period. The owner is
    /// taken from the stored record. Request fields are validated before
    /// storage is read, and nothing is written unless the merged record
    /// validates.
    #[instrument(skip(self, ctx, req), fields(subscription_id = %id))]
    pub async fn update_subscription(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateSubscriptionRequest,
    ) -> Result<SubscriptionResponse, SubscriptionError> {
        require_id(id)?;
        let start_date = parse_date_field("start_date", &req.start_date)?;
        let end_date = match req.end_date.as_deref() {
            Some(text) => Some(
                parse_date_field("end_date", text)?
                    .ok_or_else(|| SubscriptionError::InvalidPeriodFormat { field: "end_date", input: String::new() })?,
            ),
            None => None,
        };

        // The owner is not known until the fetch; Update scope skips that rule.
        let mut draft = SubscriptionDraft {
            service_name: req.service_name,
            price: req.price,
            user_id: Uuid::nil(),
            start_date,
            end_date,
        };
        validate(&draft, ValidationScope::Update)?;

        let current = ctx.run("get subscription", self.repo.get_by_id(id)).await?;
        draft.user_id = current.user_id;
        let fields = draft.validate(ValidationScope::Update)?;

        let updated = ctx.run("update subscription", self.repo.update(current.apply(fields))).await?;
        info!(subscription_id = %updated.id, event = "subscription_updated", "subscription updated");
        Ok(SubscriptionResponse::from(&updated))
    }

    #[instrument(skip(self, ctx), fields(subscription_id = %id))]
    pub async fn delete_subscription(&self, ctx: &RequestContext, id: Uuid) -> Result<(), SubscriptionError> {
        require_id(id)?;
        ctx.run("delete subscription", self.repo.delete(id)).await?;
        info!(subscription_id = %id, event = "subscription_deleted", "subscription deleted");
        Ok(())
    }

    /// Page through subscriptions, newest first. `total` is the size of the
    /// returned page.
    #[instrument(skip(self, ctx, query), fields(page = query.page, limit = query.limit))]
    pub async fn list_subscriptions(
        &self,
        ctx: &RequestContext,
        query: ListSubscriptionsQuery,
    ) -> Result<ListResponse, SubscriptionError> {
        let (limit, offset) = Pagination { page: query.page, limit: query.limit }.normalize();
        let (items, total) = ctx.run("list subscriptions", self.repo.list(query.user_id, limit, offset)).await?;
        debug!(limit, offset, total, "listed subscriptions");
        Ok(ListResponse { total, data: items.iter().map(SubscriptionResponse::from).collect() })
    }

    /// Sum the price of every subscription active in at least one month of
    /// `[start_period, end_period]`. The response echoes the period texts as given.
    #[instrument(skip(self, ctx, req), fields(start = %req.start_period, end = %req.end_period))]
    pub async fn calculate_total_cost(
        &self,
        ctx: &RequestContext,
        req: TotalCostRequest,
    ) -> Result<TotalCostResponse, SubscriptionError> {
        let filter = build_filter(req.user_id, req.service_name.clone(), &req.start_period, &req.end_period)?;
        let total_cost = ctx.run("calculate total cost", self.repo.total_cost(filter)).await?;
        debug!(total_cost, "total cost calculated");
        Ok(TotalCostResponse {
            total_cost,
            currency: CURRENCY.to_string(),
            period: format!("{} - {}", req.start_period, req.end_period),
        })
    }
}
