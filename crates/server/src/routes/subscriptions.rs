use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use service::subscription::{
    CreateSubscriptionRequest, ListResponse, ListSubscriptionsQuery, SubscriptionResponse, TotalCostRequest,
    TotalCostResponse, UpdateSubscriptionRequest,
};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub user_id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct TotalCostQuery {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    #[serde(default)]
    pub start_period: String,
    #[serde(default)]
    pub end_period: String,
}

fn parse_subscription_id(raw: &str) -> Result<Uuid, JsonApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| JsonApiError::bad_request("Invalid subscription ID", "Subscription ID must be a valid UUID"))
}

/// Blank means "no filter".
fn parse_user_id(raw: Option<&str>) -> Result<Option<Uuid>, JsonApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|_| JsonApiError::bad_request("Invalid user ID", "User ID must be a valid UUID")),
    }
}

/// Non-numeric values become 0, which pagination clamps to its default.
fn lenient_int(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok()).unwrap_or(0)
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| JsonApiError::bad_request("Invalid request body", e.body_text()))
}

#[utoipa::path(
    post, path = "/subscriptions", tag = "subscriptions",
    request_body = crate::openapi::CreateSubscriptionDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), JsonApiError> {
    let input = body(payload)?;
    let created = state.subscriptions.create_subscription(&state.request_context(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/subscriptions/{id}", tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<SubscriptionResponse>, JsonApiError> {
    let id = parse_subscription_id(&id)?;
    let found = state.subscriptions.get_subscription(&state.request_context(), id).await?;
    Ok(Json(found))
}

#[utoipa::path(
    put, path = "/subscriptions/{id}", tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    request_body = crate::openapi::UpdateSubscriptionDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSubscriptionRequest>, JsonRejection>,
) -> Result<Json<SubscriptionResponse>, JsonApiError> {
    let id = parse_subscription_id(&id)?;
    let input = body(payload)?;
    let updated = state.subscriptions.update_subscription(&state.request_context(), id, input).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/subscriptions/{id}", tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    let id = parse_subscription_id(&id)?;
    state.subscriptions.delete_subscription(&state.request_context(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/subscriptions", tag = "subscriptions",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK", body = crate::openapi::ListDoc),
        (status = 400, description = "Invalid user ID"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>, Query(q): Query<ListQuery>) -> Result<Json<ListResponse>, JsonApiError> {
    let query = ListSubscriptionsQuery {
        user_id: parse_user_id(q.user_id.as_deref())?,
        page: lenient_int(q.page.as_deref()),
        limit: lenient_int(q.limit.as_deref()),
    };
    let page = state.subscriptions.list_subscriptions(&state.request_context(), query).await?;
    info!(count = page.total, "list subscriptions");
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/subscriptions/total-cost", tag = "subscriptions",
    params(TotalCostQuery),
    responses(
        (status = 200, description = "Total cost", body = crate::openapi::TotalCostDoc),
        (status = 400, description = "Invalid period or window"),
        (status = 500, description = "Calculation Failed")
    )
)]
pub async fn total_cost(
    State(state): State<ServerState>,
    Query(q): Query<TotalCostQuery>,
) -> Result<Json<TotalCostResponse>, JsonApiError> {
    let req = TotalCostRequest {
        user_id: parse_user_id(q.user_id.as_deref())?,
        service_name: q.service_name.filter(|s| !s.is_empty()),
        start_period: q.start_period,
        end_period: q.end_period,
    };
    let res = state.subscriptions.calculate_total_cost(&state.request_context(), req).await?;
    Ok(Json(res))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_blank_is_no_filter() {
        assert_eq!(parse_user_id(None).unwrap(), None);
        assert_eq!(parse_user_id(Some("  ")).unwrap(), None);
        let id = Uuid::new_v4();
        assert_eq!(parse_user_id(Some(&id.to_string())).unwrap(), Some(id));
        let err = parse_user_id(Some("nope")).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn paging_values_are_lenient() {
        assert_eq!(lenient_int(Some("3")), 3);
        assert_eq!(lenient_int(Some("abc")), 0);
        assert_eq!(lenient_int(None), 0);
        assert_eq!(lenient_int(Some("-2")), -2);
    }

    #[test]
    fn bad_path_id_is_bad_request() {
        let err = parse_subscription_id("123").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "Invalid subscription ID");
    }
}
