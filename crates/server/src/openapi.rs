use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Dates are month periods in `MM-YYYY` form.
#[derive(ToSchema)]
pub struct CreateSubscriptionDoc {
    #[schema(example = "Yandex Plus")]
    pub service_name: String,
    #[schema(example = 400)]
    pub price: i32,
    pub user_id: Uuid,
    #[schema(example = "07-2025")]
    pub start_date: String,
}

#[derive(ToSchema)]
pub struct UpdateSubscriptionDoc {
    pub service_name: String,
    pub price: i32,
    #[schema(example = "07-2025")]
    pub start_date: String,
    #[schema(example = "12-2025")]
    pub end_date: Option<String>,
}

#[derive(ToSchema)]
pub struct SubscriptionDoc {
    pub id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: String,
    pub end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct ListDoc {
    pub total: u64,
    pub data: Vec<SubscriptionDoc>,
}

#[derive(ToSchema)]
pub struct TotalCostDoc {
    pub total_cost: i64,
    #[schema(example = "RUB")]
    pub currency: String,
    #[schema(example = "01-2025 - 12-2025")]
    pub period: String,
}

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub message: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Subscription Aggregator API", description = "Online subscription records and cost aggregation"),
    paths(
        crate::routes::health,
        crate::routes::subscriptions::create,
        crate::routes::subscriptions::get,
        crate::routes::subscriptions::update,
        crate::routes::subscriptions::delete,
        crate::routes::subscriptions::list,
        crate::routes::subscriptions::total_cost,
    ),
    components(
        schemas(
            HealthResponse,
            CreateSubscriptionDoc,
            UpdateSubscriptionDoc,
            SubscriptionDoc,
            ListDoc,
            TotalCostDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "subscriptions")
    )
)]
pub struct ApiDoc;
