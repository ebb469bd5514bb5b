//! Subscription module: three-layer architecture (domain, repository, service).
//!
//! Holds the subscription lifecycle (create/get/update/delete/list) and the
//! cost aggregation over a month window.

pub mod context;
pub mod domain;
pub mod errors;
pub mod filter;
pub mod repo;
pub mod repository;
pub mod service;
pub mod validation;

pub use context::RequestContext;
pub use domain::{
    CreateSubscriptionRequest, ListResponse, ListSubscriptionsQuery, SubscriptionResponse, TotalCostRequest,
    TotalCostResponse, UpdateSubscriptionRequest,
};
pub use errors::SubscriptionError;
pub use repository::SubscriptionRepository;
pub use service::SubscriptionService;
