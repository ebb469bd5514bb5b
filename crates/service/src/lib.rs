//! Service layer providing the subscription business operations on top of models.
//! - Separates business logic from data access.
//! - Storage is reached only through the `SubscriptionRepository` trait.
//! - Provides clear error types and documented interfaces.

pub mod pagination;
pub mod subscription;
#[cfg(test)]
pub mod test_support;
