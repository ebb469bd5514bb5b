//! Persistence models: SeaORM entities, pool setup and the `MM-YYYY`
//! period format shared by the service and transport layers.

pub mod errors;
pub mod db;
pub mod period;
pub mod subscription;
