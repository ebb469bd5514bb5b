use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("database error: {0}")]
    Db(String),
}
