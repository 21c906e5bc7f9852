use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Upstream {service} returned {status}")]
    Upstream { service: &'static str, status: u16 },

    #[error("Missing configuration: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Conversation error: {0}")]
    Conversation(String),

    #[error("Unexpected error: {0}")]
    Other(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
