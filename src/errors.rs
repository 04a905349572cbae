use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum LodgeError {
    #[error("I/O error: {0}")]
    #[diagnostic(code(lodgebook::io))]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    #[diagnostic(code(lodgebook::config))]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(lodgebook::serde))]
    Serde(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    #[diagnostic(code(lodgebook::db))]
    Db(#[from] sea_orm::DbErr),

    #[error("Email delivery error: {0}")]
    #[diagnostic(code(lodgebook::email))]
    Http(#[from] reqwest::Error),

    #[error("Validation failed: {0}")]
    #[diagnostic(code(lodgebook::validation))]
    Validation(String),

    #[error("Rate limit exceeded for {0}")]
    #[diagnostic(code(lodgebook::rate_limit))]
    RateLimited(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(lodgebook::not_found))]
    NotFound(String),

    #[error("{0}")]
    #[diagnostic(code(lodgebook::other))]
    Other(String),
}
