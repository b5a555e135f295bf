use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Request to the site failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse HTML: {0}")]
    ParsingError(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Authentication failed. Please check your credentials.")]
    AuthenticationFailed,

    #[error("Could not find the login CSRF token on the page")]
    TokenNotFound,

    #[error("Could not find required element on the page: {0}")]
    ElementNotFound(String),

    #[error("Navigation failed: {0}")]
    NavigationError(String),

    #[error("Persistence failed: {0}")]
    PersistenceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScraperError>;
