use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("select a Notion data source before saving")]
    NoDataSource,
    #[error("the selected data source has no usable date property")]
    NoDateProperty,
    #[error("OpenAI parsing is enabled but no API key was provided")]
    MissingKey,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to store secret: {0}")]
    SecretStore(String),
    #[error("failed to persist settings: {0}")]
    Persist(String),
    #[error("a save is already in progress")]
    InProgress,
}

#[derive(Debug, Error)]
pub enum NotionError {
    // A missing, expired, or revoked token reads as "not yet connected".
    #[error("notion access token unavailable or rejected")]
    Unauthorized,
    #[error("network error: {0}")]
    Network(String),
    #[error("notion api returned status {status}: {body}")]
    Api { status: u16, body: String },
}

impl NotionError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, NotionError::Unauthorized)
    }
}
