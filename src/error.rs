use thiserror::Error;

/// Errors surfaced by the library's typed APIs.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("no data to render")]
    EmptyData,

    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("invalid padding {0}, expected one of 0, 8, 16, 24, 32")]
    InvalidPadding(u8),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template limit of {0} reached")]
    TemplateLimit(usize),
}

/// Template persistence failures. Reported through the store's one-shot error slot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read templates: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to save templates: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to serialize templates: {0}")]
    Serialize(#[from] serde_json::Error),
}
