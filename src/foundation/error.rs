/// Crate-wide result alias.
pub type RestyleResult<T> = Result<T, RestyleError>;

/// Error type shared by the style engine, the binding layer and the script loader.
#[derive(thiserror::Error, Debug)]
pub enum RestyleError {
    /// Producer output has a shape the updater cannot merge.
    #[error("shape error: {0}")]
    Shape(String),

    /// Invalid configuration or script content.
    #[error("validation error: {0}")]
    Validation(String),

    /// Binding lifecycle misuse (e.g. updating a torn-down binding).
    #[error("binding error: {0}")]
    Binding(String),

    /// Script (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RestyleError {
    /// Build a [`RestyleError::Shape`].
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Build a [`RestyleError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RestyleError::Binding`].
    pub fn binding(msg: impl Into<String>) -> Self {
        Self::Binding(msg.into())
    }

    /// Build a [`RestyleError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for RestyleError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
