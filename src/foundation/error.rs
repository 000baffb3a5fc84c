/// Convenience result type used across catmeme.
pub type MemeResult<T> = Result<T, MemeError>;

/// Top-level error taxonomy.
///
/// Every variant is recoverable: the presentation boundary turns it into a transient
/// [`Notice`](crate::Notice) and keeps the previous session state.
#[derive(thiserror::Error, Debug)]
pub enum MemeError {
    /// The remote image source was unreachable or returned no usable result.
    #[error("image fetch error: {0}")]
    ImageFetch(String),

    /// Image bytes could not be downloaded or decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// The caption generator answered with text that is not a `{top, bottom}` object.
    #[error("caption format error: {0}")]
    CaptionFormat(String),

    /// The caption generator could not be reached or rejected the request.
    #[error("caption request error: {0}")]
    CaptionRequest(String),

    /// Raster encoding or writing the exported file failed.
    #[error("export error: {0}")]
    Export(String),

    /// No usable font could be resolved or loaded.
    #[error("font error: {0}")]
    Font(String),

    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Invalid user input or operation preconditions.
    #[error("validation error: {0}")]
    Validation(String),

    /// Reading or writing persistent storage failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemeError {
    /// Build a [`MemeError::ImageFetch`] value.
    pub fn image_fetch(msg: impl Into<String>) -> Self {
        Self::ImageFetch(msg.into())
    }

    /// Build a [`MemeError::ImageLoad`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`MemeError::CaptionFormat`] value.
    pub fn caption_format(msg: impl Into<String>) -> Self {
        Self::CaptionFormat(msg.into())
    }

    /// Build a [`MemeError::CaptionRequest`] value.
    pub fn caption_request(msg: impl Into<String>) -> Self {
        Self::CaptionRequest(msg.into())
    }

    /// Build a [`MemeError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`MemeError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`MemeError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`MemeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MemeError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
