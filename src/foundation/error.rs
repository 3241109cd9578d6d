/// Convenience result type used across svgif.
pub type SvgifResult<T> = Result<T, SvgifError>;

/// Top-level error taxonomy reported by the export pipeline.
///
/// Callers only ever observe these variants: lower-level failures from dependencies are wrapped in
/// [`SvgifError::Unknown`].
#[derive(thiserror::Error, Debug)]
pub enum SvgifError {
    /// Input is not recognizable SVG markup, or export options are invalid.
    #[error("validation error: {0}")]
    Validation(String),

    /// The rasterization surface is unavailable or a frame failed to rasterize.
    #[error("render error: {0}")]
    Render(String),

    /// Palette quantization or GIF container writing failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A cooperative cancellation request was observed.
    #[error("export cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error("unknown error: {0:#}")]
    Unknown(#[from] anyhow::Error),
}

/// Stable, serializable tag for each [`SvgifError`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`SvgifError::Validation`].
    Validation,
    /// See [`SvgifError::Render`].
    Render,
    /// See [`SvgifError::Encoding`].
    Encoding,
    /// See [`SvgifError::Cancelled`].
    Cancelled,
    /// See [`SvgifError::Unknown`].
    Unknown,
}

impl SvgifError {
    /// Build a [`SvgifError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SvgifError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SvgifError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Return the variant tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Render(_) => ErrorKind::Render,
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
