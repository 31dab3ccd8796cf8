use thiserror::Error;

/// Errors originating from the core pipeline (open, decode, configuration).
#[derive(Error, Debug)]
pub enum CoreError {
    /// The video could not be opened (missing file, no video stream, decoder unavailable).
    #[error("Impossible d'ouvrir {path} : {reason}")]
    Open {
        /// Path that was requested.
        path: String,
        /// Human-readable cause.
        reason: String,
    },

    /// The source reported an empty geometry.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Decoding failed in the middle of the stream.
    #[error("Erreur de décodage après {frame} frames : {reason}")]
    Decode {
        /// Number of frames successfully read before the failure.
        frame: u64,
        /// Human-readable cause.
        reason: String,
    },

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),
}

impl CoreError {
    /// `true` for every failure raised while opening a source.
    ///
    /// # Example
    /// ```
    /// use va_core::CoreError;
    /// let err = CoreError::InvalidDimensions { width: 0, height: 480 };
    /// assert!(err.is_open());
    /// ```
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::InvalidDimensions { .. })
    }
}
