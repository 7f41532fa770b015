use thiserror::Error;

/// Main error type for the brand-compositor library
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model API error: {0}")]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Image decode/encode errors
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to decode image: {path} - {reason}")]
    DecodeFailed { path: String, reason: String },

    #[error("Failed to encode image: {path} - {reason}")]
    EncodeFailed { path: String, reason: String },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path} - {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Unknown variant: {name}")]
    UnknownVariant { name: String },
}

/// Errors from the image-model HTTP collaborators
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing API credential: environment variable {var} is not set")]
    MissingCredential { var: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response did not contain an image (model {model})")]
    NoImage { model: String },

    #[error("Invalid inline image payload: {reason}")]
    InvalidPayload { reason: String },
}

/// Convenience type alias for Results using CompositorError
pub type Result<T> = std::result::Result<T, CompositorError>;

impl CompositorError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Whether the caller can move on to the next model or item.
    ///
    /// Nothing is ever retried; this only separates per-item failures from
    /// failures that should end the run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Api(ApiError::MissingCredential { .. }) => false,
            Self::Api(_) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Image(ImageError::DecodeFailed { path, .. }) => {
                format!("Could not read image '{}'. Please check the file exists and is a PNG or JPEG.", path)
            }
            Self::Image(ImageError::EncodeFailed { path, .. }) => {
                format!("Could not write '{}'. Please check the directory exists and is writable.", path)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Config(ConfigError::UnknownVariant { name }) => {
                format!("Variant '{}' not found. Run `brand-compositor variants` to list them.", name)
            }
            Self::Api(ApiError::MissingCredential { var }) => {
                format!("Set {} in your environment to use the model API.", var)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: CompositorError = ImageError::DecodeFailed {
            path: "in.png".to_string(),
            reason: "bad header".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Image processing error: Failed to decode image: in.png - bad header"
        );

        let err: CompositorError = ApiError::Status {
            status: 402,
            body: "insufficient credits".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Model API error: Unexpected status 402: insufficient credits"
        );
    }

    #[test]
    fn test_recoverable_errors() {
        let api: CompositorError = ApiError::NoImage { model: "m".to_string() }.into();
        assert!(api.is_recoverable());

        let missing: CompositorError = ApiError::MissingCredential { var: "KEY".to_string() }.into();
        assert!(!missing.is_recoverable());

        let decode: CompositorError = ImageError::DecodeFailed {
            path: "x".to_string(),
            reason: "y".to_string(),
        }
        .into();
        assert!(!decode.is_recoverable());
    }

    #[test]
    fn test_user_message() {
        let err: CompositorError = ConfigError::UnknownVariant { name: "party".to_string() }.into();
        assert!(err.user_message().contains("party"));

        let err: CompositorError = ApiError::NoImage { model: "m".to_string() }.into();
        assert_eq!(err.user_message(), err.to_string());
    }

    #[test]
    fn test_generic_error() {
        let err = CompositorError::generic("no models configured");
        assert!(matches!(err, CompositorError::Generic(ref m) if m == "no models configured"));
        assert_eq!(err.to_string(), "Generic error: no models configured");
        assert_eq!(err.user_message(), err.to_string());
        assert!(!err.is_recoverable());
    }
}
