//! Error types for manifest inspection.
//!
//! Every fallible operation in this crate returns [`ToolError`]. The variants
//! follow the pipeline: transport and registry failures first, then the
//! content-level failures raised while resolving and decoding manifests.

use thiserror::Error;


/// Main error type for manifest-tool operations
#[derive(Error, Debug)]
pub enum ToolError {
    /// Network-related errors (connection, timeout, DNS)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication errors (401, 403, token issues)
    #[error("Authentication error (status: {status_code:?}): {message}")]
    Authentication {
        message: String,
        status_code: Option<u16>,
    },

    /// Resource not found errors (404, content store misses)
    #[error("{resource_type} not found: {name}")]
    NotFound { resource_type: String, name: String },

    /// Rate limiting errors (429)
    #[error("Rate limit: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// Server errors (500, 503)
    #[error("Server error (status: {status_code}): {message}")]
    Server { message: String, status_code: u16 },

    /// Validation errors (missing tag, illegal flag combination, digest mismatch)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid config file, unreadable credential file)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed structured content for an index, manifest or image config
    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// A descriptor whose media type is neither index-like nor manifest-like
    #[error("Unknown descriptor type: {media_type}")]
    UnknownMediaType { media_type: String },

    /// Failure to serialize a raw JSON document
    #[error("Failed to encode {what}: {source}")]
    Encode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failure writing rendered output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for manifest-tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

impl ToolError {
    /// Creates a new network error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifest::error::ToolError;
    ///
    /// let err = ToolError::network("connection refused");
    /// assert!(matches!(err, ToolError::Network { .. }));
    /// ```
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new network error with a source error.
    pub fn network_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new authentication error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifest::error::ToolError;
    ///
    /// let err = ToolError::authentication("invalid credentials", Some(401));
    /// assert!(matches!(err, ToolError::Authentication { .. }));
    /// ```
    pub fn authentication<S: Into<String>>(message: S, status_code: Option<u16>) -> Self {
        Self::Authentication {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new not found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifest::error::ToolError;
    ///
    /// let err = ToolError::not_found("content", "sha256:abc");
    /// assert!(matches!(err, ToolError::NotFound { .. }));
    /// ```
    pub fn not_found<S: Into<String>>(resource_type: S, name: S) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    /// Creates a new rate limit error.
    pub fn rate_limit<S: Into<String>>(message: S, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Creates a new server error.
    pub fn server<S: Into<String>>(message: S, status_code: u16) -> Self {
        Self::Server {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifest::error::ToolError;
    ///
    /// let err = ToolError::validation("the --expand-config flag is only valid when used with --raw");
    /// assert!(matches!(err, ToolError::Validation { .. }));
    /// ```
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new validation error with a source error.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new decode error for the named kind of content.
    ///
    /// # Examples
    ///
    /// ```
    /// use libmanifest::error::ToolError;
    ///
    /// let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    /// let err = ToolError::decode("image index", source);
    /// assert!(err.to_string().contains("image index"));
    /// ```
    pub fn decode<S: Into<String>>(what: S, source: serde_json::Error) -> Self {
        Self::Decode {
            what: what.into(),
            source,
        }
    }

    /// Creates a new encode error for the named document.
    pub fn encode<S: Into<String>>(what: S, source: serde_json::Error) -> Self {
        Self::Encode {
            what: what.into(),
            source,
        }
    }

    /// Creates a new unknown media type error.
    pub fn unknown_media_type<S: Into<String>>(media_type: S) -> Self {
        Self::UnknownMediaType {
            media_type: media_type.into(),
        }
    }
}
