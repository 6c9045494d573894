use capdiff_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using CapdiffError
pub type Result<T> = std::result::Result<T, CapdiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// The comparison walk itself is total over well-formed JSON, so every kind
/// here belongs to a boundary: decoding input, loading configuration, or
/// guarding report determinism. Each kind maps to a stable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Document bytes are not valid UTF-8 JSON
    InvalidDocument,
    /// Capture envelope does not have the expected shape
    InvalidCapture,
    /// Configuration failed to parse or validate
    InvalidConfig,
    /// A report failed its serialize/re-parse round trip
    DeterminismViolation,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::InvalidCapture => "ERR_INVALID_CAPTURE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::DeterminismViolation => "ERR_DETERMINISM_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the location
/// (operation, document path, endpoint) the failure was detected at.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    endpoint: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            endpoint: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add document or file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add capture endpoint context
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the endpoint context, if any
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the trace ID context, if any
    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(endpoint) = &self.endpoint {
            write!(f, " (endpoint: {})", endpoint)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised at the comparison boundaries
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CapdiffError {
    /// Input bytes were not UTF-8
    #[error("Invalid UTF-8 in {what}: {message}")]
    InvalidUtf8 { what: String, message: String },

    /// Input text was not JSON
    #[error("Invalid JSON in {what}: {message}")]
    InvalidJson { what: String, message: String },

    /// Capture envelope is structurally wrong
    #[error("Invalid capture: {reason}")]
    InvalidCapture { reason: String },

    /// Configuration file or value is unusable
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Filesystem read failed
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<CapdiffError> for ExError {
    fn from(err: CapdiffError) -> Self {
        match err {
            CapdiffError::InvalidUtf8 { what, message } => {
                ExError::new(ExErrorKind::InvalidDocument)
                    .with_message(format!("{} is not valid UTF-8: {}", what, message))
            }
            CapdiffError::InvalidJson { what, message } => {
                ExError::new(ExErrorKind::InvalidDocument)
                    .with_message(format!("{} is not valid JSON: {}", what, message))
            }
            CapdiffError::InvalidCapture { reason } => {
                ExError::new(ExErrorKind::InvalidCapture).with_message(reason)
            }
            CapdiffError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }
            CapdiffError::Io { path, message } => ExError::new(ExErrorKind::Io)
                .with_path(path)
                .with_message(message),
            CapdiffError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}
