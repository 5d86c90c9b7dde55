//! Error types for recall operations.
//!
//! Validation and illegal-operation errors are raised at the point of misuse
//! and carry a structured [`ErrorCode`] for programmatic handling.

use thiserror::Error;

/// Result type alias for recall operations.
pub type RecallResult<T> = Result<T, RecallError>;

/// Main error type for all recall operations.
#[derive(Error, Debug)]
pub enum RecallError {
    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// A grade outside Again..Easy was given to the forward scheduler.
    #[error("Invalid grade \"{value}\"")]
    InvalidGrade { value: String },

    /// A token, timestamp, or enum name could not be parsed.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// The operation is not allowed for the given card or log.
    #[error("Illegal operation: {message}")]
    IllegalOperation { message: String, code: ErrorCode },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValInvalidGrade,
    ValInvalidFormat,
    ValInvalidRetention,
    ValInvalidParameters,

    // Parse (PARSE_xxx)
    ParseStepToken,
    ParseTimestamp,
    ParseEnumName,

    // Operations (OP_xxx)
    OpManualRollback,
    OpMissingState,
    OpMissingDue,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValInvalidGrade => "VAL_002",
            ErrorCode::ValInvalidFormat => "VAL_003",
            ErrorCode::ValInvalidRetention => "VAL_004",
            ErrorCode::ValInvalidParameters => "VAL_005",
            ErrorCode::ParseStepToken => "PARSE_001",
            ErrorCode::ParseTimestamp => "PARSE_002",
            ErrorCode::ParseEnumName => "PARSE_003",
            ErrorCode::OpManualRollback => "OP_001",
            ErrorCode::OpMissingState => "OP_002",
            ErrorCode::OpMissingDue => "OP_003",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl RecallError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: None,
        }
    }

    /// Create a validation error with a specific code and suggestion.
    pub fn validation_with_suggestion(
        code: ErrorCode,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code,
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create an invalid grade error.
    pub fn invalid_grade(value: impl ToString) -> Self {
        Self::InvalidGrade {
            value: value.to_string(),
        }
    }

    /// Create a parse error.
    pub fn parse(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code,
        }
    }

    /// Create an illegal operation error.
    pub fn illegal_operation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::IllegalOperation {
            message: message.into(),
            code,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::InvalidGrade { .. } => ErrorCode::ValInvalidGrade,
            Self::Parse { code, .. } => *code,
            Self::IllegalOperation { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::InvalidGrade { .. } => Some("Use one of Again, Hard, Good, Easy (1-4)"),
            Self::Parse {
                code: ErrorCode::ParseStepToken,
                ..
            } => Some("Write steps as an integer followed by m, h or d, e.g. \"10m\""),
            Self::IllegalOperation {
                code: ErrorCode::OpManualRollback,
                ..
            } => Some("Manual edits cannot be rolled back; replay the history instead"),
            _ => None,
        }
    }
}
