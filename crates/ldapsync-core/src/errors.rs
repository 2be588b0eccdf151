use thiserror::Error;

/// Result type alias using LdapSyncError
pub type Result<T> = std::result::Result<T, LdapSyncError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on without
/// parsing messages. Collaborator-level kinds (`NotFound`, `AmbiguousResult`,
/// `Directory`) are passed through the reconciliation pipeline unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    /// An ignore/encode pattern failed to compile
    Configuration,
    /// Provider or policy settings are missing or malformed
    InvalidConfig,

    // Data
    /// A value targeted for base64 decoding is not valid base64 (or not UTF-8 once decoded)
    MalformedEncoding,
    /// A desired-state document is not a map of attribute names to string lists
    InvalidDocument,

    // Directory collaborator
    NotFound,
    AmbiguousResult,
    AlreadyExists,
    Directory,

    // Generic
    Serialization,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::MalformedEncoding => "ERR_MALFORMED_ENCODING",
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AmbiguousResult => "ERR_AMBIGUOUS_RESULT",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Directory => "ERR_DIRECTORY",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the context
/// (entry name, attribute, offending value) needed to render an actionable
/// message.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entry_name: Option<String>,
    attribute: Option<String>,
    value: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entry_name: None,
            attribute: None,
            value: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the distinguished name of the entry involved
    pub fn with_entry_name(mut self, name: impl Into<String>) -> Self {
        self.entry_name = Some(name.into());
        self
    }

    /// Add attribute name context
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Add the offending value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
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

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entry_name(&self) -> Option<&str> {
        self.entry_name.as_deref()
    }

    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

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
        if let Some(entry_name) = &self.entry_name {
            write!(f, " (dn: {})", entry_name)?;
        }
        if let Some(attribute) = &self.attribute {
            write!(f, " (attribute: {})", attribute)?;
        }
        if let Some(value) = &self.value {
            write!(f, " (value: {:?})", value)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for reconciliation and directory operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LdapSyncError {
    // ===== Configuration =====
    /// A regular expression in an ignore/encode pattern list does not compile
    #[error("Invalid attribute pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Provider or policy configuration is incomplete or malformed
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Data =====
    /// A value that should be base64 could not be decoded
    #[error("Malformed base64 value {value:?} in attribute {attribute}: {reason}")]
    MalformedEncoding {
        attribute: String,
        value: String,
        reason: String,
    },

    /// The desired-state document does not have the expected shape
    #[error("Invalid desired-state document: {reason}")]
    InvalidDocument { reason: String },

    // ===== Directory =====
    /// No entry matched a filter that was expected to be unique
    #[error("No entry matches filter '{filter}' under {base}")]
    EntryNotFound { base: String, filter: String },

    /// More than one entry matched a filter that was expected to be unique
    #[error("Filter '{filter}' matches {count} entries under {base}")]
    AmbiguousResult {
        base: String,
        filter: String,
        count: usize,
    },

    /// An entry with this name already exists
    #[error("Entry already exists: {entry_name}")]
    EntryAlreadyExists { entry_name: String },

    /// The directory rejected an add/modify/delete
    #[error("Directory operation on {entry_name} failed: {reason}")]
    Directory { entry_name: String, reason: String },

    // ===== Generic =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from LdapSyncError to ExError
impl From<LdapSyncError> for ExError {
    fn from(err: LdapSyncError) -> Self {
        match err {
            LdapSyncError::InvalidPattern { pattern, reason } => {
                ExError::new(ExErrorKind::Configuration)
                    .with_value(pattern)
                    .with_message(format!("Invalid attribute pattern: {}", reason))
            }
            LdapSyncError::InvalidConfig { reason } => ExError::new(ExErrorKind::InvalidConfig)
                .with_message(format!("Invalid configuration: {}", reason)),
            LdapSyncError::MalformedEncoding {
                attribute,
                value,
                reason,
            } => ExError::new(ExErrorKind::MalformedEncoding)
                .with_attribute(attribute)
                .with_value(value)
                .with_message(format!("Value is not valid base64: {}", reason)),
            LdapSyncError::InvalidDocument { reason } => {
                ExError::new(ExErrorKind::InvalidDocument).with_message(reason)
            }
            LdapSyncError::EntryNotFound { base, filter } => ExError::new(ExErrorKind::NotFound)
                .with_entry_name(base)
                .with_message(format!("No entry matches filter '{}'", filter)),
            LdapSyncError::AmbiguousResult {
                base,
                filter,
                count,
            } => ExError::new(ExErrorKind::AmbiguousResult)
                .with_entry_name(base)
                .with_message(format!("Filter '{}' matches {} entries", filter, count)),
            LdapSyncError::EntryAlreadyExists { entry_name } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entry_name(entry_name)
                    .with_message("Entry already exists")
            }
            LdapSyncError::Directory { entry_name, reason } => {
                ExError::new(ExErrorKind::Directory)
                    .with_entry_name(entry_name)
                    .with_message(reason)
            }
            LdapSyncError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}
