use std::fmt;

use thiserror::Error;

/// Core error types for pkgmirror.
///
/// Every ecosystem crate converts its own error enum into `MirrorError` at the
/// `PackageSource` boundary, so the syncer only has to reason about this one
/// taxonomy. The important distinction is [`MirrorError::NotFound`]: it is the
/// only classification the syncer treats as benign during a download.
///
/// # Examples
///
/// ```
/// use pkgmirror_core::error::{MirrorError, Result};
///
/// fn parse_version(raw: &str) -> Result<()> {
///     if raw.is_empty() {
///         return Err(MirrorError::parse(raw, "empty version"));
///     }
///     Ok(())
/// }
///
/// assert!(parse_version("").is_err());
/// ```
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("failed to parse {input:?}: {message}")]
    Parse { input: String, message: String },

    #[error("{package} not found")]
    NotFound { package: String },

    #[error("command {args:?} failed with output {output}")]
    Command {
        args: Vec<String>,
        output: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("registry request failed for {package}: {source}")]
    Registry {
        package: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to list dependencies from catalog: {0}")]
    Catalog(String),

    #[error("invalid archive for {package}: {message}")]
    Archive { package: String, message: String },

    #[error("unsupported package scheme: {0}")]
    UnsupportedScheme(String),

    #[error("sync cancelled")]
    Cancelled,

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<MirrorError>,
    },

    #[error("{0}")]
    Multiple(MultiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for `Result<T, MirrorError>`.
pub type Result<T> = std::result::Result<T, MirrorError>;

impl MirrorError {
    pub fn parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            message: message.into(),
        }
    }

    pub fn not_found(package: impl Into<String>) -> Self {
        Self::NotFound {
            package: package.into(),
        }
    }

    /// Wraps the error with a short description of what was being attempted.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether the registry reported that the requested artifact does not exist.
    ///
    /// Looks through `Context` wrappers but not through aggregates: an
    /// aggregate is never "just" a missing package.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Context { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::Context { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

/// A collection of independent failures reported together.
///
/// Built up with [`MultiError::push`] while a sync pass keeps going, then
/// turned into a single [`MirrorError`] with [`MultiError::into_result`].
#[derive(Debug, Default)]
pub struct MultiError {
    errors: Vec<MirrorError>,
}

impl MultiError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error, flattening nested aggregates.
    pub fn push(&mut self, error: MirrorError) {
        match error {
            MirrorError::Multiple(inner) => self.errors.extend(inner.errors),
            other => self.errors.push(other),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[MirrorError] {
        &self.errors
    }

    /// `Ok(())` when nothing was collected; a lone error is returned as-is.
    pub fn into_result(mut self) -> Result<()> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(MirrorError::Multiple(self)),
        }
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} errors occurred:", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n\t* {error}")?;
        }
        Ok(())
    }
}

impl From<MultiError> for MirrorError {
    fn from(errors: MultiError) -> Self {
        Self::Multiple(errors)
    }
}
