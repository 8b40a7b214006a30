use std::path::Path;

use thiserror::Error;

/// Spreadsheet import/export failure.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The workbook opened fine but its contents are not usable product data
    /// (no rows, a bad number, a row failing validation).
    #[error("kind=format: {message}")]
    Format { message: String },

    /// The bytes are not a readable zip container.
    #[error("kind=archive: {message}")]
    Archive { message: String },

    /// A workbook part is not well-formed XML.
    #[error("kind=xml: {message}")]
    Xml { message: String },

    #[error("kind=io: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl SheetError {
    pub fn kind(&self) -> &'static str {
        match self {
            SheetError::Format { .. } => "format",
            SheetError::Archive { .. } => "archive",
            SheetError::Xml { .. } => "xml",
            SheetError::Io { .. } => "io",
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, SheetError::Format { .. })
    }

    /// Human-readable message without the `kind=` prefix.
    pub fn message(&self) -> &str {
        match self {
            SheetError::Format { message }
            | SheetError::Archive { message }
            | SheetError::Xml { message }
            | SheetError::Io { message, .. } => message,
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        SheetError::Format {
            message: message.into(),
        }
    }

    pub fn archive(err: impl std::fmt::Display) -> Self {
        SheetError::Archive {
            message: err.to_string(),
        }
    }

    pub fn xml(err: impl std::fmt::Display) -> Self {
        SheetError::Xml {
            message: err.to_string(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        SheetError::Io {
            message: format!("{}: {}", path.display(), source),
            source,
        }
    }
}
