//! Core data types shared by the tokenizer adapter and the handlers.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// XML qualified name: local name, optional prefix and optional namespace URI.
///
/// Equality compares all three parts. Ordering compares the local name first,
/// then the prefix, then the namespace URI; an absent part sorts before a
/// present one.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QName {
    local_name: String,
    prefix: Option<String>,
    namespace_uri: Option<String>,
}

impl QName {
    /// Create a name without prefix or namespace.
    #[must_use]
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            prefix: None,
            namespace_uri: None,
        }
    }

    /// Create a fully qualified name.
    #[must_use]
    pub fn with_namespace(
        local_name: impl Into<String>,
        prefix: Option<String>,
        namespace_uri: Option<String>,
    ) -> Self {
        Self {
            local_name: local_name.into(),
            prefix,
            namespace_uri,
        }
    }

    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    #[must_use]
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }
}

impl From<&str> for QName {
    fn from(local_name: &str) -> Self {
        Self::new(local_name)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

/// Attributes of an element keyed by qualified name.
pub type AttributeMap = BTreeMap<QName, String>;

/// Namespace declarations of an element: prefix (`None` for the default
/// namespace) to URI.
pub type NamespaceMap = BTreeMap<Option<String>, String>;

/// Classification of a tokenizer diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Syntax or well-formedness error reported by the tokenizer.
    Syntax,
    /// Undeclared namespace prefix or invalid namespace declaration.
    Namespace,
    /// Input ended while elements were still open.
    UnclosedElement,
    /// Input contained no root element.
    EmptyDocument,
    /// Character data after the root element closed.
    TrailingContent,
    /// Reading from the underlying stream failed.
    Io,
}

/// Structured diagnostic delivered through the error sink.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{filename}:{position}: {message}")]
pub struct XmlError {
    /// What kind of problem was detected.
    pub kind: ErrorKind,
    /// Human readable description.
    pub message: String,
    /// Diagnostic label of the input, usually the file name.
    pub filename: String,
    /// Byte offset in the input where the problem was detected.
    pub position: u64,
}

impl XmlError {
    #[must_use]
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        filename: impl Into<String>,
        position: u64,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            filename: filename.into(),
            position,
        }
    }
}
