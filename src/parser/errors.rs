use thiserror::Error;

pub type Result<T> = std::result::Result<T, ElementError>;

/// Errors raised while building or mutating an element tree.
///
/// Every text-side variant carries the span it was raised for so callers
/// can point authors at the offending fragment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    #[error("Unrecognized construct: {construct}")]
    UnrecognizedVariant { construct: String },

    #[error("Unbalanced syntax: {span}")]
    UnbalancedSyntax { span: String },

    #[error("Malformed assignment: {span}")]
    MalformedAssignment { span: String },

    #[error("\"else\" must directly follow an \"if\" block: {span}")]
    MisplacedElse { span: String },

    #[error("Invalid <{tag}> element: {message}")]
    InvalidStructure { tag: String, message: String },

    #[error("Invalid child: {0}")]
    InvalidChild(String),

    #[error("Expected a single root element, found {count}")]
    ExpectedSingleRoot { count: usize },
}

impl ElementError {
    pub fn unrecognized(construct: impl Into<String>) -> Self {
        ElementError::UnrecognizedVariant {
            construct: construct.into(),
        }
    }

    pub fn malformed(span: impl Into<String>) -> Self {
        ElementError::MalformedAssignment { span: span.into() }
    }

    pub fn structure(tag: impl Into<String>, message: impl Into<String>) -> Self {
        ElementError::InvalidStructure {
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// The source span this error was raised for, if it carries one.
    pub fn span(&self) -> Option<&str> {
        match self {
            ElementError::UnrecognizedVariant { construct } => Some(construct),
            ElementError::UnbalancedSyntax { span }
            | ElementError::MalformedAssignment { span }
            | ElementError::MisplacedElse { span } => Some(span),
            _ => None,
        }
    }
}
