//! Error types for BML parsing and struct binding.
//!
//! Parsing is all-or-nothing: the first syntax problem aborts the parse and
//! is returned as the only result, so there is never a partially built tree
//! to inspect.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: [`Error::InvalidIndentation`], [`Error::InvalidNodeName`],
//!   [`Error::UnclosedQuote`] and [`Error::UnexpectedEndOfInput`], each with
//!   the physical line number and the offending line text
//! - **Binding Errors**: a node value that cannot be read as the requested
//!   type, or a Rust type that has no BML shape
//! - **I/O Errors**: reader/writer failures in the `*_reader`/`*_writer` helpers
//!
//! Looking up a missing setting is *not* an error. [`Node::get`] returns
//! `None` and the typed accessors fall back to a caller supplied default.
//!
//! ## Examples
//!
//! ```rust
//! use serde_bml::{parse, Error};
//!
//! let err = parse("Driver=\"Metal").unwrap_err();
//! assert!(matches!(err, Error::UnclosedQuote { line: 1, .. }));
//! assert!(err.to_string().contains("Unclosed quote"));
//! ```
//!
//! [`Node::get`]: crate::Node::get

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced while parsing or binding BML.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The parser was asked for a node after the last line.
    #[error("Unexpected end of input after line {line}")]
    UnexpectedEndOfInput { line: usize },

    /// A child line is not indented deeper than its parent.
    #[error("Invalid indentation at line {line}: expected more than {parent} leading whitespace characters, found {found}\n{context}")]
    InvalidIndentation {
        line: usize,
        parent: usize,
        found: usize,
        context: String,
    },

    /// No valid name characters where a node name was required.
    #[error("Invalid node name at line {line}, column {col}:\n{context}\nHelp: names use only A-Z, a-z, 0-9, '-' and '.'")]
    InvalidNodeName {
        line: usize,
        col: usize,
        context: String,
    },

    /// A `="...` value runs to the end of the line without a closing quote.
    #[error("Unclosed quote at line {line}, column {col}:\n{context}")]
    UnclosedQuote {
        line: usize,
        col: usize,
        context: String,
    },

    /// A node value could not be read as the requested Rust type.
    #[error("Type mismatch at node `{node}`: expected {expected}, found {found:?}")]
    TypeMismatch {
        node: String,
        expected: String,
        found: String,
    },

    /// The Rust type has no BML representation.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// A field or map key is not a usable node name.
    #[error("Invalid key {0:?}: node names use only A-Z, a-z, 0-9, '-' and '.'")]
    InvalidKey(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    pub fn unexpected_end_of_input(line: usize) -> Self {
        Error::UnexpectedEndOfInput { line }
    }

    /// Creates an indentation error for a line at `found` depth under a
    /// parent at `parent` depth.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bml::Error;
    ///
    /// let err = Error::invalid_indentation(3, 2, 2, "  Driver: Metal");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn invalid_indentation(line: usize, parent: usize, found: usize, context: &str) -> Self {
        Error::InvalidIndentation {
            line,
            parent,
            found,
            context: context.to_string(),
        }
    }

    pub fn invalid_node_name(line: usize, col: usize, context: &str) -> Self {
        Error::InvalidNodeName {
            line,
            col,
            context: context.to_string(),
        }
    }

    pub fn unclosed_quote(line: usize, col: usize, context: &str) -> Self {
        Error::UnclosedQuote {
            line,
            col,
            context: context.to_string(),
        }
    }

    /// Creates a binding error for a node whose value has the wrong shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bml::Error;
    ///
    /// let err = Error::type_mismatch("Multiplier", "integer", "two");
    /// assert!(err.to_string().contains("expected integer"));
    /// ```
    pub fn type_mismatch(node: &str, expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            node: node.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    pub fn invalid_key(key: &str) -> Self {
        Error::InvalidKey(key.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for errors raised while reading BML text.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Error::UnexpectedEndOfInput { .. }
                | Error::InvalidIndentation { .. }
                | Error::InvalidNodeName { .. }
                | Error::UnclosedQuote { .. }
        )
    }

    /// Physical line number of a syntax error, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::UnexpectedEndOfInput { line }
            | Error::InvalidIndentation { line, .. }
            | Error::InvalidNodeName { line, .. }
            | Error::UnclosedQuote { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_errors_report_line() {
        let err = Error::invalid_node_name(4, 3, "  : value");
        assert!(err.is_syntax());
        assert_eq!(err.line(), Some(4));
        assert!(err.to_string().contains("  : value"));
    }

    #[test]
    fn test_binding_errors_are_not_syntax() {
        let err = Error::type_mismatch("Video/Multiplier", "integer", "x2");
        assert!(!err.is_syntax());
        assert_eq!(err.line(), None);
        assert!(err.to_string().contains("Video/Multiplier"));
    }

    #[test]
    fn test_serde_custom() {
        let err = <Error as serde::de::Error>::custom("missing field `Driver`");
        assert_eq!(err, Error::Custom("missing field `Driver`".to_string()));
    }
}
