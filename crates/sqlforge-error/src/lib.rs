//! Error types for the sqlforge parse/format pipeline.
//!
//! Every fallible operation in the workspace returns [`ForgeError`]. The
//! taxonomy is small and deliberate: either the input text is not lexable,
//! not parseable, uses a construct the engine does not support, or a node
//! was handed an argument shape it cannot accept. There is no partial-tree
//! recovery; the first error aborts the whole parse.

use thiserror::Error;

/// Primary error type for sqlforge operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForgeError {
    /// The lexer hit an unterminated quoted span or comment.
    #[error("lexical error at byte {offset}: {detail}")]
    Lexical { offset: usize, detail: String },

    /// The parser could not make sense of the token stream.
    #[error("syntax error at byte {offset}: {detail}")]
    Syntax { offset: usize, detail: String },

    /// A recognizable but unimplemented construct.
    #[error("not supported: {construct}")]
    Unsupported { construct: String },

    /// A required sub-clause is missing where the grammar mandates one.
    #[error("{construct} is missing its {clause}")]
    MissingClause {
        construct: &'static str,
        clause: &'static str,
    },

    /// A node was handed a value shape it cannot accept (e.g. a MERGE
    /// action referencing something other than an update/insert body).
    #[error("invalid argument for {construct}: {detail}")]
    InvalidArgument {
        construct: &'static str,
        detail: String,
    },
}

impl ForgeError {
    /// Shorthand for a syntax error at a byte offset.
    #[must_use]
    pub fn syntax(offset: usize, detail: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            detail: detail.into(),
        }
    }

    /// Shorthand for a lexical error at a byte offset.
    #[must_use]
    pub fn lexical(offset: usize, detail: impl Into<String>) -> Self {
        Self::Lexical {
            offset,
            detail: detail.into(),
        }
    }

    /// Shorthand for an unsupported-construct error.
    #[must_use]
    pub fn unsupported(construct: impl Into<String>) -> Self {
        Self::Unsupported {
            construct: construct.into(),
        }
    }
}

/// Result alias used across the workspace.
pub type ForgeResult<T> = Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_offsets() {
        let err = ForgeError::lexical(17, "unterminated string literal");
        assert_eq!(
            err.to_string(),
            "lexical error at byte 17: unterminated string literal"
        );
        let err = ForgeError::syntax(3, "expected FROM");
        assert_eq!(err.to_string(), "syntax error at byte 3: expected FROM");
    }

    #[test]
    fn missing_clause_message_names_both_sides() {
        let err = ForgeError::MissingClause {
            construct: "between predicate",
            clause: "upper bound",
        };
        assert_eq!(err.to_string(), "between predicate is missing its upper bound");
    }
}
