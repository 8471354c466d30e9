//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while tokenizing, building or evaluating a formula
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Characters outside the permitted alphabet
    #[error("Characters {characters:?} are not allowed in a formula")]
    Alphabet { characters: String },

    /// Structurally invalid token sequence
    #[error("Lexical error: {0}")]
    Lexical(String),

    /// Semantic failure: bad equation shape or unbound variable
    #[error("Incorrect formula: {0}")]
    IncorrectFormula(String),

    /// Division by zero or a non-finite result
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// A token sequence that passed validation but could not be built.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Category of a [`FormulaError`], without its message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaErrorKind {
    Alphabet,
    Lexical,
    IncorrectFormula,
    Arithmetic,
    Internal,
}

impl FormulaError {
    /// Get the category of this error
    pub fn kind(&self) -> FormulaErrorKind {
        match self {
            FormulaError::Alphabet { .. } => FormulaErrorKind::Alphabet,
            FormulaError::Lexical(_) => FormulaErrorKind::Lexical,
            FormulaError::IncorrectFormula(_) => FormulaErrorKind::IncorrectFormula,
            FormulaError::Arithmetic(_) => FormulaErrorKind::Arithmetic,
            FormulaError::Internal(_) => FormulaErrorKind::Internal,
        }
    }

    /// Whether the user can fix this error by editing the formula text
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FormulaError::Internal(_))
    }
}
