//! Token kinds and tokens
//!
//! [`TokenKind`] is the closed catalog of lexical categories. Each kind
//! carries its recognition pattern and, for everything but the leaves, the
//! priority the tree builder uses to group operators.

use lazy_regex::regex;
use regex::Regex;
use std::fmt;

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Variable name: a letter followed by letters or digits
    Variable,
    /// Base-10 literal with an optional fractional part
    Number,
    OperatorPlus,
    OperatorMinus,
    OperatorDivide,
    OperatorMultiply,
    OpenParen,
    CloseParen,
    /// Only produced by reclassifying an [`TokenKind::OperatorMinus`]
    UnaryMinus,
}

impl TokenKind {
    /// Kinds in the order the tokenizer scans them.
    ///
    /// Variables go first so that digits inside a name (`x2`) are consumed
    /// before the number pattern runs.
    pub const SCAN_ORDER: [TokenKind; 8] = [
        TokenKind::Variable,
        TokenKind::Number,
        TokenKind::OperatorPlus,
        TokenKind::OperatorMinus,
        TokenKind::OperatorDivide,
        TokenKind::OperatorMultiply,
        TokenKind::OpenParen,
        TokenKind::CloseParen,
    ];

    /// Recognition pattern, `None` for [`TokenKind::UnaryMinus`]
    pub fn pattern(self) -> Option<&'static Regex> {
        let re: &'static Regex = match self {
            TokenKind::Variable => regex!(r"[a-zA-Z][a-zA-Z0-9]*"),
            TokenKind::Number => regex!(r"[0-9]+(\.[0-9]*)?"),
            TokenKind::OperatorPlus => regex!(r"\+"),
            TokenKind::OperatorMinus => regex!(r"-"),
            TokenKind::OperatorDivide => regex!(r"/"),
            TokenKind::OperatorMultiply => regex!(r"\*"),
            TokenKind::OpenParen => regex!(r"\("),
            TokenKind::CloseParen => regex!(r"\)"),
            TokenKind::UnaryMinus => return None,
        };
        Some(re)
    }

    /// Grouping priority; higher binds tighter. `None` for leaves.
    pub fn priority(self) -> Option<u8> {
        match self {
            TokenKind::Variable | TokenKind::Number => None,
            TokenKind::OpenParen | TokenKind::CloseParen => Some(1),
            TokenKind::OperatorPlus | TokenKind::OperatorMinus => Some(2),
            TokenKind::OperatorMultiply | TokenKind::OperatorDivide => Some(3),
            TokenKind::UnaryMinus => Some(5),
        }
    }

    pub fn is_binary_operator(self) -> bool {
        matches!(
            self,
            TokenKind::OperatorPlus
                | TokenKind::OperatorMinus
                | TokenKind::OperatorMultiply
                | TokenKind::OperatorDivide
        )
    }

    pub fn is_unary_operator(self) -> bool {
        matches!(self, TokenKind::UnaryMinus)
    }

    /// Number or variable
    pub fn is_operand(self) -> bool {
        matches!(self, TokenKind::Variable | TokenKind::Number)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Variable => "variable",
            TokenKind::Number => "number",
            TokenKind::OperatorPlus => "'+'",
            TokenKind::OperatorMinus => "'-'",
            TokenKind::OperatorDivide => "'/'",
            TokenKind::OperatorMultiply => "'*'",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::UnaryMinus => "unary '-'",
        };
        f.write_str(name)
    }
}

/// A classified slice of the formula text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Literal text as it appeared in the formula
    pub text: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}` at {}..{}", self.kind, self.text, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_priorities() {
        assert_eq!(TokenKind::OpenParen.priority(), Some(1));
        assert_eq!(TokenKind::CloseParen.priority(), Some(1));
        assert_eq!(TokenKind::OperatorPlus.priority(), Some(2));
        assert_eq!(TokenKind::OperatorMinus.priority(), Some(2));
        assert_eq!(TokenKind::OperatorMultiply.priority(), Some(3));
        assert_eq!(TokenKind::OperatorDivide.priority(), Some(3));
        assert_eq!(TokenKind::UnaryMinus.priority(), Some(5));
        assert_eq!(TokenKind::Number.priority(), None);
        assert_eq!(TokenKind::Variable.priority(), None);
    }

    #[test]
    fn test_classification() {
        for kind in TokenKind::SCAN_ORDER {
            assert!(!(kind.is_binary_operator() && kind.is_unary_operator()));
        }
        assert!(TokenKind::OperatorDivide.is_binary_operator());
        assert!(!TokenKind::UnaryMinus.is_binary_operator());
        assert!(TokenKind::UnaryMinus.is_unary_operator());
        assert!(!TokenKind::OperatorMinus.is_unary_operator());
        assert!(TokenKind::Variable.is_operand());
        assert!(!TokenKind::OpenParen.is_operand());
    }

    #[test]
    fn test_patterns() {
        let number = TokenKind::Number.pattern().unwrap();
        assert_eq!(number.find("4.").unwrap().as_str(), "4.");
        assert_eq!(number.find("12.50").unwrap().as_str(), "12.50");

        let variable = TokenKind::Variable.pattern().unwrap();
        assert_eq!(variable.find("2x1").unwrap().as_str(), "x1");

        assert!(TokenKind::UnaryMinus.pattern().is_none());
        assert!(TokenKind::SCAN_ORDER
            .iter()
            .all(|kind| kind.pattern().is_some()));
    }
}
