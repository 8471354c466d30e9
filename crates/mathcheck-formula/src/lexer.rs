//! Formula tokenizer
//!
//! Tokenizing runs in four passes:
//!
//! 1. the alphabet check rejects characters no formula may contain;
//! 2. every [`TokenKind`] pattern is matched over the text in
//!    [`TokenKind::SCAN_ORDER`], blanking each match so later kinds cannot
//!    re-match it, and the tokens are sorted back into source order;
//! 3. minus signs that cannot be binary are reclassified as unary;
//! 4. the sequence is checked for operand/operator and parenthesis balance.

use crate::error::{FormulaError, FormulaResult};
use crate::token::{Token, TokenKind};

/// Byte written over matched spans. Not part of the alphabet.
const BLANK: u8 = b' ';

/// Non-alphanumeric characters a formula may contain
const SYMBOLS: &str = "-+*/()=.";

/// Check that every character is an ASCII letter, digit or one of `-+*/()=.`
pub fn check_alphabet(text: &str) -> bool {
    text.chars().all(is_allowed)
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || SYMBOLS.contains(c)
}

/// Tokenize a formula into a disambiguated, validated token sequence
///
/// # Example
/// ```rust
/// use mathcheck_formula::{tokenize, TokenKind};
///
/// let tokens = tokenize("-x+2").unwrap();
/// assert_eq!(tokens[0].kind, TokenKind::UnaryMinus);
/// assert_eq!(tokens[2].kind, TokenKind::OperatorPlus);
/// ```
pub fn tokenize(formula: &str) -> FormulaResult<Vec<Token>> {
    let mut tokens = scan(formula)?;
    disambiguate_unary(&mut tokens);
    validate(&tokens)?;
    log::trace!("tokenized {:?} into {} tokens", formula, tokens.len());
    Ok(tokens)
}

/// Split a formula into tokens ordered by source position, without
/// reclassifying minus signs or validating structure
pub fn scan(formula: &str) -> FormulaResult<Vec<Token>> {
    let mut rejected = String::new();
    for c in formula.chars().filter(|c| !is_allowed(*c)) {
        if !rejected.contains(c) {
            rejected.push(c);
        }
    }
    if !rejected.is_empty() {
        return Err(FormulaError::Alphabet {
            characters: rejected,
        });
    }

    // The alphabet is ASCII, so blanking bytes keeps the buffer valid UTF-8
    // and every offset lines up with the original text.
    let mut line = formula.as_bytes().to_vec();
    let mut tokens = Vec::new();

    for kind in TokenKind::SCAN_ORDER {
        let Some(pattern) = kind.pattern() else {
            continue;
        };
        let remaining = std::str::from_utf8(&line)
            .map_err(|e| FormulaError::Internal(format!("scan buffer is not UTF-8: {}", e)))?;
        let spans: Vec<_> = pattern.find_iter(remaining).map(|m| m.range()).collect();
        for span in spans {
            tokens.push(Token::new(kind, &formula[span.clone()], span.start, span.end));
            line[span].fill(BLANK);
        }
    }

    let leftover: String = line
        .iter()
        .filter(|b| **b != BLANK)
        .map(|b| *b as char)
        .collect();
    if !leftover.is_empty() {
        return Err(FormulaError::Lexical(format!(
            "characters {:?} are not recognized",
            leftover
        )));
    }

    if tokens.is_empty() {
        return Err(FormulaError::Lexical("formula is empty".into()));
    }

    tokens.sort_by_key(|token| token.start);
    Ok(tokens)
}

/// Reclassify minus tokens that cannot be binary as [`TokenKind::UnaryMinus`]
///
/// A minus is unary when it is the first token or when the token before it
/// is not a number, a variable or a closing parenthesis.
pub fn disambiguate_unary(tokens: &mut [Token]) {
    let mut previous: Option<TokenKind> = None;
    for token in tokens.iter_mut() {
        if token.kind == TokenKind::OperatorMinus {
            let follows_operand = matches!(
                previous,
                Some(TokenKind::Number | TokenKind::Variable | TokenKind::CloseParen)
            );
            if !follows_operand {
                token.kind = TokenKind::UnaryMinus;
            }
        }
        previous = Some(token.kind);
    }
}

/// Check operand/operator balance and parenthesis balance
///
/// Both checks always run; all failures are reported in one
/// [`FormulaError::Lexical`].
pub fn validate(tokens: &[Token]) -> FormulaResult<()> {
    let mut errors = Vec::new();

    let operands = tokens.iter().filter(|t| t.kind.is_operand()).count();
    let binary_operators = tokens
        .iter()
        .filter(|t| t.kind.is_binary_operator())
        .count();

    if operands > binary_operators + 1 {
        errors.push("too many operands for binary operators");
    } else if operands < binary_operators + 1 {
        errors.push("not enough operands for binary operators");
    }

    let mut depth: i64 = 0;
    let mut closed_too_early = false;
    for token in tokens {
        match token.kind {
            TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => {
                depth -= 1;
                if depth < 0 {
                    closed_too_early = true;
                }
            }
            _ => {}
        }
    }

    if closed_too_early || depth < 0 {
        errors.push("not enough opening parentheses");
    } else if depth > 0 {
        errors.push("not enough closing parentheses");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(FormulaError::Lexical(errors.join("; ")))
    }
}
