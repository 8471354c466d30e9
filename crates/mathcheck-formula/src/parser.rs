//! Expression tree builder
//!
//! Turns a validated token sequence into an [`ExpressionTree`] with an
//! operand stack and an operator stack. Open parentheses sit on the operator
//! stack as scope markers until their closing parenthesis arrives.
//!
//! Grouping follows operator priority, left to right, with one exception:
//! an operator equal in kind to the one on top of the stack is pushed
//! without combining, unless it is a division. Chains of repeated `+`, `-`
//! or `*` therefore group right to left (`10-3-2` is `10-(3-2)`), while
//! repeated division stays left to right (`5/9/4` is `(5/9)/4`).

use crate::ast::{BinaryOperator, ExpressionTree, Node, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};

/// Parse a formula string into an expression tree
///
/// # Example
/// ```rust
/// use mathcheck_formula::parse_formula;
///
/// let tree = parse_formula("2*(x+1)").unwrap();
/// assert_eq!(tree.to_string(), "(2 * (x + 1))");
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<ExpressionTree> {
    let tokens = tokenize(formula)?;
    let tree = build_tree(&tokens)?;
    log::debug!("built tree {} from {:?}", tree, formula);
    Ok(tree)
}

/// Build a tree from a disambiguated, validated token sequence
pub fn build_tree(tokens: &[Token]) -> FormulaResult<ExpressionTree> {
    let mut builder = TreeBuilder::default();
    for token in tokens {
        builder.push_token(token)?;
    }
    builder.finish()
}

/// Entry on the operator stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackEntry {
    /// Unclosed open parenthesis, with the operand stack height when it opened
    Scope(usize),
    Operator(TokenKind),
}

#[derive(Debug, Default)]
struct TreeBuilder {
    nodes: Vec<Node>,
    operators: Vec<StackEntry>,
}

impl TreeBuilder {
    fn push_token(&mut self, token: &Token) -> FormulaResult<()> {
        match token.kind {
            TokenKind::Number => self.nodes.push(Node::Number(parse_number(&token.text)?)),
            TokenKind::Variable => self.nodes.push(Node::Variable(token.text.clone())),
            TokenKind::OpenParen => self.operators.push(StackEntry::Scope(self.nodes.len())),
            TokenKind::CloseParen => self.close_scope()?,
            kind => self.push_operator(kind)?,
        }
        Ok(())
    }

    fn push_operator(&mut self, kind: TokenKind) -> FormulaResult<()> {
        if kind != TokenKind::OperatorDivide
            && self.operators.last() == Some(&StackEntry::Operator(kind))
        {
            self.operators.push(StackEntry::Operator(kind));
            return Ok(());
        }

        let priority = kind.priority();
        while let Some(&StackEntry::Operator(top)) = self.operators.last() {
            if top.priority() < priority {
                break;
            }
            self.combine()?;
        }
        self.operators.push(StackEntry::Operator(kind));
        Ok(())
    }

    fn close_scope(&mut self) -> FormulaResult<()> {
        loop {
            match self.operators.last() {
                Some(StackEntry::Operator(_)) => self.combine()?,
                Some(&StackEntry::Scope(base)) => {
                    self.operators.pop();
                    return match self.nodes.len().saturating_sub(base) {
                        1 => Ok(()),
                        0 => Err(FormulaError::Lexical("parentheses are empty".into())),
                        n => Err(FormulaError::Lexical(format!(
                            "{} operands inside parentheses are not joined by an operator",
                            n
                        ))),
                    };
                }
                None => {
                    return Err(FormulaError::Internal(
                        "closing parenthesis without an open scope".into(),
                    ))
                }
            }
        }
    }

    /// Pop one operator and its operands, push the combined node
    fn combine(&mut self) -> FormulaResult<()> {
        let kind = match self.operators.pop() {
            Some(StackEntry::Operator(kind)) => kind,
            Some(StackEntry::Scope(_)) => {
                return Err(FormulaError::Internal("unclosed scope on operator stack".into()))
            }
            None => return Err(FormulaError::Internal("operator stack is empty".into())),
        };

        let right = self.pop_operand(kind)?;
        let node = if let Some(op) = BinaryOperator::from_token_kind(kind) {
            let left = self.pop_operand(kind)?;
            Node::binary(op, left, right)
        } else if let Some(op) = UnaryOperator::from_token_kind(kind) {
            Node::unary(op, right)
        } else {
            return Err(FormulaError::Internal(format!("{} is not an operator", kind)));
        };
        self.nodes.push(node);
        Ok(())
    }

    /// Pop an operand, never reaching below the innermost open scope
    fn pop_operand(&mut self, kind: TokenKind) -> FormulaResult<Node> {
        if self.nodes.len() <= self.scope_base() {
            return Err(FormulaError::Lexical(format!(
                "operator {} is missing an operand",
                kind
            )));
        }
        self.nodes
            .pop()
            .ok_or_else(|| FormulaError::Internal("operand stack is empty".into()))
    }

    fn scope_base(&self) -> usize {
        self.operators
            .iter()
            .rev()
            .find_map(|entry| match entry {
                StackEntry::Scope(base) => Some(*base),
                StackEntry::Operator(_) => None,
            })
            .unwrap_or(0)
    }

    fn finish(mut self) -> FormulaResult<ExpressionTree> {
        while !self.operators.is_empty() {
            self.combine()?;
        }

        let root = self.nodes.pop();
        match (root, self.nodes.len()) {
            (Some(root), 0) => Ok(ExpressionTree::new(root)),
            (None, _) => Err(FormulaError::Lexical("formula has no operands".into())),
            (Some(_), rest) => Err(FormulaError::Lexical(format!(
                "{} operands are not joined by an operator",
                rest + 1
            ))),
        }
    }
}

/// Parse a numeric literal: base 10, optional fraction, no sign or exponent
fn parse_number(text: &str) -> FormulaResult<f64> {
    let value: f64 = text
        .parse()
        .map_err(|_| FormulaError::Lexical(format!("invalid number {:?}", text)))?;
    if !value.is_finite() {
        return Err(FormulaError::Lexical(format!(
            "number {:?} is out of range",
            text
        )));
    }
    Ok(value)
}
