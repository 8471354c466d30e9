//! Expression tree types

use crate::token::TokenKind;
use std::collections::BTreeSet;
use std::fmt;

/// Node of an expression tree. Each node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Numeric literal
    Number(f64),
    /// Free variable, resolved from bindings at evaluation time
    Variable(String),
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Node>,
    },
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
}

impl BinaryOperator {
    /// Operator for a binary operator token kind
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::OperatorPlus => Some(BinaryOperator::Add),
            TokenKind::OperatorMinus => Some(BinaryOperator::Subtract),
            TokenKind::OperatorMultiply => Some(BinaryOperator::Multiply),
            TokenKind::OperatorDivide => Some(BinaryOperator::Divide),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }
}

impl UnaryOperator {
    /// Operator for a unary operator token kind
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::UnaryMinus => Some(UnaryOperator::Negate),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            UnaryOperator::Negate => '-',
        }
    }
}

impl Node {
    /// Create a binary node
    pub fn binary(op: BinaryOperator, left: Node, right: Node) -> Self {
        Node::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a unary node
    pub fn unary(op: UnaryOperator, operand: Node) -> Self {
        Node::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a variable leaf
    pub fn variable(name: impl Into<String>) -> Self {
        Node::Variable(name.into())
    }

    fn collect_variables<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Node::Number(_) => {}
            Node::Variable(name) => {
                names.insert(name.as_str());
            }
            Node::UnaryOp { operand, .. } => operand.collect_variables(names),
            Node::BinaryOp { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
        }
    }
}

impl fmt::Display for Node {
    /// Fully parenthesized infix form, so grouping is visible
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number(n) => write!(f, "{}", n),
            Node::Variable(name) => f.write_str(name),
            Node::UnaryOp { op, operand } => write!(f, "{}({})", op.symbol(), operand),
            Node::BinaryOp { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
        }
    }
}

/// Immutable parsed formula, reusable across evaluations
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionTree {
    root: Node,
}

impl ExpressionTree {
    pub(crate) fn new(root: Node) -> Self {
        Self { root }
    }

    /// Root node of the tree
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Names of the variables the formula references, sorted and unique
    pub fn variables(&self) -> Vec<&str> {
        let mut names = BTreeSet::new();
        self.root.collect_variables(&mut names);
        names.into_iter().collect()
    }
}

impl fmt::Display for ExpressionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}
