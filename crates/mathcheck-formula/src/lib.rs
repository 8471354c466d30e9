//! # mathcheck-formula
//!
//! Arithmetic formula parser and evaluator for mathcheck.
//!
//! This crate provides:
//! - Tokenizing (text → tokens, with unary minus detection and validation)
//! - Tree building (tokens → expression tree)
//! - Evaluation (expression tree + variable bindings → number)
//! - A thread-safe cache of parsed formulas
//!
//! Formulas use numbers, variables, `+ - * /`, unary minus and parentheses.
//!
//! ## Example
//!
//! ```rust
//! use mathcheck_formula::{parse_formula, Bindings};
//!
//! let tree = parse_formula("-x+(x-(-2*x+3))").unwrap();
//! let result = tree.evaluate(&Bindings::new().with("x", 50.0)).unwrap();
//! assert_eq!(result, 97.0);
//! ```

pub mod ast;
pub mod cache;
pub mod equation;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{BinaryOperator, ExpressionTree, Node, UnaryOperator};
pub use cache::{CacheOptions, FormulaCache};
pub use equation::split_equation;
pub use error::{FormulaError, FormulaErrorKind, FormulaResult};
pub use evaluator::{evaluate, Bindings};
pub use lexer::{check_alphabet, tokenize};
pub use parser::{build_tree, parse_formula};
pub use token::{Token, TokenKind};
