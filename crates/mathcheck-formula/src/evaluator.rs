//! Formula evaluator
//!
//! Evaluates expression trees against variable bindings.

use crate::ast::{BinaryOperator, ExpressionTree, Node, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use std::collections::HashMap;

/// Variable values supplied at evaluation time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: HashMap<String, f64>,
}

impl Bindings {
    /// Create empty bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, builder style
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    /// Set or replace a binding
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Look up a variable. There is no default value.
    pub fn get(&self, name: &str) -> FormulaResult<f64> {
        self.values.get(name).copied().ok_or_else(|| {
            FormulaError::IncorrectFormula(format!("argument {} is not set", name))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<HashMap<String, f64>> for Bindings {
    fn from(values: HashMap<String, f64>) -> Self {
        Self { values }
    }
}

impl ExpressionTree {
    /// Evaluate the tree against the given bindings
    pub fn evaluate(&self, bindings: &Bindings) -> FormulaResult<f64> {
        evaluate(self.root(), bindings)
    }
}

/// Evaluate a node and its subtree
///
/// Success always yields a finite number.
pub fn evaluate(node: &Node, bindings: &Bindings) -> FormulaResult<f64> {
    match node {
        Node::Number(n) => Ok(*n),
        Node::Variable(name) => {
            let value = bindings.get(name)?;
            if !value.is_finite() {
                return Err(FormulaError::IncorrectFormula(format!(
                    "argument {} is not a finite number",
                    name
                )));
            }
            Ok(value)
        }
        Node::UnaryOp { op, operand } => {
            let value = evaluate(operand, bindings)?;
            Ok(apply_unary(*op, value))
        }
        Node::BinaryOp { op, left, right } => {
            let lhs = evaluate(left, bindings)?;
            let rhs = evaluate(right, bindings)?;
            apply_binary(*op, lhs, rhs)
        }
    }
}

fn apply_unary(op: UnaryOperator, value: f64) -> f64 {
    match op {
        UnaryOperator::Negate => -value,
    }
}

fn apply_binary(op: BinaryOperator, lhs: f64, rhs: f64) -> FormulaResult<f64> {
    let result = match op {
        BinaryOperator::Add => lhs + rhs,
        BinaryOperator::Subtract => lhs - rhs,
        BinaryOperator::Multiply => lhs * rhs,
        BinaryOperator::Divide => {
            if rhs == 0.0 {
                return Err(FormulaError::Arithmetic(format!(
                    "zero division at {}/{}",
                    lhs, rhs
                )));
            }
            lhs / rhs
        }
    };

    if !result.is_finite() {
        return Err(FormulaError::Arithmetic(format!(
            "{} {} {} overflows",
            lhs,
            op.symbol(),
            rhs
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;
    use pretty_assertions::assert_eq;

    fn eval(formula: &str, bindings: &Bindings) -> FormulaResult<f64> {
        parse_formula(formula)?.evaluate(bindings)
    }

    #[test]
    fn test_evaluate_constants() {
        let none = Bindings::new();
        assert_eq!(eval("2+2", &none).unwrap(), 4.0);
        assert_eq!(eval("-3+4.", &none).unwrap(), 1.0);
        assert_eq!(eval("-3-(-3)", &none).unwrap(), 0.0);
        assert_eq!(eval("5/9/4", &none).unwrap(), 5.0 / 9.0 / 4.0);
        assert_eq!(eval("--3", &none).unwrap(), 3.0);
        assert_eq!(eval("1.5*2", &none).unwrap(), 3.0);
    }

    #[test]
    fn test_evaluate_with_variable() {
        let x = |value: f64| Bindings::new().with("x", value);
        assert_eq!(eval("x+2", &x(-4.0)).unwrap(), -2.0);
        assert_eq!(eval("x-2", &x(-4.0)).unwrap(), -6.0);
        assert_eq!(eval("x*3", &x(56.0)).unwrap(), 168.0);
        assert_eq!(eval("x/9", &x(5.0)).unwrap(), 0.5555555555555556);
        assert_eq!(eval("-x+(x-(-2*x+3))", &x(50.0)).unwrap(), 97.0);
    }

    #[test]
    fn test_repeated_subtraction_groups_right() {
        assert_eq!(eval("10-3-2", &Bindings::new()).unwrap(), 9.0);
    }

    #[test]
    fn test_unbound_variable() {
        let err = eval("2+2*a+3+v", &Bindings::new()).unwrap_err();
        assert_eq!(
            err,
            FormulaError::IncorrectFormula("argument a is not set".into())
        );

        let bindings = Bindings::new().with("a", 1.0);
        let err = eval("2+2*a+3+v", &bindings).unwrap_err();
        assert_eq!(
            err,
            FormulaError::IncorrectFormula("argument v is not set".into())
        );
    }

    #[test]
    fn test_division_by_zero() {
        let err = eval("2+2/0", &Bindings::new()).unwrap_err();
        assert_eq!(err, FormulaError::Arithmetic("zero division at 2/0".into()));

        let err = eval("1/(x-x)", &Bindings::new().with("x", 3.0)).unwrap_err();
        assert!(matches!(err, FormulaError::Arithmetic(_)));

        let err = eval("1/-0", &Bindings::new()).unwrap_err();
        assert!(matches!(err, FormulaError::Arithmetic(_)));
    }

    #[test]
    fn test_non_finite_argument() {
        let err = eval("x", &Bindings::new().with("x", f64::NAN)).unwrap_err();
        assert_eq!(
            err,
            FormulaError::IncorrectFormula("argument x is not a finite number".into())
        );

        let err = eval("-x", &Bindings::new().with("x", f64::INFINITY)).unwrap_err();
        assert!(matches!(err, FormulaError::IncorrectFormula(_)));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let big = Bindings::new().with("x", f64::MAX);
        let err = eval("x*2", &big).unwrap_err();
        assert!(matches!(err, FormulaError::Arithmetic(_)));
    }

    #[test]
    fn test_bindings() {
        let mut bindings: Bindings = [("x", 1.0), ("y", 2.0)].into_iter().collect();
        assert_eq!(bindings.len(), 2);
        assert!(bindings.contains("y"));
        bindings.set("x", 5.0);
        assert_eq!(bindings.get("x").unwrap(), 5.0);
        assert!(bindings.get("z").is_err());

        let map: HashMap<String, f64> = HashMap::from([("x".to_string(), 7.0)]);
        assert_eq!(Bindings::from(map).get("x").unwrap(), 7.0);
        assert!(Bindings::new().is_empty());
    }
}
