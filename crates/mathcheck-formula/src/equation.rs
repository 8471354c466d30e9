//! Equation splitting

use crate::error::{FormulaError, FormulaResult};

/// Split an equation into its left and right sides at `=`
///
/// The sides are returned untouched; each is a formula for
/// [`parse_formula`](crate::parse_formula).
///
/// # Example
/// ```rust
/// use mathcheck_formula::split_equation;
///
/// assert_eq!(split_equation("2*x=x+4").unwrap(), ("2*x", "x+4"));
/// assert!(split_equation("x=1=2").is_err());
/// ```
pub fn split_equation(equation: &str) -> FormulaResult<(&str, &str)> {
    let mut parts = equation.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(left), Some(right), None) => Ok((left, right)),
        _ => Err(FormulaError::IncorrectFormula(
            "formula must be made of 2 parts split with \"=\"".into(),
        )),
    }
}
