//! Expression evaluation.
//!
//! Expressions appear in output segments (`##=lat.toFixed(2)##`), in the
//! condition of `if` blocks and in the collection of `each` blocks. They are
//! evaluated against a [`Lookup`], and have no access to anything else.
//!
//! &str -> Token -> Expr -> Value
mod compare;
mod eval;
mod lex;
mod method;
mod parse;
mod tree;

pub(crate) use compare::is_truthy;
pub(crate) use lex::is_identifier;

use self::{eval::Evaluator, parse::Parser};
use crate::{context::Lookup, log::EvaluateError};
use serde_json::Value;
use std::{borrow::Cow, fmt::Display};

/// Evaluate the expression against the given context.
///
/// # Errors
///
/// Returns an [`EvaluateError`] when the expression is not well formed,
/// references a name that is absent from the context, or applies an
/// operation to values that do not support it.
///
/// # Examples
///
/// ```
/// use hashblock::{evaluate, Context};
/// use serde_json::json;
///
/// let context = Context::new()
///     .with_value("lat", json!(34.5))
///     .with_value("range", json!(20));
///
/// assert_eq!(evaluate("lat > 30 && range / 2", &context).unwrap(), json!(10));
/// assert!(evaluate("missing + 1", &context).is_err());
/// ```
pub fn evaluate<T>(expression: &str, context: &T) -> Result<Value, EvaluateError>
where
    T: Lookup,
{
    evaluate_in(expression, context).map(Cow::into_owned)
}

/// Evaluate the expression, borrowing the result from the context when
/// possible.
pub(crate) fn evaluate_in<'context>(
    expression: &str,
    context: &'context dyn Lookup,
) -> Result<Cow<'context, Value>, EvaluateError> {
    let tree = Parser::new(expression).parse()?;

    Evaluator::new(expression, context).evaluate(&tree)
}

/// Operators recognized by the Lexer and Parser.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Operator {
    /// +
    Add,
    /// -
    Subtract,
    /// *
    Multiply,
    /// /
    Divide,
    /// %
    Remainder,
    /// >
    Greater,
    /// <
    Lesser,
    /// == or ===
    Equal,
    /// != or !==
    NotEqual,
    /// >=
    GreaterOrEqual,
    /// <=
    LesserOrEqual,
    /// &&
    And,
    /// ||
    Or,
}

impl Operator {
    /// Return the binding power of the [`Operator`] when used between two
    /// operands. Higher binds tighter.
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            Operator::Or => 1,
            Operator::And => 2,
            Operator::Equal | Operator::NotEqual => 3,
            Operator::Greater
            | Operator::Lesser
            | Operator::GreaterOrEqual
            | Operator::LesserOrEqual => 4,
            Operator::Add | Operator::Subtract => 5,
            Operator::Multiply | Operator::Divide | Operator::Remainder => 6,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Add => write!(f, "+"),
            Operator::Subtract => write!(f, "-"),
            Operator::Multiply => write!(f, "*"),
            Operator::Divide => write!(f, "/"),
            Operator::Remainder => write!(f, "%"),
            Operator::Greater => write!(f, ">"),
            Operator::Lesser => write!(f, "<"),
            Operator::Equal => write!(f, "=="),
            Operator::NotEqual => write!(f, "!="),
            Operator::GreaterOrEqual => write!(f, ">="),
            Operator::LesserOrEqual => write!(f, "<="),
            Operator::And => write!(f, "&&"),
            Operator::Or => write!(f, "||"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::evaluate;
    use crate::{log::EvaluateErrorKind, Context};
    use serde_json::{json, Value};

    fn context() -> Context {
        Context::try_from(json!({
            "lat": 34.0,
            "range": 20,
            "name": "Zuma Beach",
            "empty": [],
            "data": [
                { "title": "Zuma", "dry_grade": "A+", "northSouthOrder": 34.02 },
                { "title": "Venice", "dry_grade": "B", "northSouthOrder": 33.98 },
            ],
            "nothing": null,
        }))
        .unwrap()
    }

    fn check(expression: &str, expect: Value) {
        assert_eq!(
            evaluate(expression, &context()).unwrap(),
            expect,
            "evaluating `{expression}`"
        );
    }

    fn check_err(expression: &str, expect: EvaluateErrorKind) {
        let error = evaluate(expression, &context()).unwrap_err();
        assert_eq!(error.kind(), expect, "evaluating `{expression}`: {error}");
    }

    #[test]
    fn test_literals() {
        check("12", json!(12));
        check("1.5", json!(1.5));
        check("'single'", json!("single"));
        check(r#""dou\"ble""#, json!("dou\"ble"));
        check("true", json!(true));
        check("null", Value::Null);
        check("undefined", Value::Null);
        check("[1, 'a', false]", json!([1, "a", false]));
    }

    #[test]
    fn test_arithmetic() {
        check("1 + 2 * 3", json!(7));
        check("(1 + 2) * 3", json!(9));
        check("range / 69", json!(20.0 / 69.0));
        check("range % 6", json!(2));
        check("-range + 5", json!(-15));
        check("'a' + 1", json!("a1"));
        check("'a' + nothing + data.missing", json!("anullnull"));
        check("name + '!'", json!("Zuma Beach!"));
        check("+'4.5'", json!(4.5));
    }

    #[test]
    fn test_comparison() {
        check("lat > 30", json!(true));
        check("lat - range <= 14", json!(true));
        check("range == 20", json!(true));
        check("range === 20.0", json!(true));
        check("name != 'Zuma Beach'", json!(false));
        check("'a' < 'b'", json!(true));
    }

    #[test]
    fn test_logical() {
        check("nothing || 'fallback'", json!("fallback"));
        check("name && range", json!(20));
        check("!empty", json!(false));
        check("!nothing", json!(true));
        check("0 && missing", json!(0));
        check("range > 10 ? 'far' : 'near'", json!("far"));
    }

    #[test]
    fn test_member_access() {
        check("data[0].title", json!("Zuma"));
        check("data[1]['dry_grade']", json!("B"));
        check("data.length", json!(2));
        check("name.length", json!(10));
        check("data[0].missing", Value::Null);
        check("data[5]", Value::Null);
    }

    #[test]
    fn test_methods() {
        check("lat.toFixed(2)", json!("34.00"));
        check("name.toUpperCase()", json!("ZUMA BEACH"));
        check("name.split(' ')[1]", json!("Beach"));
        check("data[0].dry_grade.includes('+')", json!(true));
        check("[1, 2, 3].join('-')", json!("1-2-3"));
        check("range.toString() + 'mi'", json!("20mi"));
    }

    #[test]
    fn test_errors() {
        check_err("missing", EvaluateErrorKind::UndefinedReference);
        check_err("nothing.title", EvaluateErrorKind::IncompatibleTypes);
        check_err("name - 1", EvaluateErrorKind::IncompatibleTypes);
        check_err("range / 0", EvaluateErrorKind::NonFiniteNumber);
        check_err("range +", EvaluateErrorKind::Syntax);
        check_err("", EvaluateErrorKind::Syntax);
        check_err("name.shout()", EvaluateErrorKind::UnknownMethod);
        check_err("lat(1)", EvaluateErrorKind::NotCallable);
        check_err("range = 1", EvaluateErrorKind::Syntax);
    }

    #[test]
    fn test_undefined_reference_region() {
        let error = evaluate("lat + missing", &context()).unwrap_err();

        assert_eq!(error.region(), (6..13).into());
    }
}
