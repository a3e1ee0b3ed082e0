use super::{tree::Prefix, Operator};
use crate::{
    format::{number_value, stringify_operand, type_name},
    log::{incompatible_operands, EvaluateError, EvaluateErrorKind, INCOMPATIBLE_TYPES},
    region::Region,
};
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Return true if the given [`Value`] is truthy.
///
/// `null`, `false`, `0` and the empty string are falsy. Everything else is
/// truthy, including empty arrays and objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(bo) => *bo,
        Value::Number(nu) => {
            let float = as_float(nu);
            float != 0.0 && !float.is_nan()
        }
        Value::String(st) => !st.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

/// Return true if the two [`Value`] instances are strictly equal.
///
/// Numbers are compared by value, so `20` and `20.0` are equal. Values of
/// different types are never equal.
pub fn is_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => as_float(left) == as_float(right),
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len() && left.iter().zip(right).all(|(l, r)| is_equal(l, r))
        }
        (left, right) => left == right,
    }
}

/// Apply the binary [`Operator`] to the two [`Value`] instances.
///
/// The logical operators are not handled here, because they must be able
/// to skip evaluation of their right operand.
///
/// # Errors
///
/// Returns an [`EvaluateError`] covering `region` if the `Operator` cannot be
/// applied to the types, or if arithmetic produces a number that is not
/// finite.
pub fn apply(
    left: &Value,
    operator: Operator,
    right: &Value,
    region: Region,
) -> Result<Value, EvaluateError> {
    let incompatible = || {
        EvaluateError::new(EvaluateErrorKind::IncompatibleTypes, region).with_help(
            incompatible_operands(operator, type_name(left), type_name(right)),
        )
    };

    let value = match operator {
        Operator::Equal => Value::Bool(is_equal(left, right)),
        Operator::NotEqual => Value::Bool(!is_equal(left, right)),
        Operator::Greater
        | Operator::Lesser
        | Operator::GreaterOrEqual
        | Operator::LesserOrEqual => {
            let ordering = match (left, right) {
                (Value::Number(left), Value::Number(right)) => {
                    as_float(left).partial_cmp(&as_float(right))
                }
                (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
                _ => return Err(incompatible()),
            };

            Value::Bool(matches!(
                (operator, ordering),
                (Operator::Greater, Some(Ordering::Greater))
                    | (Operator::Lesser, Some(Ordering::Less))
                    | (
                        Operator::GreaterOrEqual,
                        Some(Ordering::Greater | Ordering::Equal)
                    )
                    | (Operator::LesserOrEqual, Some(Ordering::Less | Ordering::Equal))
            ))
        }
        Operator::Add => match (left, right) {
            (Value::Number(l), Value::Number(r)) => finite(as_float(l) + as_float(r), region)?,
            (Value::String(_), _) | (_, Value::String(_)) => {
                let mut string = stringify_operand(left).into_owned();
                string.push_str(&stringify_operand(right));
                Value::String(string)
            }
            _ => return Err(incompatible()),
        },
        Operator::Subtract | Operator::Multiply | Operator::Divide | Operator::Remainder => {
            let (Value::Number(l), Value::Number(r)) = (left, right) else {
                return Err(incompatible());
            };
            let (l, r) = (as_float(l), as_float(r));

            let result = match operator {
                Operator::Subtract => l - r,
                Operator::Multiply => l * r,
                Operator::Divide => l / r,
                _ => l % r,
            };
            finite(result, region)?
        }
        Operator::And | Operator::Or => {
            return Err(EvaluateError::new(EvaluateErrorKind::Syntax, region)
                .with_help(format!("operator `{operator}` must be short-circuited")))
        }
    };

    Ok(value)
}

/// Apply the prefix operator to the [`Value`].
///
/// # Errors
///
/// Returns an [`EvaluateError`] covering `region` if the operator cannot be
/// applied to the type, or if the result is not a finite number.
pub fn apply_prefix(
    operator: Prefix,
    operand: &Value,
    region: Region,
) -> Result<Value, EvaluateError> {
    let number = match (operator, operand) {
        (Prefix::Not, operand) => return Ok(Value::Bool(!is_truthy(operand))),
        (Prefix::Negate, Value::Number(number)) => -as_float(number),
        (Prefix::Plus, Value::Number(number)) => as_float(number),
        (Prefix::Plus, Value::String(string)) => {
            let trimmed = string.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        (Prefix::Plus, Value::Bool(bool)) => f64::from(u8::from(*bool)),
        (Prefix::Plus, Value::Null) => 0.0,
        (_, operand) => {
            return Err(EvaluateError::new(EvaluateErrorKind::IncompatibleTypes, region)
                .with_help(format!(
                    "{INCOMPATIBLE_TYPES}, a {} cannot be converted to a number",
                    type_name(operand)
                )))
        }
    };

    finite(number, region)
}

/// Return the `f64` form of a [`Number`].
pub fn as_float(number: &Number) -> f64 {
    number.as_f64().unwrap_or(f64::NAN)
}

/// Convert the result of arithmetic into a [`Value`].
///
/// # Errors
///
/// Returns an [`EvaluateError`] if the number is not finite.
fn finite(number: f64, region: Region) -> Result<Value, EvaluateError> {
    number_value(number).ok_or_else(|| {
        EvaluateError::new(EvaluateErrorKind::NonFiniteNumber, region)
            .with_help(format!("the result `{number}` is not a finite number"))
    })
}

#[cfg(test)]
mod tests {
    use super::{apply, apply_prefix, is_equal, is_truthy};
    use crate::{
        expression::{tree::Prefix, Operator},
        log::EvaluateErrorKind,
        region::Region,
    };
    use serde_json::{json, Value};

    #[test]
    fn test_truthy() {
        let true_values = vec![
            json!("lorem"),
            json!(12),
            json!(-12),
            json!(114.4),
            json!(true),
            json!(["lorem", "ipsum"]),
            json!([]),
            json!({}),
        ];
        let false_values = vec![json!(""), json!(0), json!(0.0), json!(false), Value::Null];

        for value in true_values {
            assert!(is_truthy(&value), "{value} should be truthy");
        }
        for value in false_values {
            assert!(!is_truthy(&value), "{value} should be falsy");
        }
    }

    #[test]
    fn test_strict_equality() {
        assert!(is_equal(&json!(20), &json!(20.0)));
        assert!(is_equal(&json!([1, "a"]), &json!([1.0, "a"])));
        assert!(is_equal(&json!({"a": "b"}), &json!({"a": "b"})));
        assert!(!is_equal(&json!(1), &json!("1")));
        assert!(!is_equal(&json!(0), &json!(false)));
        assert!(!is_equal(&Value::Null, &json!("")));
    }

    #[test]
    fn test_truthy_compare() {
        let cases = vec![
            (json!(100), Operator::Greater, json!(50)),
            (json!("b"), Operator::Greater, json!("a")),
            (json!(50), Operator::Lesser, json!(5100)),
            (json!("a"), Operator::Lesser, json!("b")),
            (json!(10), Operator::GreaterOrEqual, json!(10)),
            (json!("a"), Operator::LesserOrEqual, json!("a")),
            (json!(10), Operator::NotEqual, json!(20)),
            (json!(true), Operator::Equal, json!(true)),
        ];

        for (left, operator, right) in cases {
            assert_eq!(
                apply(&left, operator, &right, Region::default()),
                Ok(json!(true)),
                "{left} {operator} {right}"
            );
        }
    }

    #[test]
    fn test_arithmetic() {
        let region = Region::default();

        assert_eq!(apply(&json!(7), Operator::Remainder, &json!(4), region), Ok(json!(3)));
        assert_eq!(apply(&json!(1.5), Operator::Multiply, &json!(2), region), Ok(json!(3)));
        assert_eq!(apply(&json!(1), Operator::Subtract, &json!(0.5), region), Ok(json!(0.5)));
        assert_eq!(
            apply(&json!(3), Operator::Add, &json!(" miles"), region),
            Ok(json!("3 miles"))
        );
        assert_eq!(
            apply(&json!([1, 2]), Operator::Add, &json!("!"), region),
            Ok(json!("1,2!"))
        );
        assert_eq!(
            apply(&json!("a"), Operator::Add, &Value::Null, region),
            Ok(json!("anull"))
        );
        assert_eq!(
            apply(&json!("x"), Operator::Add, &json!(1e21), region),
            Ok(json!("x1e+21"))
        );
    }

    #[test]
    fn test_incompatible_types() {
        let region = Region::new(3..9);
        let error = apply(&json!("hello"), Operator::Greater, &json!(true), region).unwrap_err();

        assert_eq!(error.kind(), EvaluateErrorKind::IncompatibleTypes);
        assert_eq!(error.region(), region);
        assert_eq!(
            error.help(),
            Some("operator `>` cannot be applied to string and boolean")
        );
        assert!(apply(&json!(true), Operator::Add, &json!(false), region).is_err());
        assert!(apply(&json!(1), Operator::Lesser, &json!("2"), region).is_err());
    }

    #[test]
    fn test_non_finite() {
        let error = apply(&json!(1), Operator::Divide, &json!(0), Region::default()).unwrap_err();

        assert_eq!(error.kind(), EvaluateErrorKind::NonFiniteNumber);
    }

    #[test]
    fn test_prefix() {
        let region = Region::default();

        assert_eq!(apply_prefix(Prefix::Not, &json!([]), region), Ok(json!(false)));
        assert_eq!(apply_prefix(Prefix::Negate, &json!(2.5), region), Ok(json!(-2.5)));
        assert_eq!(apply_prefix(Prefix::Plus, &json!(" 12 "), region), Ok(json!(12)));
        assert_eq!(apply_prefix(Prefix::Plus, &json!(true), region), Ok(json!(1)));
        assert!(apply_prefix(Prefix::Plus, &json!("twelve"), region).is_err());
        assert!(apply_prefix(Prefix::Negate, &json!("12"), region).is_err());
    }
}
