use serde_json::{Number, Value};
use std::borrow::Cow;

/// Return the text form of a [`Value`], as used for output and string
/// concatenation.
///
/// - `null` becomes an empty string.
/// - Numbers are written in their shortest decimal form, so `3.0` is `3`.
/// - Arrays are written as their items separated by commas.
/// - Objects are written as `[object Object]`.
pub fn stringify(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::Bool(bool) => Cow::Borrowed(if *bool { "true" } else { "false" }),
        Value::Number(number) => Cow::Owned(stringify_number(number)),
        Value::String(string) => Cow::Borrowed(string),
        Value::Array(array) => {
            let mut buffer = String::new();
            for (index, item) in array.iter().enumerate() {
                if index > 0 {
                    buffer.push(',');
                }
                buffer.push_str(&stringify(item));
            }
            Cow::Owned(buffer)
        }
        Value::Object(_) => Cow::Borrowed("[object Object]"),
    }
}

/// Return the text form of a [`Value`] used as an operand of `+`, or as an
/// argument to a method.
///
/// Identical to [`stringify`], except that `null` is written as `null`.
pub fn stringify_operand(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed("null"),
        value => stringify(value),
    }
}

/// Return the shortest decimal form of a [`Number`].
pub fn stringify_number(number: &Number) -> String {
    if let Some(integer) = number.as_i64() {
        return integer.to_string();
    }
    if let Some(integer) = number.as_u64() {
        return integer.to_string();
    }

    number.as_f64().map(stringify_float).unwrap_or_default()
}

/// Return the shortest decimal form of a finite `f64`.
///
/// Numbers with a decimal exponent of at least 21, or below -6, are written
/// in exponential form such as `1e+21` or `1.5e-7`.
fn stringify_float(float: f64) -> String {
    if float == 0.0 {
        return String::from("0");
    }

    // The exponential form holds the shortest digits that round trip.
    let exponential = format!("{:e}", float.abs());
    let (mantissa, exponent) = exponential
        .split_once('e')
        .unwrap_or((exponential.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let length = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let point = exponent.parse::<i32>().unwrap_or(0) + 1;

    let mut text = String::new();
    if float < 0.0 {
        text.push('-');
    }
    if length <= point && point <= 21 {
        text.push_str(&digits);
        text.push_str(&"0".repeat((point - length) as usize));
    } else if 0 < point && point <= 21 {
        let (whole, fraction) = digits.split_at(point as usize);
        text.push_str(whole);
        text.push('.');
        text.push_str(fraction);
    } else if -6 < point && point <= 0 {
        text.push_str("0.");
        text.push_str(&"0".repeat(-point as usize));
        text.push_str(&digits);
    } else {
        let (first, rest) = digits.split_at(1);
        text.push_str(first);
        if !rest.is_empty() {
            text.push('.');
            text.push_str(rest);
        }
        let sign = if point > 0 { '+' } else { '-' };
        text.push_str(&format!("e{sign}{}", (point - 1).abs()));
    }

    text
}

/// Convert an `f64` into a [`Value::Number`].
///
/// Whole numbers are stored as integers so they compare and print the same
/// way as numbers that came from the context. Returns `None` when the number
/// is not finite.
pub fn number_value(number: f64) -> Option<Value> {
    if number.fract() == 0.0 && number.abs() < 9_007_199_254_740_992.0 {
        return Some(Value::Number(Number::from(number as i64)));
    }

    Number::from_f64(number).map(Value::Number)
}

/// Return a human readable name for the type of a [`Value`].
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{number_value, stringify, stringify_operand};
    use serde_json::{json, Value};

    #[test]
    fn test_stringify_scalars() {
        assert_eq!(stringify(&Value::Null), "");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&json!(12)), "12");
        assert_eq!(stringify(&json!(-4)), "-4");
        assert_eq!(stringify(&json!(3.0)), "3");
        assert_eq!(stringify(&json!(0.5)), "0.5");
        assert_eq!(stringify(&json!("hey")), "hey");
    }

    #[test]
    fn test_stringify_floats() {
        assert_eq!(stringify(&json!(34.125)), "34.125");
        assert_eq!(stringify(&json!(-0.25)), "-0.25");
        assert_eq!(stringify(&json!(1e21)), "1e+21");
        assert_eq!(stringify(&json!(1.5e300)), "1.5e+300");
        assert_eq!(stringify(&json!(123e18)), "123000000000000000000");
        assert_eq!(stringify(&json!(0.000001)), "0.000001");
        assert_eq!(stringify(&json!(1.5e-7)), "1.5e-7");
        assert_eq!(stringify(&json!(-0.0)), "0");
    }

    #[test]
    fn test_stringify_operand() {
        assert_eq!(stringify_operand(&Value::Null), "null");
        assert_eq!(stringify_operand(&json!([1, null])), "1,");
        assert_eq!(stringify_operand(&json!(2.5)), "2.5");
    }

    #[test]
    fn test_stringify_containers() {
        assert_eq!(stringify(&json!(["a", 1, null, ["b", "c"]])), "a,1,,b,c");
        assert_eq!(stringify(&json!({ "a": 1 })), "[object Object]");
    }

    #[test]
    fn test_number_value() {
        assert_eq!(number_value(4.0), Some(json!(4)));
        assert_eq!(number_value(-0.25), Some(json!(-0.25)));
        assert_eq!(number_value(f64::INFINITY), None);
        assert_eq!(number_value(f64::NAN), None);
    }
}
