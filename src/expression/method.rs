//! Methods that may be called on values within an expression.
//!
//! | receiver | methods                                                    |
//! |----------|------------------------------------------------------------|
//! | any      | `toString`                                                 |
//! | number   | `toFixed`                                                  |
//! | string   | `toUpperCase`, `toLowerCase`, `trim`, `includes`,          |
//! |          | `startsWith`, `endsWith`, `indexOf`, `slice`, `split`,     |
//! |          | `replace`                                                  |
//! | array    | `includes`, `indexOf`, `join`, `slice`                     |
//!
//! Positions within strings are counted in UTF-16 code units, the same unit
//! used by `length`.
use super::compare::{as_float, is_equal};
use crate::{
    format::{stringify, stringify_number, stringify_operand, type_name},
    log::{EvaluateError, EvaluateErrorKind},
    region::Region,
};
use serde_json::Value;

/// Call the named method on the receiver.
///
/// # Errors
///
/// Returns an [`EvaluateError`] covering `region` when the method does not
/// exist for the type of the receiver, or the arguments are not usable.
pub fn call(
    receiver: &Value,
    name: &str,
    arguments: &[Value],
    region: Region,
) -> Result<Value, EvaluateError> {
    let arguments = Arguments {
        name,
        values: arguments,
        region,
    };

    match (receiver, name) {
        (Value::Null, _) => Err(EvaluateError::new(EvaluateErrorKind::IncompatibleTypes, region)
            .with_help(format!("cannot call `{name}` on null"))),
        (_, "toString") => Ok(Value::String(stringify(receiver).into_owned())),
        (Value::Number(number), "toFixed") => {
            let digits = arguments.index_or(0, 0)?;
            if !(0..=100).contains(&digits) {
                return Err(arguments.invalid("the number of digits must be between 0 and 100"));
            }

            let float = as_float(number);
            if float.abs() >= 1e21 {
                return Ok(Value::String(stringify_number(number)));
            }

            Ok(Value::String(to_fixed(float, digits as usize)))
        }
        (Value::String(string), _) => call_string(string, &arguments),
        (Value::Array(array), _) => call_array(array, &arguments),
        _ => Err(arguments.unknown(type_name(receiver))),
    }
}

fn call_string(string: &str, arguments: &Arguments) -> Result<Value, EvaluateError> {
    let value = match arguments.name {
        "toUpperCase" => Value::String(string.to_uppercase()),
        "toLowerCase" => Value::String(string.to_lowercase()),
        "trim" => Value::String(string.trim().to_owned()),
        "includes" => Value::Bool(string.contains(arguments.string(0)?.as_str())),
        "startsWith" => Value::Bool(string.starts_with(arguments.string(0)?.as_str())),
        "endsWith" => Value::Bool(string.ends_with(arguments.string(0)?.as_str())),
        "indexOf" => {
            let search = arguments.string(0)?;
            match string.find(search.as_str()) {
                Some(index) => Value::from(utf16_length(&string[..index])),
                None => Value::from(-1),
            }
        }
        "slice" => {
            let units: Vec<u16> = string.encode_utf16().collect();
            let (begin, end) = arguments.range(units.len())?;

            Value::String(String::from_utf16_lossy(&units[begin..end]))
        }
        "split" => {
            let separator = arguments.string(0)?;
            let parts: Vec<Value> = if separator.is_empty() {
                string.chars().map(|c| Value::String(c.to_string())).collect()
            } else {
                string
                    .split(separator.as_str())
                    .map(|part| Value::String(part.to_owned()))
                    .collect()
            };

            Value::Array(parts)
        }
        "replace" => {
            let from = arguments.string(0)?;
            let to = arguments.string(1)?;

            Value::String(string.replacen(from.as_str(), &to, 1))
        }
        _ => return Err(arguments.unknown("string")),
    };

    Ok(value)
}

fn call_array(array: &[Value], arguments: &Arguments) -> Result<Value, EvaluateError> {
    let value = match arguments.name {
        "includes" => {
            let search = arguments.value(0)?;
            Value::Bool(array.iter().any(|item| is_equal(item, search)))
        }
        "indexOf" => {
            let search = arguments.value(0)?;
            match array.iter().position(|item| is_equal(item, search)) {
                Some(index) => Value::from(index),
                None => Value::from(-1),
            }
        }
        "join" => {
            let separator = match arguments.values.first() {
                Some(separator) => stringify(separator).into_owned(),
                None => String::from(","),
            };
            let joined = array
                .iter()
                .map(stringify)
                .collect::<Vec<_>>()
                .join(&separator);

            Value::String(joined)
        }
        "slice" => {
            let (begin, end) = arguments.range(array.len())?;
            Value::Array(array[begin..end].to_vec())
        }
        _ => return Err(arguments.unknown("array")),
    };

    Ok(value)
}

/// Write the number with exactly `digits` digits after the decimal point.
///
/// Rounding works on the exact decimal expansion of the number, and a tie
/// is rounded away from zero, so `2.5` becomes `3` and `34.125` becomes
/// `34.13` with two digits.
fn to_fixed(number: f64, digits: usize) -> String {
    // Every finite f64 has at most 1074 digits after the decimal point.
    let exact = format!("{:.1074}", number.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .collect();
    if fraction.as_bytes().get(digits).is_some_and(|digit| *digit >= b'5') {
        let mut carry = true;
        for digit in kept.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let point = kept.len() - digits;
    let mut text = String::with_capacity(kept.len() + 2);
    if number < 0.0 {
        text.push('-');
    }
    text.extend(kept[..point].iter().map(|digit| char::from(*digit)));
    if digits > 0 {
        text.push('.');
        text.extend(kept[point..].iter().map(|digit| char::from(*digit)));
    }

    text
}

/// Return the length of the string in UTF-16 code units.
pub fn utf16_length(string: &str) -> usize {
    string.encode_utf16().count()
}

/// The arguments given to a method call.
struct Arguments<'a> {
    name: &'a str,
    values: &'a [Value],
    region: Region,
}

impl<'a> Arguments<'a> {
    /// Return the argument at the given position.
    fn value(&self, position: usize) -> Result<&'a Value, EvaluateError> {
        self.values.get(position).ok_or_else(|| {
            self.invalid(format!(
                "`{}` expects at least {} argument(s)",
                self.name,
                position + 1
            ))
        })
    }

    /// Return the text form of the argument at the given position.
    fn string(&self, position: usize) -> Result<String, EvaluateError> {
        self.value(position)
            .map(|value| stringify_operand(value).into_owned())
    }

    /// Return the argument at the given position as a whole number, or
    /// `default` when it is absent.
    fn index_or(&self, position: usize, default: i64) -> Result<i64, EvaluateError> {
        match self.values.get(position) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Number(number)) => Ok(as_float(number).trunc() as i64),
            Some(other) => Err(self.invalid(format!(
                "`{}` expects a number, found {}",
                self.name,
                type_name(other)
            ))),
        }
    }

    /// Return the bounds selected by the optional `begin` and `end`
    /// arguments, clamped to `length`.
    ///
    /// Negative positions count back from the end.
    fn range(&self, length: usize) -> Result<(usize, usize), EvaluateError> {
        let length = length as i64;
        let resolve = |position: i64| {
            let position = if position < 0 { length + position } else { position };
            position.clamp(0, length) as usize
        };

        let begin = resolve(self.index_or(0, 0)?);
        let end = resolve(self.index_or(1, length)?);

        Ok((begin, end.max(begin)))
    }

    fn invalid<T>(&self, help: T) -> EvaluateError
    where
        T: Into<String>,
    {
        EvaluateError::new(EvaluateErrorKind::InvalidArguments, self.region).with_help(help)
    }

    fn unknown(&self, receiver: &str) -> EvaluateError {
        EvaluateError::new(EvaluateErrorKind::UnknownMethod, self.region)
            .with_help(format!("{receiver} has no method named `{}`", self.name))
    }
}
