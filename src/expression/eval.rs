use super::{
    compare::{apply, apply_prefix, as_float, is_truthy},
    method::{self, utf16_length},
    tree::{Call, Expr},
    Operator,
};
use crate::{
    context::Lookup,
    format::{stringify, stringify_number},
    log::{EvaluateError, EvaluateErrorKind},
    region::Region,
};
use serde_json::Value;
use std::borrow::Cow;

/// The result of accessing a member of a [`Value`].
enum Access<'value> {
    /// The member exists within the value.
    Found(&'value Value),
    /// The member is derived from the value, such as `length`.
    Computed(Value),
    /// The member does not exist.
    Missing,
}

impl<'value> Access<'value> {
    fn into_cow(self) -> Cow<'value, Value> {
        match self {
            Access::Found(value) => Cow::Borrowed(value),
            Access::Computed(value) => Cow::Owned(value),
            Access::Missing => Cow::Owned(Value::Null),
        }
    }

    fn into_owned(self) -> Value {
        self.into_cow().into_owned()
    }
}

/// Walks an [`Expr`] tree, resolving names through a [`Lookup`].
///
/// Values found in the context are borrowed rather than cloned, until an
/// operator needs to produce a new value.
pub struct Evaluator<'source, 'context> {
    /// The expression text the tree was parsed from.
    source: &'source str,
    context: &'context dyn Lookup,
}

impl<'source, 'context> Evaluator<'source, 'context> {
    /// Create a new Evaluator.
    #[inline]
    pub fn new(source: &'source str, context: &'context dyn Lookup) -> Self {
        Self { source, context }
    }

    /// Evaluate the given [`Expr`].
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluateError`] describing the first operation that
    /// could not be performed.
    pub fn evaluate(&self, expression: &Expr) -> Result<Cow<'context, Value>, EvaluateError> {
        let value = match expression {
            Expr::Literal(literal) => Cow::Owned(literal.value.clone()),
            Expr::Variable(region) => {
                let name = region.literal(self.source);

                match self.context.lookup(name) {
                    Some(value) => Cow::Borrowed(value),
                    None => {
                        return Err(EvaluateError::new(
                            EvaluateErrorKind::UndefinedReference,
                            *region,
                        )
                        .with_help(format!("`{name}` is not defined")))
                    }
                }
            }
            Expr::Array(array) => {
                let mut items = Vec::with_capacity(array.items.len());
                for item in &array.items {
                    items.push(self.evaluate(item)?.into_owned());
                }

                Cow::Owned(Value::Array(items))
            }
            Expr::Member(member) => {
                let receiver = self.evaluate(&member.receiver)?;
                let name = member.name.literal(self.source);

                self.access(receiver, &Value::String(name.to_owned()), member.region)?
            }
            Expr::Index(index) => {
                let receiver = self.evaluate(&index.receiver)?;
                let key = self.evaluate(&index.index)?;

                self.access(receiver, &key, index.region)?
            }
            Expr::Call(call) => Cow::Owned(self.evaluate_call(call)?),
            Expr::Unary(unary) => {
                let operand = self.evaluate(&unary.operand)?;

                Cow::Owned(apply_prefix(unary.operator, &operand, unary.region)?)
            }
            Expr::Binary(binary) => {
                let left = self.evaluate(&binary.left)?;

                match binary.operator {
                    Operator::And if !is_truthy(&left) => left,
                    Operator::Or if is_truthy(&left) => left,
                    Operator::And | Operator::Or => self.evaluate(&binary.right)?,
                    operator => {
                        let right = self.evaluate(&binary.right)?;

                        Cow::Owned(apply(&left, operator, &right, binary.region)?)
                    }
                }
            }
            Expr::Conditional(conditional) => {
                if is_truthy(&self.evaluate(&conditional.condition)?) {
                    self.evaluate(&conditional.then)?
                } else {
                    self.evaluate(&conditional.otherwise)?
                }
            }
        };

        Ok(value)
    }

    /// Evaluate a method call.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluateError`] with [`EvaluateErrorKind::NotCallable`]
    /// when the callee is not a member access.
    fn evaluate_call(&self, call: &Call) -> Result<Value, EvaluateError> {
        let Expr::Member(member) = call.callee.as_ref() else {
            return Err(
                EvaluateError::new(EvaluateErrorKind::NotCallable, call.callee.get_region())
                    .with_help(format!(
                        "`{}` is not a method, only members such as `value.toString()` \
                        may be called",
                        call.callee.get_region().literal(self.source)
                    )),
            );
        };

        let receiver = self.evaluate(&member.receiver)?;
        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?.into_owned());
        }

        method::call(
            &receiver,
            member.name.literal(self.source),
            &arguments,
            call.region,
        )
    }

    /// Access the member of `receiver` named by `key`.
    ///
    /// A borrowed receiver yields a borrowed member, so walking a path
    /// through the context never clones the intermediate values.
    fn access(
        &self,
        receiver: Cow<'context, Value>,
        key: &Value,
        region: Region,
    ) -> Result<Cow<'context, Value>, EvaluateError> {
        match receiver {
            Cow::Borrowed(value) => Ok(access(value, key, region)?.into_cow()),
            Cow::Owned(value) => Ok(Cow::Owned(access(&value, key, region)?.into_owned())),
        }
    }
}

/// Access the member of `value` named by `key`.
///
/// Absent members are [`Access::Missing`], except on `null` which has no
/// members at all.
fn access<'value>(
    value: &'value Value,
    key: &Value,
    region: Region,
) -> Result<Access<'value>, EvaluateError> {
    let access = match (value, key) {
        (Value::Null, key) => {
            return Err(
                EvaluateError::new(EvaluateErrorKind::IncompatibleTypes, region).with_help(
                    format!("cannot read `{}` of null", stringify(key)),
                ),
            )
        }
        (Value::Array(array), Value::Number(number)) => position(as_float(number))
            .and_then(|position| array.get(position))
            .map_or(Access::Missing, Access::Found),
        (Value::String(string), Value::Number(number)) => position(as_float(number))
            .and_then(|position| string.encode_utf16().nth(position))
            .map_or(Access::Missing, |unit| {
                Access::Computed(Value::String(String::from_utf16_lossy(&[unit])))
            }),
        (Value::Object(map), Value::Number(number)) => map
            .get(&stringify_number(number))
            .map_or(Access::Missing, Access::Found),
        (Value::Object(map), Value::String(name)) => {
            map.get(name).map_or(Access::Missing, Access::Found)
        }
        (Value::Array(array), Value::String(name)) if name == "length" => {
            Access::Computed(Value::from(array.len()))
        }
        (Value::String(string), Value::String(name)) if name == "length" => {
            Access::Computed(Value::from(utf16_length(string)))
        }
        _ => Access::Missing,
    };

    Ok(access)
}

/// Convert a number into a position within a sequence, if it is a
/// non-negative whole number.
fn position(number: f64) -> Option<usize> {
    (number >= 0.0 && number.fract() == 0.0).then_some(number as usize)
}
