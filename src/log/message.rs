use std::fmt::Display;

pub const INCOMPATIBLE_TYPES: &str = "incompatible types";
pub const UNEXPECTED_TOKEN: &str = "unexpected token";
pub const UNEXPECTED_EOF: &str = "unexpected end of expression";

/// Return a string describing an unexpected operator.
pub fn expected_operator<T>(received: T) -> String
where
    T: Display,
{
    format!(
        "expected operator like `+`, `-`, `*`, `/`, `%`, `==`, `!=`, `>=`, `<=`, `&&`, `||`, \
        found `{}`",
        received
    )
}

/// Return a string describing two values that an operator cannot be applied to.
pub fn incompatible_operands<T, Y, U>(operator: T, left: Y, right: U) -> String
where
    T: Display,
    Y: Display,
    U: Display,
{
    format!("operator `{operator}` cannot be applied to {left} and {right}")
}
