use crate::{expression::Operator, region::Region};
use serde_json::Value;

/// The Abstract Syntax Tree of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value located directly in the expression.
    Literal(Literal),
    /// A name resolved through the context.
    Variable(Region),
    /// An array literal, such as `[1, 2, 3]`.
    Array(Array),
    /// Access a named member, such as `location.title`.
    Member(Member),
    /// Access a computed member, such as `items[0]`.
    Index(Index),
    /// Call a method, such as `name.toUpperCase()`.
    Call(Call),
    /// An operator applied to a single operand.
    Unary(Unary),
    /// An operator applied to two operands.
    Binary(Binary),
    /// Choose between two expressions, such as `a ? b : c`.
    Conditional(Conditional),
}

impl Expr {
    /// Get the Region from the underlying Expr kind.
    pub fn get_region(&self) -> Region {
        match self {
            Expr::Literal(literal) => literal.region,
            Expr::Variable(region) => *region,
            Expr::Array(array) => array.region,
            Expr::Member(member) => member.region,
            Expr::Index(index) => index.region,
            Expr::Call(call) => call.region,
            Expr::Unary(unary) => unary.region,
            Expr::Binary(binary) => binary.region,
            Expr::Conditional(conditional) => conditional.region,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    pub items: Vec<Expr>,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub receiver: Box<Expr>,
    /// Location of the member name.
    pub name: Region,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub receiver: Box<Expr>,
    pub index: Box<Expr>,
    pub region: Region,
}

/// A call is only valid when the callee is a [`Member`], which names the
/// method and provides the receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub region: Region,
}

/// Operators that accept a single operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    /// !
    Not,
    /// -
    Negate,
    /// +
    Plus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: Prefix,
    pub operand: Box<Expr>,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expr>,
    pub operator: Operator,
    pub right: Box<Expr>,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: Box<Expr>,
    pub then: Box<Expr>,
    pub otherwise: Box<Expr>,
    pub region: Region,
}
