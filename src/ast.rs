//! A small WGSL syntax tree.
//!
//! ```text
//! Node
//! ├── Expression: IdentifierExpression, IntLiteralExpression, BinaryExpression, CallExpression
//! ├── Statement: BlockStatement, ReturnStatement, AssignmentStatement, VariableDeclStatement
//! ├── Variable
//! │   └── Parameter
//! └── Function
//! ```

mod expression;
mod function;
mod statement;
mod variable;

pub use expression::{
    BinaryExpression, BinaryOp, CallExpression, Expression, IdentifierExpression,
    IntLiteralExpression,
};
pub use function::Function;
pub use statement::{
    AssignmentStatement, BlockStatement, ReturnStatement, Statement, VariableDeclStatement,
};
pub use variable::{Parameter, Variable, VariableKind};

use crate::castable::{CastableExt, Kind};
use crate::span::Span;

/// The root of the syntax tree hierarchy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub span: Span,
}
crate::castable!(Node);

impl Node {
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    /// The `Node` part of any syntax tree node.
    #[track_caller]
    pub fn of<T: Kind>(node: &T) -> &Node {
        match node.cast::<Node>() {
            Some(node) => node,
            None => crate::ice!("{} is not a syntax tree node", T::INFO),
        }
    }
}
