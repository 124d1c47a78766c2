use std::fmt;

use super::Node;
use crate::clone_context::{CloneContext, Cloneable};
use crate::program::{AnyRef, Ref};
use crate::span::Span;
use crate::symbol::Symbol;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Expression {
    pub base: Node,
}
crate::castable!(Expression: Node);

impl Expression {
    pub fn new(span: Span) -> Self {
        Self {
            base: Node::new(span),
        }
    }
}

/// A reference to a named value.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct IdentifierExpression {
    pub base: Expression,
    pub symbol: Symbol,
}
crate::castable!(final IdentifierExpression: Expression);

impl IdentifierExpression {
    pub fn new(span: Span, symbol: Symbol) -> Self {
        Self {
            base: Expression::new(span),
            symbol,
        }
    }
}

impl Cloneable for IdentifierExpression {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> AnyRef {
        let symbol = ctx.clone_symbol(self.symbol);
        let span = Node::of(self).span;
        ctx.dst().create(Self::new(span, symbol)).erase()
    }
}

#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct IntLiteralExpression {
    pub base: Expression,
    pub value: i64,
}
crate::castable!(final IntLiteralExpression: Expression);

impl IntLiteralExpression {
    pub fn new(span: Span, value: i64) -> Self {
        Self {
            base: Expression::new(span),
            value,
        }
    }
}

impl Cloneable for IntLiteralExpression {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> AnyRef {
        let span = Node::of(self).span;
        ctx.dst().create(Self::new(span, self.value)).erase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    And,
    Or,
    Xor,
    ShiftLeft,
    ShiftRight,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
        }
    }

    /// Evaluates the operator on two integers. Arithmetic wraps.
    /// Returns `None` for a zero divisor and for out of range shifts.
    pub fn evaluate(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            BinaryOp::Add => Some(lhs.wrapping_add(rhs)),
            BinaryOp::Subtract => Some(lhs.wrapping_sub(rhs)),
            BinaryOp::Multiply => Some(lhs.wrapping_mul(rhs)),
            BinaryOp::Divide if rhs == 0 => None,
            BinaryOp::Divide => Some(lhs.wrapping_div(rhs)),
            BinaryOp::Modulo if rhs == 0 => None,
            BinaryOp::Modulo => Some(lhs.wrapping_rem(rhs)),
            BinaryOp::And => Some(lhs & rhs),
            BinaryOp::Or => Some(lhs | rhs),
            BinaryOp::Xor => Some(lhs ^ rhs),
            BinaryOp::ShiftLeft => u32::try_from(rhs).ok().and_then(|n| lhs.checked_shl(n)),
            BinaryOp::ShiftRight => u32::try_from(rhs).ok().and_then(|n| lhs.checked_shr(n)),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct BinaryExpression {
    pub base: Expression,
    pub op: BinaryOp,
    pub lhs: Ref<Expression>,
    pub rhs: Ref<Expression>,
}
crate::castable!(final BinaryExpression: Expression);

impl BinaryExpression {
    pub fn new(span: Span, op: BinaryOp, lhs: Ref<Expression>, rhs: Ref<Expression>) -> Self {
        Self {
            base: Expression::new(span),
            op,
            lhs,
            rhs,
        }
    }
}

impl Cloneable for BinaryExpression {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> AnyRef {
        let lhs = ctx.clone_ref(self.lhs);
        let rhs = ctx.clone_ref(self.rhs);
        let span = Node::of(self).span;
        ctx.dst()
            .create(Self::new(span, self.op, lhs, rhs))
            .erase()
    }

    fn for_each_ref(&self, f: &mut dyn FnMut(AnyRef)) {
        f(self.lhs.erase());
        f(self.rhs.erase());
    }
}

/// A call to a function or builtin.
#[derive(Debug, Clone)]
#[repr(C)]
pub struct CallExpression {
    pub base: Expression,
    pub target: Symbol,
    pub args: Vec<Ref<Expression>>,
}
crate::castable!(final CallExpression: Expression);

impl CallExpression {
    pub fn new(span: Span, target: Symbol, args: Vec<Ref<Expression>>) -> Self {
        Self {
            base: Expression::new(span),
            target,
            args,
        }
    }
}

impl Cloneable for CallExpression {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> AnyRef {
        let target = ctx.clone_symbol(self.target);
        let args = ctx.clone_list(&self.args);
        let span = Node::of(self).span;
        ctx.dst().create(Self::new(span, target, args)).erase()
    }

    fn for_each_ref(&self, f: &mut dyn FnMut(AnyRef)) {
        self.args.iter().for_each(|arg| f(arg.erase()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate() {
        assert_eq!(BinaryOp::Add.evaluate(i64::MAX, 1), Some(i64::MIN));
        assert_eq!(BinaryOp::Divide.evaluate(7, 2), Some(3));
        assert_eq!(BinaryOp::Divide.evaluate(7, 0), None);
        assert_eq!(BinaryOp::Modulo.evaluate(7, 0), None);
        assert_eq!(BinaryOp::Divide.evaluate(i64::MIN, -1), Some(i64::MIN));
        assert_eq!(BinaryOp::ShiftLeft.evaluate(1, 4), Some(16));
        assert_eq!(BinaryOp::ShiftLeft.evaluate(1, 64), None);
        assert_eq!(BinaryOp::ShiftRight.evaluate(16, -1), None);
    }
}
