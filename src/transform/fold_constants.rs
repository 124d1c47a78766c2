use super::{Outcome, Transform};
use crate::ast::{BinaryExpression, IntLiteralExpression, Node};
use crate::clone_context::CloneContext;
use crate::program::{Program, ProgramBuilder};

/// Replaces binary expressions on integer literals with their value.
///
/// Operands are folded first, so nested expressions collapse bottom-up. Division or
/// modulo by zero and out of range shifts are left as they are.
#[derive(Debug, Default, Clone, Copy)]
pub struct FoldConstants;

impl Transform for FoldConstants {
    fn name(&self) -> &'static str {
        "FoldConstants"
    }

    fn apply(&mut self, src: &Program, dst: &mut ProgramBuilder) -> Outcome {
        let has_binary = src
            .nodes()
            .any(|(_, node)| node.as_castable().is::<BinaryExpression>());
        if !has_binary {
            return Outcome::Skipped;
        }

        let mut ctx = CloneContext::new(dst, src);
        ctx.replace_all(|ctx, binary: &BinaryExpression| {
            let lhs = ctx.clone_ref(binary.lhs);
            let rhs = ctx.clone_ref(binary.rhs);
            let dst = ctx.dst();
            let value = |operand| {
                dst.try_get::<IntLiteralExpression, _>(operand)
                    .map(|literal| literal.value)
            };
            let folded = match (value(lhs), value(rhs)) {
                (Some(l), Some(r)) => binary.op.evaluate(l, r),
                _ => None,
            };
            let span = Node::of(binary).span;
            let replacement = match folded {
                Some(value) => dst.create(IntLiteralExpression::new(span, value)).erase(),
                None => dst
                    .create(BinaryExpression::new(span, binary.op, lhs, rhs))
                    .erase(),
            };
            Some(replacement)
        });
        ctx.clone_program();
        Outcome::Applied
    }
}
