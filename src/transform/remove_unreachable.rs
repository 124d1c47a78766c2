use super::{Outcome, Transform};
use crate::ast::{BlockStatement, ReturnStatement};
use crate::clone_context::CloneContext;
use crate::program::{Program, ProgramBuilder};

/// Drops the statements that follow a `return` in the same block.
#[derive(Debug, Default, Clone, Copy)]
pub struct RemoveUnreachable;

impl Transform for RemoveUnreachable {
    fn name(&self) -> &'static str {
        "RemoveUnreachable"
    }

    fn apply(&mut self, src: &Program, dst: &mut ProgramBuilder) -> Outcome {
        let mut unreachable = Vec::new();
        for (_, node) in src.nodes() {
            let Some(block) = node.as_castable().cast::<BlockStatement>() else {
                continue;
            };
            let first_return = block
                .statements
                .iter()
                .position(|&s| src.node(s).as_castable().is::<ReturnStatement>());
            if let Some(index) = first_return {
                for &statement in &block.statements[index + 1..] {
                    unreachable.push((&block.statements, statement));
                }
            }
        }
        if unreachable.is_empty() {
            return Outcome::Skipped;
        }

        tracing::debug!(statements = unreachable.len(), "removing unreachable statements");
        let mut ctx = CloneContext::new(dst, src);
        for (list, statement) in unreachable {
            ctx.remove(list, statement);
        }
        ctx.clone_program();
        Outcome::Applied
    }
}
