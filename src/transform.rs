//! Passes that rewrite a program into a new one.

mod fold_constants;
pub mod mangling;
mod remove_unreachable;
mod renamer;

pub use fold_constants::FoldConstants;
pub use remove_unreachable::RemoveUnreachable;
pub use renamer::{Renamer, RenamerConfig};

use crate::program::{Program, ProgramBuilder};

/// Whether a pass produced a new program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Nothing to do. The input program is kept and the builder is discarded.
    Skipped,
}

pub trait Transform {
    fn name(&self) -> &'static str;

    /// Clones `src` into `dst`, rewriting as it goes.
    fn apply(&mut self, src: &Program, dst: &mut ProgramBuilder) -> Outcome;
}

/// Runs one transform.
#[tracing::instrument(level = "debug", skip_all, fields(transform = transform.name(), program = %program.id()))]
pub fn run(transform: &mut dyn Transform, program: Program) -> Program {
    let mut dst = ProgramBuilder::new();
    match transform.apply(&program, &mut dst) {
        Outcome::Applied => dst.build(),
        Outcome::Skipped => {
            tracing::debug!("nothing to do");
            program
        }
    }
}

/// Runs a sequence of transforms, each on the output of the one before.
#[derive(Default)]
pub struct Manager {
    transforms: Vec<Box<dyn Transform>>,
}

impl Manager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, transform: impl Transform + 'static) -> &mut Self {
        self.transforms.push(Box::new(transform));
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn run(&mut self, program: Program) -> Program {
        self.transforms
            .iter_mut()
            .fold(program, |program, transform| run(transform.as_mut(), program))
    }
}
