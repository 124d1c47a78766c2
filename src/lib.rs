// Object model and rewrite engine of a WGSL compiler: hash-based RTTI, typed dispatch,
// per-program node arenas and the clone context that every pass is built on.

pub mod ast;
pub mod castable;
pub mod clone_context;
pub mod ice;
pub mod program;
pub mod program_id;
pub mod span;
pub mod symbol;
pub mod transform;
pub mod writer;

pub use castable::{switch, Castable, CastableExt, DefaultCase, Kind, TypeInfo};
pub use clone_context::{CloneContext, CloneOptions, Cloneable};
pub use ice::InternalCompilerError;
pub use program::{AnyRef, Program, ProgramBuilder, Ref};
pub use program_id::ProgramId;
