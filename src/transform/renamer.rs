use indexmap::IndexMap;

use super::mangling::{mangle_name, to_identifier};
use super::{Outcome, Transform};
use crate::clone_context::{CloneContext, CloneOptions};
use crate::program::{Program, ProgramBuilder};

/// Builtin types and functions. Sorted.
const BUILTINS: &[&str] = &[
    "abs", "acos", "all", "any", "array", "arrayLength", "asin", "atan", "atan2", "atomic",
    "bitcast", "bool", "ceil", "clamp", "cos", "cross", "degrees", "distance", "dot", "dpdx",
    "dpdy", "exp", "exp2", "f16", "f32", "floor", "fract", "fwidth", "i32", "length", "log",
    "log2", "mat2x2f", "mat3x3f", "mat4x4f", "max", "min", "mix", "normalize", "pow", "ptr",
    "radians", "reflect", "round", "sampler", "select", "sign", "sin", "smoothstep", "sqrt",
    "step", "storageBarrier", "tan", "textureLoad", "textureSample", "textureStore", "trunc",
    "u32", "vec2f", "vec2i", "vec2u", "vec3f", "vec3i", "vec3u", "vec4f", "vec4i", "vec4u",
    "workgroupBarrier",
];

#[derive(Debug, Clone, Default)]
pub struct RenamerConfig {
    /// Path prepended to every renamed symbol. Parts must be identifiers.
    pub prefix: Vec<String>,
    /// Exact new names for some symbols, used instead of the mangled name. Names that
    /// aren't identifiers are adjusted until they are.
    pub requested_names: IndexMap<String, String>,
    /// Names that are never renamed, on top of the builtins.
    pub preserve: Vec<String>,
}

impl RenamerConfig {
    fn is_preserved(&self, name: &str) -> bool {
        BUILTINS.binary_search(&name).is_ok() || self.preserve.iter().any(|p| p == name)
    }
}

/// Renames every user symbol to a mangled name.
#[derive(Debug, Clone, Default)]
pub struct Renamer {
    config: RenamerConfig,
    remappings: IndexMap<String, String>,
}

impl Renamer {
    pub fn new(config: RenamerConfig) -> Self {
        Self {
            config,
            remappings: IndexMap::new(),
        }
    }

    /// Old name to new name for every symbol renamed by the last run, in first-use order.
    pub fn remappings(&self) -> &IndexMap<String, String> {
        &self.remappings
    }
}

impl Transform for Renamer {
    fn name(&self) -> &'static str {
        "Renamer"
    }

    fn apply(&mut self, src: &Program, dst: &mut ProgramBuilder) -> Outcome {
        let config = &self.config;
        let mut remappings = IndexMap::new();
        {
            let options = CloneOptions {
                auto_clone_symbols: false,
            };
            let mut ctx = CloneContext::with_options(dst, src, options);
            ctx.replace_all_symbols(|name, symbols| {
                if config.is_preserved(name) {
                    return symbols.register(name);
                }
                let wanted = match config.requested_names.get(name) {
                    Some(requested) => requested.clone(),
                    None => mangle_name(&config.prefix, name),
                };
                let symbol = symbols.new_symbol(&to_identifier(wanted));
                remappings.insert(name.to_string(), symbols.name(symbol).to_string());
                symbol
            });
            ctx.clone_program();
        }
        tracing::debug!(renamed = remappings.len(), "renamed symbols");
        self.remappings = remappings;
        Outcome::Applied
    }
}
