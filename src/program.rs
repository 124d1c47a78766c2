//! Node arenas.
//!
//! A [`ProgramBuilder`] owns the nodes while they are created. [`ProgramBuilder::build`]
//! freezes it into a read-only [`Program`]. Nodes refer to each other through [`Ref`]
//! handles, which remember the program they belong to.

mod builder;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use slotmap::{new_key_type, SlotMap};

pub use builder::ProgramBuilder;

use crate::ast::Node;
use crate::castable::{Kind, TypeInfo};
use crate::clone_context::Cloneable;
use crate::program_id::{assert_program_ids_equal, ProgramId, ProgramIdOf};
use crate::symbol::SymbolTable;

new_key_type! {
    pub struct NodeKey;
}

/// A handle to a node of type `T`, or of a type deriving from `T`.
pub struct Ref<T: ?Sized> {
    key: NodeKey,
    program: ProgramId,
    _marker: PhantomData<fn() -> *const T>,
}

/// A handle to a node of any type.
pub type AnyRef = Ref<dyn Cloneable>;

impl<T: ?Sized> Ref<T> {
    pub(crate) fn new(key: NodeKey, program: ProgramId) -> Self {
        Self {
            key,
            program,
            _marker: PhantomData,
        }
    }

    pub fn key(self) -> NodeKey {
        self.key
    }

    /// Forgets the node type.
    pub fn erase(self) -> AnyRef {
        self.retype()
    }

    /// Changes the node type without checking it.
    pub(crate) fn retype<U: ?Sized>(self) -> Ref<U> {
        Ref::new(self.key, self.program)
    }
}

impl<T: Kind> Ref<T> {
    /// Widens the handle to a base type of `T`.
    pub fn upcast<U: Kind>(self) -> Ref<U> {
        const {
            assert!(
                TypeInfo::derives(T::INFO, U::INFO),
                "upcast to a type that is not a base"
            )
        };
        self.retype()
    }
}

impl<T: ?Sized> Clone for Ref<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Ref<T> {}

impl<T: ?Sized> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.program == other.program
    }
}

impl<T: ?Sized> Eq for Ref<T> {}

impl<T: ?Sized> Hash for Ref<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.program.hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref({:?} in {})", self.key, self.program)
    }
}

impl<T: ?Sized> ProgramIdOf for Ref<T> {
    fn program_id(&self) -> ProgramId {
        self.program
    }
}

/// A finished, immutable program.
pub struct Program {
    id: ProgramId,
    nodes: SlotMap<NodeKey, Box<dyn Cloneable>>,
    symbols: SymbolTable,
    globals: Vec<Ref<Node>>,
}

impl Program {
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Looks up a node of any type.
    #[track_caller]
    pub fn node<T: ?Sized>(&self, node: Ref<T>) -> &dyn Cloneable {
        assert_program_ids_equal(self.id, node.program, false);
        match self.nodes.get(node.key) {
            Some(object) => object.as_ref(),
            None => crate::ice!("dangling node reference {node:?}"),
        }
    }

    /// Looks up a node whose type is statically known.
    #[track_caller]
    pub fn get<T: Kind>(&self, node: Ref<T>) -> &T {
        let object = self.node(node);
        match object.as_castable().cast::<T>() {
            Some(object) => object,
            None => crate::ice!(
                "{node:?} is a {}, not a {}",
                object.type_info(),
                T::INFO
            ),
        }
    }

    /// Looks up a node, if it is a `T`.
    #[track_caller]
    pub fn try_get<T: Kind, U: ?Sized>(&self, node: Ref<U>) -> Option<&T> {
        self.node(node).as_castable().cast::<T>()
    }

    /// All nodes, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = (AnyRef, &dyn Cloneable)> + '_ {
        self.nodes
            .iter()
            .map(|(key, object)| (Ref::new(key, self.id), object.as_ref()))
    }

    /// The module-scope declarations, in source order.
    pub fn globals(&self) -> &Vec<Ref<Node>> {
        &self.globals
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ProgramIdOf for Program {
    fn program_id(&self) -> ProgramId {
        self.id
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("id", &self.id)
            .field("nodes", &self.nodes.len())
            .field("symbols", &self.symbols.len())
            .field("globals", &self.globals)
            .finish()
    }
}
