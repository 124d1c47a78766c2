use super::{Expression, Node};
use crate::clone_context::{CloneContext, Cloneable};
use crate::program::{AnyRef, Ref};
use crate::span::Span;
use crate::symbol::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Let,
    Var,
    Const,
}

impl VariableKind {
    pub fn keyword(self) -> &'static str {
        match self {
            VariableKind::Let => "let",
            VariableKind::Var => "var",
            VariableKind::Const => "const",
        }
    }
}

/// A `let`, `var` or `const` declaration.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct Variable {
    pub base: Node,
    pub kind: VariableKind,
    pub name: Symbol,
    pub ty: Option<Symbol>,
    pub initializer: Option<Ref<Expression>>,
}
crate::castable!(Variable: Node);

impl Variable {
    pub fn new(
        span: Span,
        kind: VariableKind,
        name: Symbol,
        ty: Option<Symbol>,
        initializer: Option<Ref<Expression>>,
    ) -> Self {
        Self {
            base: Node::new(span),
            kind,
            name,
            ty,
            initializer,
        }
    }
}

impl Cloneable for Variable {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> AnyRef {
        let name = ctx.clone_symbol(self.name);
        let ty = self.ty.map(|ty| ctx.clone_symbol(ty));
        let initializer = ctx.clone_opt(self.initializer);
        ctx.dst()
            .create(Self::new(self.base.span, self.kind, name, ty, initializer))
            .erase()
    }

    fn for_each_ref(&self, f: &mut dyn FnMut(AnyRef)) {
        if let Some(initializer) = self.initializer {
            f(initializer.erase());
        }
    }
}

/// A function parameter. Always has a type and never an initializer.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct Parameter {
    pub base: Variable,
}
crate::castable!(final Parameter: Variable);

impl Parameter {
    pub fn new(span: Span, name: Symbol, ty: Symbol) -> Self {
        Self {
            base: Variable::new(span, VariableKind::Let, name, Some(ty), None),
        }
    }

    pub fn name(&self) -> Symbol {
        self.base.name
    }

    #[track_caller]
    pub fn ty(&self) -> Symbol {
        match self.base.ty {
            Some(ty) => ty,
            None => crate::ice!("parameter without a type"),
        }
    }
}

impl Cloneable for Parameter {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> AnyRef {
        let name = ctx.clone_symbol(self.name());
        let ty = ctx.clone_symbol(self.ty());
        ctx.dst()
            .create(Self::new(self.base.base.span, name, ty))
            .erase()
    }
}
