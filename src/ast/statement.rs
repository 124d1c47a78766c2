use super::{Expression, Node, Variable};
use crate::clone_context::{CloneContext, Cloneable};
use crate::program::{AnyRef, Ref};
use crate::span::Span;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Statement {
    pub base: Node,
}
crate::castable!(Statement: Node);

impl Statement {
    pub fn new(span: Span) -> Self {
        Self {
            base: Node::new(span),
        }
    }
}

#[derive(Debug, Clone)]
#[repr(C)]
pub struct BlockStatement {
    pub base: Statement,
    pub statements: Vec<Ref<Statement>>,
}
crate::castable!(final BlockStatement: Statement);

impl BlockStatement {
    pub fn new(span: Span, statements: Vec<Ref<Statement>>) -> Self {
        Self {
            base: Statement::new(span),
            statements,
        }
    }
}

impl Cloneable for BlockStatement {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> AnyRef {
        let statements = ctx.clone_list(&self.statements);
        let span = Node::of(self).span;
        ctx.dst().create(Self::new(span, statements)).erase()
    }

    fn for_each_ref(&self, f: &mut dyn FnMut(AnyRef)) {
        self.statements.iter().for_each(|s| f(s.erase()));
    }
}

#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct ReturnStatement {
    pub base: Statement,
    pub value: Option<Ref<Expression>>,
}
crate::castable!(final ReturnStatement: Statement);

impl ReturnStatement {
    pub fn new(span: Span, value: Option<Ref<Expression>>) -> Self {
        Self {
            base: Statement::new(span),
            value,
        }
    }
}

impl Cloneable for ReturnStatement {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> AnyRef {
        let value = ctx.clone_opt(self.value);
        let span = Node::of(self).span;
        ctx.dst().create(Self::new(span, value)).erase()
    }

    fn for_each_ref(&self, f: &mut dyn FnMut(AnyRef)) {
        if let Some(value) = self.value {
            f(value.erase());
        }
    }
}

#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct AssignmentStatement {
    pub base: Statement,
    pub lhs: Ref<Expression>,
    pub rhs: Ref<Expression>,
}
crate::castable!(final AssignmentStatement: Statement);

impl AssignmentStatement {
    pub fn new(span: Span, lhs: Ref<Expression>, rhs: Ref<Expression>) -> Self {
        Self {
            base: Statement::new(span),
            lhs,
            rhs,
        }
    }
}

impl Cloneable for AssignmentStatement {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> AnyRef {
        let lhs = ctx.clone_ref(self.lhs);
        let rhs = ctx.clone_ref(self.rhs);
        let span = Node::of(self).span;
        ctx.dst().create(Self::new(span, lhs, rhs)).erase()
    }

    fn for_each_ref(&self, f: &mut dyn FnMut(AnyRef)) {
        f(self.lhs.erase());
        f(self.rhs.erase());
    }
}

/// Declares a function-scope variable.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct VariableDeclStatement {
    pub base: Statement,
    pub variable: Ref<Variable>,
}
crate::castable!(final VariableDeclStatement: Statement);

impl VariableDeclStatement {
    pub fn new(span: Span, variable: Ref<Variable>) -> Self {
        Self {
            base: Statement::new(span),
            variable,
        }
    }
}

impl Cloneable for VariableDeclStatement {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> AnyRef {
        let variable = ctx.clone_ref(self.variable);
        let span = Node::of(self).span;
        ctx.dst().create(Self::new(span, variable)).erase()
    }

    fn for_each_ref(&self, f: &mut dyn FnMut(AnyRef)) {
        f(self.variable.erase());
    }
}
