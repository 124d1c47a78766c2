use super::{BlockStatement, Node, Parameter};
use crate::clone_context::{CloneContext, Cloneable};
use crate::program::{AnyRef, Ref};
use crate::span::Span;
use crate::symbol::Symbol;

#[derive(Debug, Clone)]
#[repr(C)]
pub struct Function {
    pub base: Node,
    pub name: Symbol,
    pub params: Vec<Ref<Parameter>>,
    pub return_type: Option<Symbol>,
    pub body: Ref<BlockStatement>,
}
crate::castable!(final Function: Node);

impl Function {
    pub fn new(
        span: Span,
        name: Symbol,
        params: Vec<Ref<Parameter>>,
        return_type: Option<Symbol>,
        body: Ref<BlockStatement>,
    ) -> Self {
        Self {
            base: Node::new(span),
            name,
            params,
            return_type,
            body,
        }
    }
}

impl Cloneable for Function {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> AnyRef {
        let name = ctx.clone_symbol(self.name);
        let params = ctx.clone_list(&self.params);
        let return_type = self.return_type.map(|ty| ctx.clone_symbol(ty));
        let body = ctx.clone_ref(self.body);
        ctx.dst()
            .create(Self::new(self.base.span, name, params, return_type, body))
            .erase()
    }

    fn for_each_ref(&self, f: &mut dyn FnMut(AnyRef)) {
        self.params.iter().for_each(|p| f(p.erase()));
        f(self.body.erase());
    }
}
