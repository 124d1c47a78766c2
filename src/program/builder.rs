use slotmap::SlotMap;

use super::{AnyRef, Program, Ref};
use crate::ast::{
    AssignmentStatement, BinaryExpression, BinaryOp, BlockStatement, CallExpression, Expression,
    Function, IdentifierExpression, IntLiteralExpression, Node, Parameter, ReturnStatement,
    Statement, Variable, VariableDeclStatement, VariableKind,
};
use crate::castable::Kind;
use crate::clone_context::Cloneable;
use crate::program_id::{assert_program_ids_equal, ProgramId, ProgramIdOf};
use crate::span::Span;
use crate::symbol::{Symbol, SymbolTable};

/// A program under construction.
pub struct ProgramBuilder {
    program: Program,
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramBuilder {
    pub fn new() -> Self {
        let id = ProgramId::new();
        Self {
            program: Program {
                id,
                nodes: SlotMap::with_key(),
                symbols: SymbolTable::new(id),
                globals: Vec::new(),
            },
        }
    }

    pub fn id(&self) -> ProgramId {
        self.program.id
    }

    /// Moves `node` into the arena. Every node it refers to must already be in this builder.
    #[track_caller]
    pub fn create<T: Cloneable + Kind>(&mut self, node: T) -> Ref<T> {
        let id = self.program.id;
        let nodes = &self.program.nodes;
        node.for_each_ref(&mut |child: AnyRef| {
            assert_program_ids_equal(id, child.program_id(), false);
            if !nodes.contains_key(child.key()) {
                crate::ice!("{} refers to a dangling node {child:?}", T::INFO);
            }
        });
        let key = self.program.nodes.insert(Box::new(node));
        Ref::new(key, id)
    }

    /// Interns `name`.
    #[track_caller]
    pub fn sym(&mut self, name: &str) -> Symbol {
        self.program.symbols.register(name)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.program.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.program.symbols
    }

    #[track_caller]
    pub fn add_global<T: Kind>(&mut self, node: Ref<T>) {
        assert_program_ids_equal(self.program.id, node.program_id(), false);
        self.program.globals.push(node.upcast());
    }

    pub fn globals(&self) -> &Vec<Ref<Node>> {
        &self.program.globals
    }

    #[track_caller]
    pub fn node<T: ?Sized>(&self, node: Ref<T>) -> &dyn Cloneable {
        self.program.node(node)
    }

    #[track_caller]
    pub fn get<T: Kind>(&self, node: Ref<T>) -> &T {
        self.program.get(node)
    }

    #[track_caller]
    pub fn try_get<T: Kind, U: ?Sized>(&self, node: Ref<U>) -> Option<&T> {
        self.program.try_get(node)
    }

    pub fn build(self) -> Program {
        tracing::debug!(
            program = %self.program.id,
            nodes = self.program.nodes.len(),
            globals = self.program.globals.len(),
            "built program"
        );
        self.program
    }

    pub fn ident(&mut self, name: &str) -> Ref<IdentifierExpression> {
        let symbol = self.sym(name);
        self.create(IdentifierExpression::new(Span::default(), symbol))
    }

    pub fn int(&mut self, value: i64) -> Ref<IntLiteralExpression> {
        self.create(IntLiteralExpression::new(Span::default(), value))
    }

    pub fn binary<L: Kind, R: Kind>(
        &mut self,
        op: BinaryOp,
        lhs: Ref<L>,
        rhs: Ref<R>,
    ) -> Ref<BinaryExpression> {
        self.create(BinaryExpression::new(
            Span::default(),
            op,
            lhs.upcast(),
            rhs.upcast(),
        ))
    }

    pub fn call(&mut self, target: &str, args: Vec<Ref<Expression>>) -> Ref<CallExpression> {
        let target = self.sym(target);
        self.create(CallExpression::new(Span::default(), target, args))
    }

    pub fn block(&mut self, statements: Vec<Ref<Statement>>) -> Ref<BlockStatement> {
        self.create(BlockStatement::new(Span::default(), statements))
    }

    pub fn ret<E: Kind>(&mut self, value: Option<Ref<E>>) -> Ref<ReturnStatement> {
        let value = value.map(Ref::upcast);
        self.create(ReturnStatement::new(Span::default(), value))
    }

    pub fn assign<L: Kind, R: Kind>(&mut self, lhs: Ref<L>, rhs: Ref<R>) -> Ref<AssignmentStatement> {
        self.create(AssignmentStatement::new(
            Span::default(),
            lhs.upcast(),
            rhs.upcast(),
        ))
    }

    /// `let name = initializer;`
    pub fn let_decl<E: Kind>(&mut self, name: &str, initializer: Ref<E>) -> Ref<VariableDeclStatement> {
        let name = self.sym(name);
        let variable = self.create(Variable::new(
            Span::default(),
            VariableKind::Let,
            name,
            None,
            Some(initializer.upcast()),
        ));
        self.decl(variable)
    }

    pub fn decl(&mut self, variable: Ref<Variable>) -> Ref<VariableDeclStatement> {
        self.create(VariableDeclStatement::new(Span::default(), variable))
    }

    /// `var name: ty = initializer;`
    pub fn var(
        &mut self,
        name: &str,
        ty: Option<&str>,
        initializer: Option<Ref<Expression>>,
    ) -> Ref<Variable> {
        let name = self.sym(name);
        let ty = ty.map(|ty| self.sym(ty));
        self.create(Variable::new(
            Span::default(),
            VariableKind::Var,
            name,
            ty,
            initializer,
        ))
    }

    pub fn param(&mut self, name: &str, ty: &str) -> Ref<Parameter> {
        let name = self.sym(name);
        let ty = self.sym(ty);
        self.create(Parameter::new(Span::default(), name, ty))
    }

    /// Declares a module-scope function.
    pub fn func(
        &mut self,
        name: &str,
        params: Vec<Ref<Parameter>>,
        return_type: Option<&str>,
        body: Vec<Ref<Statement>>,
    ) -> Ref<Function> {
        let name = self.sym(name);
        let return_type = return_type.map(|ty| self.sym(ty));
        let body = self.block(body);
        let function = self.create(Function::new(
            Span::default(),
            name,
            params,
            return_type,
            body,
        ));
        self.add_global(function);
        function
    }

    /// Declares `const name: ty = initializer;` at module scope.
    pub fn global_const<E: Kind>(&mut self, name: &str, ty: Option<&str>, initializer: Ref<E>) -> Ref<Variable> {
        let name = self.sym(name);
        let ty = ty.map(|ty| self.sym(ty));
        let variable = self.create(Variable::new(
            Span::default(),
            VariableKind::Const,
            name,
            ty,
            Some(initializer.upcast()),
        ));
        self.add_global(variable);
        variable
    }
}

impl ProgramIdOf for ProgramBuilder {
    fn program_id(&self) -> ProgramId {
        self.program.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn func_is_global() {
        let mut b = ProgramBuilder::new();
        let a = b.param("a", "i32");
        let value = b.ident("a");
        let ret = b.ret(Some(value));
        let f = b.func("id", vec![a], Some("i32"), vec![ret.upcast()]);
        assert_eq!(b.globals(), &vec![f.upcast::<Node>()]);
        let program = b.build();
        let function = program.get(f);
        assert_eq!(program.symbols().name(function.name), "id");
        assert_eq!(program.get(function.body).statements.len(), 1);
    }

    #[test]
    #[should_panic(expected = "ProgramId mismatch")]
    fn foreign_child_is_fatal() {
        let mut a = ProgramBuilder::new();
        let mut b = ProgramBuilder::new();
        let one = a.int(1);
        let two = b.int(2);
        b.binary(BinaryOp::Add, one, two);
    }
}
