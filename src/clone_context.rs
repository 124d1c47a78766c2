//! Deep copies of programs, with rewrites applied on the way.
//!
//! A [`CloneContext`] copies nodes from a source [`Program`] into a destination
//! [`ProgramBuilder`]. Before cloning, a pass registers rules:
//!
//! - [`replace`](CloneContext::replace) swaps one node for another,
//! - [`replace_all`](CloneContext::replace_all) rewrites every node of a type,
//! - [`replace_all_symbols`](CloneContext::replace_all_symbols) renames symbols,
//! - the list edits ([`remove`](CloneContext::remove), the `insert_*` family) change
//!   the elements of one particular list.
//!
//! ```
//! use wgsl_rewriter::ast::{BinaryOp, IntLiteralExpression};
//! use wgsl_rewriter::clone_context::CloneContext;
//! use wgsl_rewriter::program::ProgramBuilder;
//! use wgsl_rewriter::writer::write_program;
//!
//! let mut b = ProgramBuilder::new();
//! let (one, two) = (b.int(1), b.int(2));
//! let sum = b.binary(BinaryOp::Add, one, two);
//! b.global_const("x", Some("i32"), sum);
//! let src = b.build();
//!
//! let mut dst = ProgramBuilder::new();
//! let mut ctx = CloneContext::new(&mut dst, &src);
//! ctx.replace_all(|ctx, literal: &IntLiteralExpression| {
//!     Some(ctx.dst().int(literal.value * 10).erase())
//! });
//! ctx.clone_program();
//! drop(ctx);
//! assert_eq!(write_program(&dst.build()), "const x: i32 = 10 + 20;\n");
//! ```

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::castable::{Castable, Kind, TypeInfo};
use crate::program::{AnyRef, NodeKey, Program, ProgramBuilder, Ref};
use crate::program_id::assert_same_program_if_valid;
use crate::symbol::{Symbol, SymbolTable};

/// A node that can copy itself into another program.
pub trait Cloneable: Castable {
    /// Creates a copy of this node in `ctx.dst()`, cloning children through `ctx`.
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> AnyRef;

    /// Calls `f` with every node this node refers to.
    fn for_each_ref(&self, _f: &mut dyn FnMut(AnyRef)) {}
}

#[derive(Debug, Clone, Copy)]
pub struct CloneOptions {
    /// Clone every source symbol, in order, when the context is created.
    /// Symbol names then stay the same, and a symbol transform only sees symbols that
    /// were not cloned up front.
    pub auto_clone_symbols: bool,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            auto_clone_symbols: true,
        }
    }
}

type Builder<'a> = Rc<dyn Fn(&mut CloneContext<'a>) -> AnyRef + 'a>;

type Handler<'a> = Rc<dyn Fn(&mut CloneContext<'a>, &'a dyn Cloneable) -> Option<AnyRef> + 'a>;

type SymbolTransform<'a> = Box<dyn FnMut(&str, &mut SymbolTable) -> Symbol + 'a>;

struct TypeTransform<'a> {
    ty: &'static TypeInfo,
    handler: Handler<'a>,
}

#[derive(Default)]
struct ListTransforms<'a> {
    remove: HashSet<NodeKey>,
    insert_front: Vec<Builder<'a>>,
    insert_back: Vec<Builder<'a>>,
    insert_before: HashMap<NodeKey, Vec<Builder<'a>>>,
    insert_after: HashMap<NodeKey, Vec<Builder<'a>>>,
}

/// Clones nodes and symbols from `src` into `dst`.
pub struct CloneContext<'a> {
    dst: &'a mut ProgramBuilder,
    src: &'a Program,
    replacements: HashMap<NodeKey, Builder<'a>>,
    transforms: Vec<TypeTransform<'a>>,
    list_transforms: HashMap<usize, ListTransforms<'a>>,
    cloned_symbols: HashMap<Symbol, Symbol>,
    symbol_transform: Option<SymbolTransform<'a>>,
}

/// Lists are identified by the address of the `Vec` itself, not of its buffer.
#[allow(clippy::ptr_arg)]
fn list_id<T>(list: &Vec<T>) -> usize {
    list as *const Vec<T> as usize
}

#[allow(clippy::ptr_arg)]
fn contains<T: ?Sized>(list: &Vec<Ref<T>>, key: NodeKey) -> bool {
    list.iter().any(|item| item.key() == key)
}

impl<'a> CloneContext<'a> {
    pub fn new(dst: &'a mut ProgramBuilder, src: &'a Program) -> Self {
        Self::with_options(dst, src, CloneOptions::default())
    }

    pub fn with_options(
        dst: &'a mut ProgramBuilder,
        src: &'a Program,
        options: CloneOptions,
    ) -> Self {
        let mut ctx = Self {
            dst,
            src,
            replacements: HashMap::new(),
            transforms: Vec::new(),
            list_transforms: HashMap::new(),
            cloned_symbols: HashMap::new(),
            symbol_transform: None,
        };
        if options.auto_clone_symbols {
            for (symbol, _) in src.symbols().iter() {
                ctx.clone_symbol(symbol);
            }
        }
        ctx
    }

    pub fn src(&self) -> &'a Program {
        self.src
    }

    pub fn dst(&mut self) -> &mut ProgramBuilder {
        self.dst
    }

    /// Clones `node`, applying the registered rules.
    ///
    /// An exact replacement wins over a `replace_all` handler, which wins over the
    /// node's own [`Cloneable::clone_node`].
    #[track_caller]
    pub fn clone_ref<T: Kind>(&mut self, node: Ref<T>) -> Ref<T> {
        let cloned = self.clone_any(node.erase());
        self.checked_cast(cloned)
    }

    #[track_caller]
    pub fn clone_opt<T: Kind>(&mut self, node: Option<Ref<T>>) -> Option<Ref<T>> {
        node.map(|node| self.clone_ref(node))
    }

    /// [`clone_ref`](Self::clone_ref) for a node of unknown type.
    #[track_caller]
    pub fn clone_any(&mut self, node: AnyRef) -> AnyRef {
        let src = self.src;
        assert_same_program_if_valid(src.id(), node);

        let cloned = if let Some(builder) = self.replacements.get(&node.key()).cloned() {
            builder(self)
        } else {
            let object = src.node(node);
            #[cfg(feature = "trace")]
            tracing::trace!(?node, ty = %object.type_info(), "clone");
            match self.handler_for(object) {
                Some(handler) => match handler(self, object) {
                    Some(replacement) => replacement,
                    None => object.clone_node(self),
                },
                None => object.clone_node(self),
            }
        };

        assert_same_program_if_valid(self.dst.id(), cloned);
        cloned
    }

    /// Clones `node` with its own [`Cloneable::clone_node`], ignoring `replace` and
    /// `replace_all` rules for `node` itself. Its children are cloned normally.
    #[track_caller]
    pub fn clone_without_transform<T: Kind>(&mut self, node: Ref<T>) -> Ref<T> {
        let src = self.src;
        assert_same_program_if_valid(src.id(), node);
        let cloned = src.node(node).clone_node(self);
        self.checked_cast(cloned)
    }

    /// Clones every element of `list`, applying the list edits registered for it.
    #[track_caller]
    #[allow(clippy::ptr_arg)]
    pub fn clone_list<T: Kind>(&mut self, list: &Vec<Ref<T>>) -> Vec<Ref<T>> {
        let id = list_id(list);
        let mut out = Vec::with_capacity(list.len());

        let front = self.builders(id, |t| Some(&t.insert_front));
        self.build_into(front, &mut out);
        for &item in list {
            let key = item.key();
            let before = self.builders(id, |t| t.insert_before.get(&key));
            self.build_into(before, &mut out);
            let removed = self
                .list_transforms
                .get(&id)
                .is_some_and(|t| t.remove.contains(&key));
            if !removed {
                out.push(self.clone_ref(item));
            }
            // Cloning `item` may have registered more edits for this list.
            let after = self.builders(id, |t| t.insert_after.get(&key));
            self.build_into(after, &mut out);
        }
        let back = self.builders(id, |t| Some(&t.insert_back));
        self.build_into(back, &mut out);
        out
    }

    /// Returns the `dst` symbol for a `src` symbol, creating it on first use.
    #[track_caller]
    pub fn clone_symbol(&mut self, symbol: Symbol) -> Symbol {
        assert_same_program_if_valid(self.src.id(), symbol);
        if let Some(&cloned) = self.cloned_symbols.get(&symbol) {
            return cloned;
        }
        let src = self.src;
        let name = src.symbols().name(symbol);
        let cloned = match self.symbol_transform.as_mut() {
            Some(transform) => transform(name, self.dst.symbols_mut()),
            None => self.dst.symbols_mut().new_symbol(name),
        };
        assert_same_program_if_valid(self.dst.id(), cloned);
        self.cloned_symbols.insert(symbol, cloned);
        cloned
    }

    /// Clones the module-scope declarations of `src` into `dst`.
    #[tracing::instrument(level = "debug", skip(self), fields(src = %self.src.id(), dst = %self.dst.id()))]
    pub fn clone_program(&mut self) {
        let src = self.src;
        for global in self.clone_list(src.globals()) {
            self.dst.add_global(global);
        }
    }

    /// Every clone of `what` yields `with`, a node of `dst`.
    #[track_caller]
    pub fn replace<T: ?Sized, U: ?Sized>(&mut self, what: Ref<T>, with: Ref<U>) -> &mut Self {
        assert_same_program_if_valid(self.dst.id(), with);
        let with = with.erase();
        self.replace_with(what, move |_| with)
    }

    /// Every clone of `what` yields a node built by `builder`. The builder runs once per
    /// clone of `what`, and never if `what` isn't cloned.
    #[track_caller]
    pub fn replace_with<T: ?Sized>(
        &mut self,
        what: Ref<T>,
        builder: impl Fn(&mut CloneContext<'a>) -> AnyRef + 'a,
    ) -> &mut Self {
        assert_same_program_if_valid(self.src.id(), what);
        tracing::debug!(node = ?what, "registered replacement");
        self.replacements.insert(what.key(), Rc::new(builder));
        self
    }

    /// Calls `handler` to clone every node that is, or derives from, `T`.
    ///
    /// If the handler returns `None`, the node is cloned as usual. Registering handlers
    /// for two types where one derives from the other is an internal compiler error.
    #[track_caller]
    pub fn replace_all<T, F>(&mut self, handler: F) -> &mut Self
    where
        T: Kind,
        F: Fn(&mut CloneContext<'a>, &'a T) -> Option<AnyRef> + 'a,
    {
        if let Some(existing) = self
            .transforms
            .iter()
            .find(|t| t.ty.is(T::INFO) || T::INFO.is(t.ty))
        {
            crate::ice!(
                "replace_all() called with a handler for type {} that is already handled by a handler for type {}",
                T::INFO,
                existing.ty
            );
        }
        tracing::debug!(ty = %T::INFO, "registered replace_all handler");
        self.transforms.push(TypeTransform {
            ty: T::INFO,
            handler: Rc::new(move |ctx: &mut CloneContext<'a>, object: &'a dyn Cloneable| {
                let object = object.as_castable().cast::<T>()?;
                handler(ctx, object)
            }),
        });
        self
    }

    /// Calls `transform` with the name of every `src` symbol that gets cloned, and the
    /// `dst` symbol table. Only one symbol transform may be registered.
    #[track_caller]
    pub fn replace_all_symbols(
        &mut self,
        transform: impl FnMut(&str, &mut SymbolTable) -> Symbol + 'a,
    ) -> &mut Self {
        if self.symbol_transform.is_some() {
            crate::ice!("replace_all_symbols() called multiple times on the same CloneContext");
        }
        self.symbol_transform = Some(Box::new(transform));
        self
    }

    /// Leaves `item` out of the clone of `list`.
    #[track_caller]
    #[allow(clippy::ptr_arg)]
    pub fn remove<T: ?Sized, U: ?Sized>(&mut self, list: &Vec<Ref<T>>, item: Ref<U>) -> &mut Self {
        assert_same_program_if_valid(self.src.id(), item);
        if !contains(list, item.key()) {
            crate::ice!("CloneContext::remove() list does not contain {item:?}");
        }
        self.list(list).remove.insert(item.key());
        self
    }

    /// Inserts `node`, a node of `dst`, at the front of the clone of `list`.
    #[track_caller]
    #[allow(clippy::ptr_arg)]
    pub fn insert_front<T: ?Sized, U: ?Sized>(&mut self, list: &Vec<Ref<T>>, node: Ref<U>) -> &mut Self {
        let node = self.dst_node(node);
        self.insert_front_with(list, move |_| node)
    }

    #[allow(clippy::ptr_arg)]
    pub fn insert_front_with<T: ?Sized>(
        &mut self,
        list: &Vec<Ref<T>>,
        builder: impl Fn(&mut CloneContext<'a>) -> AnyRef + 'a,
    ) -> &mut Self {
        self.list(list).insert_front.push(Rc::new(builder));
        self
    }

    /// Inserts `node`, a node of `dst`, at the back of the clone of `list`.
    #[track_caller]
    #[allow(clippy::ptr_arg)]
    pub fn insert_back<T: ?Sized, U: ?Sized>(&mut self, list: &Vec<Ref<T>>, node: Ref<U>) -> &mut Self {
        let node = self.dst_node(node);
        self.insert_back_with(list, move |_| node)
    }

    #[allow(clippy::ptr_arg)]
    pub fn insert_back_with<T: ?Sized>(
        &mut self,
        list: &Vec<Ref<T>>,
        builder: impl Fn(&mut CloneContext<'a>) -> AnyRef + 'a,
    ) -> &mut Self {
        self.list(list).insert_back.push(Rc::new(builder));
        self
    }

    /// Inserts `node`, a node of `dst`, before every clone of `before` in `list`.
    #[track_caller]
    #[allow(clippy::ptr_arg)]
    pub fn insert_before<T: ?Sized, B: ?Sized, U: ?Sized>(
        &mut self,
        list: &Vec<Ref<T>>,
        before: Ref<B>,
        node: Ref<U>,
    ) -> &mut Self {
        let node = self.dst_node(node);
        self.insert_before_with(list, before, move |_| node)
    }

    #[track_caller]
    #[allow(clippy::ptr_arg)]
    pub fn insert_before_with<T: ?Sized, B: ?Sized>(
        &mut self,
        list: &Vec<Ref<T>>,
        before: Ref<B>,
        builder: impl Fn(&mut CloneContext<'a>) -> AnyRef + 'a,
    ) -> &mut Self {
        let key = self.anchor(list, before, "insert_before");
        self.list(list)
            .insert_before
            .entry(key)
            .or_default()
            .push(Rc::new(builder));
        self
    }

    /// Inserts `node`, a node of `dst`, after every clone of `after` in `list`.
    #[track_caller]
    #[allow(clippy::ptr_arg)]
    pub fn insert_after<T: ?Sized, A: ?Sized, U: ?Sized>(
        &mut self,
        list: &Vec<Ref<T>>,
        after: Ref<A>,
        node: Ref<U>,
    ) -> &mut Self {
        let node = self.dst_node(node);
        self.insert_after_with(list, after, move |_| node)
    }

    #[track_caller]
    #[allow(clippy::ptr_arg)]
    pub fn insert_after_with<T: ?Sized, A: ?Sized>(
        &mut self,
        list: &Vec<Ref<T>>,
        after: Ref<A>,
        builder: impl Fn(&mut CloneContext<'a>) -> AnyRef + 'a,
    ) -> &mut Self {
        let key = self.anchor(list, after, "insert_after");
        self.list(list)
            .insert_after
            .entry(key)
            .or_default()
            .push(Rc::new(builder));
        self
    }

    #[allow(clippy::ptr_arg)]
    fn list<T>(&mut self, list: &Vec<T>) -> &mut ListTransforms<'a> {
        self.list_transforms.entry(list_id(list)).or_default()
    }

    #[track_caller]
    #[allow(clippy::ptr_arg)]
    fn anchor<T: ?Sized, A: ?Sized>(&self, list: &Vec<Ref<T>>, anchor: Ref<A>, op: &str) -> NodeKey {
        assert_same_program_if_valid(self.src.id(), anchor);
        if !contains(list, anchor.key()) {
            crate::ice!("CloneContext::{op}() list does not contain {anchor:?}");
        }
        anchor.key()
    }

    #[track_caller]
    fn dst_node<U: ?Sized>(&self, node: Ref<U>) -> AnyRef {
        assert_same_program_if_valid(self.dst.id(), node);
        node.erase()
    }

    fn handler_for(&self, object: &dyn Cloneable) -> Option<Handler<'a>> {
        let ty = object.type_info();
        self.transforms
            .iter()
            .find(|t| ty.is(t.ty))
            .map(|t| t.handler.clone())
    }

    fn builders(
        &self,
        id: usize,
        pick: impl for<'x> FnOnce(&'x ListTransforms<'a>) -> Option<&'x Vec<Builder<'a>>>,
    ) -> Vec<Builder<'a>> {
        self.list_transforms
            .get(&id)
            .and_then(pick)
            .cloned()
            .unwrap_or_default()
    }

    #[track_caller]
    fn build_into<T: Kind>(&mut self, builders: Vec<Builder<'a>>, out: &mut Vec<Ref<T>>) {
        for builder in builders {
            let node = builder(self);
            out.push(self.checked_cast(node));
        }
    }

    /// Narrows a freshly cloned node, which must be a `T`.
    #[track_caller]
    fn checked_cast<T: Kind>(&self, node: AnyRef) -> Ref<T> {
        let object = self.dst.node(node);
        if !object.as_castable().is::<T>() {
            crate::ice!(
                "cloned node is a {}, expected a {}",
                object.type_info(),
                T::INFO
            );
        }
        node.retype()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        BinaryOp, BlockStatement, Expression, IdentifierExpression, IntLiteralExpression, Node,
        Statement,
    };
    use crate::span::Span;
    use crate::writer::write_program;

    /// `fn f() { a = 1; b = 2; c = 3; }` with the statements of the body.
    fn three_statements() -> (Program, Ref<BlockStatement>, Vec<Ref<Statement>>) {
        let mut b = ProgramBuilder::new();
        let statements: Vec<Ref<Statement>> = [("a", 1), ("b", 2), ("c", 3)]
            .into_iter()
            .map(|(name, value)| {
                let lhs = b.ident(name);
                let rhs = b.int(value);
                b.assign(lhs, rhs).upcast()
            })
            .collect();
        let f = b.func("f", vec![], None, statements.clone());
        let body = b.get(f).body;
        (b.build(), body, statements)
    }

    #[test]
    fn clone_without_rules() {
        let (src, _, _) = three_statements();
        let mut dst = ProgramBuilder::new();
        CloneContext::new(&mut dst, &src).clone_program();
        let dst = dst.build();
        assert_eq!(write_program(&dst), write_program(&src));
        assert_eq!(dst.len(), src.len());
        assert_ne!(dst.id(), src.id());
    }

    #[test]
    fn insert_before_and_after() {
        let (src, body, statements) = three_statements();
        let list = &src.get(body).statements;
        let mut dst = ProgramBuilder::new();
        let x = dst.ident("x");
        let zero = dst.int(0);
        let insert_x = dst.assign(x, zero);
        let mut ctx = CloneContext::new(&mut dst, &src);
        ctx.insert_before(list, statements[1], insert_x)
            .insert_after_with(list, statements[1], |ctx| {
                let y = ctx.dst().ident("y");
                let zero = ctx.dst().int(0);
                ctx.dst().assign(y, zero).erase()
            });
        ctx.clone_program();
        drop(ctx);
        let text = write_program(&dst.build());
        assert_eq!(
            text,
            "fn f() {\n  a = 1;\n  x = 0;\n  b = 2;\n  y = 0;\n  c = 3;\n}\n"
        );
    }

    #[test]
    fn front_back_and_remove() {
        let (src, body, statements) = three_statements();
        let list = &src.get(body).statements;
        let mut dst = ProgramBuilder::new();
        let mut ctx = CloneContext::new(&mut dst, &src);
        ctx.remove(list, statements[0])
            .insert_front_with(list, |ctx| {
                let value = ctx.dst().int(7);
                ctx.dst().ret(Some(value)).erase()
            })
            .insert_back_with(list, |ctx| ctx.dst().ret(None::<Ref<Expression>>).erase());
        ctx.clone_program();
        drop(ctx);
        let text = write_program(&dst.build());
        assert_eq!(
            text,
            "fn f() {\n  return 7;\n  b = 2;\n  c = 3;\n  return;\n}\n"
        );
    }

    #[test]
    fn replace_beats_replace_all() {
        let (src, _, statements) = three_statements();
        let second = src.get::<crate::ast::AssignmentStatement>(statements[1].retype());
        let mut dst = ProgramBuilder::new();
        let mut ctx = CloneContext::new(&mut dst, &src);
        ctx.replace_all(|ctx, literal: &IntLiteralExpression| {
            Some(ctx.dst().int(-literal.value).erase())
        })
        .replace_with(second.rhs, |ctx| ctx.dst().int(42).erase());
        ctx.clone_program();
        drop(ctx);
        let text = write_program(&dst.build());
        assert_eq!(text, "fn f() {\n  a = -1;\n  b = 42;\n  c = -3;\n}\n");
    }

    #[test]
    fn replace_all_falls_back_on_none() {
        let (src, _, _) = three_statements();
        let mut dst = ProgramBuilder::new();
        let mut ctx = CloneContext::new(&mut dst, &src);
        ctx.replace_all(|ctx, literal: &IntLiteralExpression| {
            (literal.value == 2).then(|| ctx.dst().int(20).erase())
        });
        ctx.clone_program();
        drop(ctx);
        let text = write_program(&dst.build());
        assert_eq!(text, "fn f() {\n  a = 1;\n  b = 20;\n  c = 3;\n}\n");
    }

    #[test]
    fn replace_all_on_base_type() {
        let (src, _, _) = three_statements();
        let mut dst = ProgramBuilder::new();
        let mut ctx = CloneContext::new(&mut dst, &src);
        ctx.replace_all(|ctx, _: &Expression| Some(ctx.dst().ident("z").erase()));
        ctx.clone_program();
        drop(ctx);
        let text = write_program(&dst.build());
        assert_eq!(text, "fn f() {\n  z = z;\n  z = z;\n  z = z;\n}\n");
    }

    #[test]
    fn clone_without_transform_skips_own_rule() {
        let mut b = ProgramBuilder::new();
        let one = b.int(1);
        let src = b.build();
        let mut dst = ProgramBuilder::new();
        let mut ctx = CloneContext::new(&mut dst, &src);
        ctx.replace_all(|ctx, _: &IntLiteralExpression| Some(ctx.dst().int(2).erase()));
        let replaced = ctx.clone_ref(one);
        let plain = ctx.clone_without_transform(one);
        drop(ctx);
        assert_eq!(dst.get(replaced).value, 2);
        assert_eq!(dst.get(plain).value, 1);
    }

    #[test]
    fn symbols_are_cloned_in_order() {
        let mut b = ProgramBuilder::new();
        b.sym("first");
        b.sym("second");
        let src = b.build();
        let mut dst = ProgramBuilder::new();
        dst.sym("second");
        CloneContext::new(&mut dst, &src);
        let names: Vec<_> = dst.symbols().iter().map(|(_, name)| name.to_string()).collect();
        assert_eq!(names, ["second", "first", "second_1"]);
    }

    #[test]
    fn symbol_transform() {
        let mut b = ProgramBuilder::new();
        let x = b.ident("x");
        let src = b.build();
        let mut dst = ProgramBuilder::new();
        let options = CloneOptions {
            auto_clone_symbols: false,
        };
        let mut ctx = CloneContext::with_options(&mut dst, &src, options);
        ctx.replace_all_symbols(|name, symbols| symbols.register(&format!("renamed_{name}")));
        let cloned = ctx.clone_ref(x);
        drop(ctx);
        let symbol = dst.get(cloned).symbol;
        assert_eq!(dst.symbols().name(symbol), "renamed_x");
    }

    #[test]
    fn cloned_node_keeps_span() {
        let mut b = ProgramBuilder::new();
        let symbol = b.sym("x");
        let x = b.create(IdentifierExpression::new(Span::new(3, 4), symbol));
        let src = b.build();
        let mut dst = ProgramBuilder::new();
        let cloned = CloneContext::new(&mut dst, &src).clone_ref(x);
        assert_eq!(Node::of(dst.get(cloned)).span, Span::new(3, 4));
    }

    #[test]
    #[should_panic(expected = "already handled by a handler for type Expression")]
    fn related_replace_all_is_fatal() {
        let src = ProgramBuilder::new().build();
        let mut dst = ProgramBuilder::new();
        let mut ctx = CloneContext::new(&mut dst, &src);
        ctx.replace_all(|_, _: &Expression| None);
        ctx.replace_all(|_, _: &IntLiteralExpression| None);
    }

    #[test]
    #[should_panic(expected = "called multiple times")]
    fn second_symbol_transform_is_fatal() {
        let src = ProgramBuilder::new().build();
        let mut dst = ProgramBuilder::new();
        let mut ctx = CloneContext::new(&mut dst, &src);
        ctx.replace_all_symbols(|name, symbols| symbols.register(name));
        ctx.replace_all_symbols(|name, symbols| symbols.register(name));
    }

    #[test]
    #[should_panic(expected = "ProgramId mismatch")]
    fn foreign_node_is_fatal() {
        let mut other = ProgramBuilder::new();
        let one = other.int(1);
        let src = ProgramBuilder::new().build();
        let mut dst = ProgramBuilder::new();
        CloneContext::new(&mut dst, &src).clone_ref(one);
    }

    #[test]
    #[should_panic(expected = "remove() list does not contain")]
    fn remove_absent_is_fatal() {
        let (src, body, _) = three_statements();
        let mut dst = ProgramBuilder::new();
        let mut ctx = CloneContext::new(&mut dst, &src);
        // The block is not one of its own statements.
        ctx.remove(&src.get(body).statements, body);
    }

    #[test]
    #[should_panic(expected = "cloned node is a IdentifierExpression, expected a IntLiteralExpression")]
    fn replacement_of_wrong_type_is_fatal() {
        let mut b = ProgramBuilder::new();
        let one = b.int(1);
        let src = b.build();
        let mut dst = ProgramBuilder::new();
        let mut ctx = CloneContext::new(&mut dst, &src);
        ctx.replace_with(one, |ctx| ctx.dst().ident("x").erase());
        ctx.clone_ref(one);
    }

    #[test]
    fn unrelated_handlers_coexist() {
        let mut b = ProgramBuilder::new();
        let x = b.ident("x");
        let one = b.int(1);
        let sum = b.binary(BinaryOp::Add, x, one);
        let src = b.build();
        let mut dst = ProgramBuilder::new();
        let mut ctx = CloneContext::new(&mut dst, &src);
        ctx.replace_all(|ctx, _: &IntLiteralExpression| Some(ctx.dst().int(5).erase()))
            .replace_all(|ctx, _: &IdentifierExpression| Some(ctx.dst().ident("y").erase()));
        let cloned = ctx.clone_ref(sum);
        drop(ctx);
        let cloned = dst.get(cloned);
        assert!(dst.try_get::<IdentifierExpression, _>(cloned.lhs).is_some());
        assert_eq!(dst.try_get::<IntLiteralExpression, _>(cloned.rhs).map(|l| l.value), Some(5));
    }
}
