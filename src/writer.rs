//! Prints a program as WGSL.

use crate::ast::{
    AssignmentStatement, BinaryExpression, BlockStatement, CallExpression, Expression, Function,
    IdentifierExpression, IntLiteralExpression, Parameter, ReturnStatement, Statement, Variable,
    VariableDeclStatement,
};
use crate::castable::{switch, DefaultCase};
use crate::program::{Program, Ref};
use crate::symbol::Symbol;

const INDENT: &str = "  ";

/// Prints every module-scope declaration of `program`, in order.
pub fn write_program(program: &Program) -> String {
    let writer = Writer { program };
    program
        .globals()
        .iter()
        .map(|&global| {
            let node = program.node(global).as_castable();
            switch(
                node,
                (
                    |f: &Function| writer.function(f),
                    |v: &Variable| format!("{};\n", writer.variable(v)),
                    |_: DefaultCase| -> String {
                        crate::ice!("cannot write a {} at module scope", node.type_info())
                    },
                ),
            )
        })
        .collect()
}

struct Writer<'p> {
    program: &'p Program,
}

impl Writer<'_> {
    fn name(&self, symbol: Symbol) -> &str {
        self.program.symbols().name(symbol)
    }

    fn function(&self, function: &Function) -> String {
        let params: Vec<_> = function
            .params
            .iter()
            .map(|&p| self.parameter(self.program.get(p)))
            .collect();
        let mut out = format!("fn {}({})", self.name(function.name), params.join(", "));
        if let Some(ty) = function.return_type {
            out.push_str(" -> ");
            out.push_str(self.name(ty));
        }
        out.push(' ');
        out.push_str(&self.block(self.program.get(function.body), 0));
        out.push('\n');
        out
    }

    fn parameter(&self, parameter: &Parameter) -> String {
        format!("{}: {}", self.name(parameter.name()), self.name(parameter.ty()))
    }

    fn variable(&self, variable: &Variable) -> String {
        let mut out = format!("{} {}", variable.kind.keyword(), self.name(variable.name));
        if let Some(ty) = variable.ty {
            out.push_str(": ");
            out.push_str(self.name(ty));
        }
        if let Some(initializer) = variable.initializer {
            out.push_str(" = ");
            out.push_str(&self.expression(initializer));
        }
        out
    }

    fn block(&self, block: &BlockStatement, depth: usize) -> String {
        let mut out = String::from("{\n");
        for &statement in &block.statements {
            out.push_str(&INDENT.repeat(depth + 1));
            out.push_str(&self.statement(statement, depth + 1));
            out.push('\n');
        }
        out.push_str(&INDENT.repeat(depth));
        out.push('}');
        out
    }

    fn statement(&self, statement: Ref<Statement>, depth: usize) -> String {
        let node = self.program.node(statement).as_castable();
        switch(
            node,
            (
                |b: &BlockStatement| self.block(b, depth),
                |r: &ReturnStatement| match r.value {
                    Some(value) => format!("return {};", self.expression(value)),
                    None => "return;".to_string(),
                },
                |a: &AssignmentStatement| {
                    format!("{} = {};", self.expression(a.lhs), self.expression(a.rhs))
                },
                |d: &VariableDeclStatement| {
                    format!("{};", self.variable(self.program.get(d.variable)))
                },
                |_: DefaultCase| -> String {
                    crate::ice!("cannot write statement {}", node.type_info())
                },
            ),
        )
    }

    fn expression(&self, expression: Ref<Expression>) -> String {
        let node = self.program.node(expression).as_castable();
        switch(
            node,
            (
                |i: &IdentifierExpression| self.name(i.symbol).to_string(),
                |l: &IntLiteralExpression| l.value.to_string(),
                |b: &BinaryExpression| {
                    format!(
                        "{} {} {}",
                        self.operand(b.lhs),
                        b.op,
                        self.operand(b.rhs)
                    )
                },
                |c: &CallExpression| {
                    let args: Vec<_> = c.args.iter().map(|&a| self.expression(a)).collect();
                    format!("{}({})", self.name(c.target), args.join(", "))
                },
                |_: DefaultCase| -> String {
                    crate::ice!("cannot write expression {}", node.type_info())
                },
            ),
        )
    }

    /// Nested binary expressions are parenthesized.
    fn operand(&self, operand: Ref<Expression>) -> String {
        let text = self.expression(operand);
        if self.program.node(operand).as_castable().is::<BinaryExpression>() {
            format!("({text})")
        } else {
            text
        }
    }
}
