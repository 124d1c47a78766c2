//! Interned identifiers.

use indexmap::IndexSet;

use crate::program_id::{assert_program_ids_equal, ProgramId, ProgramIdOf};

/// An interned name, owned by one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    id: u32,
    program: ProgramId,
}

impl Symbol {
    pub fn id(self) -> u32 {
        self.id
    }
}

impl ProgramIdOf for Symbol {
    fn program_id(&self) -> ProgramId {
        self.program
    }
}

/// Checks WGSL identifier syntax: `_` alone and a leading `__` are reserved.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some('_') => {
            let rest = chars.as_str();
            !rest.is_empty()
                && !rest.starts_with('_')
                && rest.chars().all(unicode_ident::is_xid_continue)
        }
        Some(c) if unicode_ident::is_xid_start(c) => chars.all(unicode_ident::is_xid_continue),
        _ => false,
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    program: ProgramId,
    names: IndexSet<String>,
}

impl SymbolTable {
    pub fn new(program: ProgramId) -> Self {
        Self {
            program,
            names: IndexSet::new(),
        }
    }

    /// Returns the symbol for `name`, interning it on first use.
    #[track_caller]
    pub fn register(&mut self, name: &str) -> Symbol {
        if let Some(symbol) = self.get(name) {
            return symbol;
        }
        if !is_identifier(name) {
            crate::ice!("'{name}' is not a valid identifier");
        }
        let (index, _) = self.names.insert_full(name.to_string());
        self.symbol(index)
    }

    /// Returns a symbol with a name not used yet: `prefix`, or `prefix` with a `_N` suffix.
    #[track_caller]
    pub fn new_symbol(&mut self, prefix: &str) -> Symbol {
        if !self.names.contains(prefix) {
            return self.register(prefix);
        }
        let mut suffix = 1usize;
        loop {
            let name = format!("{prefix}_{suffix}");
            if !self.names.contains(&name) {
                return self.register(&name);
            }
            suffix += 1;
        }
    }

    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.names.get_index_of(name).map(|index| self.symbol(index))
    }

    #[track_caller]
    pub fn name(&self, symbol: Symbol) -> &str {
        assert_program_ids_equal(self.program, symbol.program, false);
        match self.names.get_index(symbol.id as usize) {
            Some(name) => name,
            None => crate::ice!("symbol {} is not in the table", symbol.id),
        }
    }

    /// All symbols, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| (self.symbol(index), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn symbol(&self, index: usize) -> Symbol {
        Symbol {
            id: index as u32,
            program: self.program,
        }
    }
}

impl ProgramIdOf for SymbolTable {
    fn program_id(&self) -> ProgramId {
        self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        for name in ["a", "_a", "main", "x_1", "Δt", "a__b"] {
            assert!(is_identifier(name), "{name}");
        }
        for name in ["", "_", "__a", "1a", "a-b", "a b"] {
            assert!(!is_identifier(name), "{name}");
        }
    }

    #[test]
    fn register_interns() {
        let mut table = SymbolTable::new(ProgramId::new());
        let a = table.register("a");
        let b = table.register("b");
        assert_eq!(table.register("a"), a);
        assert_ne!(a, b);
        assert_eq!(table.name(b), "b");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("b"), Some(b));
        assert_eq!(table.get("c"), None);
    }

    #[test]
    fn new_symbol_is_unique() {
        let mut table = SymbolTable::new(ProgramId::new());
        let x = table.new_symbol("x");
        let x1 = table.new_symbol("x");
        table.register("x_2");
        let x3 = table.new_symbol("x");
        assert_eq!(table.name(x), "x");
        assert_eq!(table.name(x1), "x_1");
        assert_eq!(table.name(x3), "x_3");
        let names: Vec<_> = table.iter().map(|(_, name)| name).collect();
        assert_eq!(names, ["x", "x_1", "x_2", "x_3"]);
    }

    #[test]
    #[should_panic(expected = "not a valid identifier")]
    fn invalid_name_is_fatal() {
        SymbolTable::new(ProgramId::new()).register("1x");
    }

    #[test]
    #[should_panic(expected = "ProgramId mismatch")]
    fn foreign_symbol_is_fatal() {
        let mut a = SymbolTable::new(ProgramId::new());
        let b = SymbolTable::new(ProgramId::new());
        let symbol = a.register("x");
        b.name(symbol);
    }
}
