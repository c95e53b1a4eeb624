//! # Symbol Table
//!
//! Per-class and per-subroutine scopes (spec §3 "Symbol table"). Class
//! scope holds `Static`/`Field` entries and outlives every subroutine
//! parsed from the same class; subroutine scope holds `Argument`/`Local`
//! entries and is discarded at the end of each subroutine (spec §9
//! "Symbol-table lifetime").

use crate::parser::ast::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Static,
    Field,
    Argument,
    Local,
}

impl Segment {
    /// The VM segment a variable of this kind is pushed/popped through.
    /// `Field` maps to `this` — Jack fields live at `*THIS + index`, not
    /// in a segment of their own (spec §4.5 "Terms": "mapping field →
    /// this").
    pub fn vm_segment(self) -> &'static str {
        match self {
            Segment::Static => "static",
            Segment::Field => "this",
            Segment::Argument => "argument",
            Segment::Local => "local",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub var_type: Type,
    pub segment: Segment,
    pub index: u16,
}

#[derive(Debug, Default)]
pub struct ClassScope {
    entries: Vec<(String, SymbolEntry)>,
    static_count: u16,
    field_count: u16,
}

impl ClassScope {
    pub fn define(&mut self, name: &str, var_type: Type, kind: Segment) {
        let index = match kind {
            Segment::Static => {
                let i = self.static_count;
                self.static_count += 1;
                i
            }
            Segment::Field => {
                let i = self.field_count;
                self.field_count += 1;
                i
            }
            Segment::Argument | Segment::Local => unreachable!("class scope only holds static/field"),
        };
        self.entries.push((name.to_string(), SymbolEntry { var_type, segment: kind, index }));
    }

    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.iter().rev().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn field_count(&self) -> u16 {
        self.field_count
    }
}

#[derive(Debug, Default)]
pub struct SubroutineScope {
    entries: Vec<(String, SymbolEntry)>,
    argument_count: u16,
    local_count: u16,
}

impl SubroutineScope {
    pub fn define(&mut self, name: &str, var_type: Type, kind: Segment) {
        let index = match kind {
            Segment::Argument => {
                let i = self.argument_count;
                self.argument_count += 1;
                i
            }
            Segment::Local => {
                let i = self.local_count;
                self.local_count += 1;
                i
            }
            Segment::Static | Segment::Field => unreachable!("subroutine scope only holds argument/local"),
        };
        self.entries.push((name.to_string(), SymbolEntry { var_type, segment: kind, index }));
    }

    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.iter().rev().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn local_count(&self) -> u16 {
        self.local_count
    }
}

/// Resolves `name` against subroutine scope first, then class scope
/// (spec §3 invariant (i): "a lookup resolves subroutine scope first,
/// then class scope").
pub fn resolve<'a>(
    subroutine: &'a SubroutineScope,
    class: &'a ClassScope,
    name: &str,
) -> Option<&'a SymbolEntry> {
    subroutine.lookup(name).or_else(|| class.lookup(name))
}
