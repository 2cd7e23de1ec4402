//! Lexical scopes and name resolution.

use luma_diagnostic::CompilationFailure;
use luma_ir::{AsmBlock, SyntaxNode, VarId, VoidNode, ENV_NAME};
use rustc_hash::FxHashMap;

use super::Flattener;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(super) enum ScopeKind {
    /// Function body, including the main chunk. Locals of enclosing scopes
    /// are upvalues from here on.
    Function { varargs: bool },
    /// Body of a loop; `break` is valid inside.
    Loop,
    /// Any other block: `do`, conditional arms, short-circuit branches.
    Block,
}

pub(super) struct Scope {
    kind: ScopeKind,
    locals: FxHashMap<String, VarId>,
}

impl Flattener<'_> {
    pub(super) fn push_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope {
            kind,
            locals: FxHashMap::default(),
        });
    }

    pub(super) fn pop_scope(&mut self) -> FxHashMap<String, VarId> {
        self.scopes.pop().map(|scope| scope.locals).unwrap_or_default()
    }

    /// Run `f` in a fresh scope and wrap the statements it produces into a
    /// block carrying the scope's locals.
    pub(super) fn scoped(
        &mut self,
        kind: ScopeKind,
        f: impl FnOnce(&mut Self, &mut Vec<VoidNode>) -> Result<(), CompilationFailure>,
    ) -> Result<AsmBlock, CompilationFailure> {
        self.push_scope(kind);
        let mut steps = Vec::new();
        let result = f(self, &mut steps);
        let locals = self.pop_scope();
        result.map(|()| AsmBlock::new(steps, locals))
    }

    /// Lower the statements of a `Chunk` node in a fresh scope.
    pub(super) fn flatten_block(
        &mut self,
        chunk: &SyntaxNode,
        kind: ScopeKind,
    ) -> Result<AsmBlock, CompilationFailure> {
        self.scoped(kind, |this, steps| this.flatten_statements(chunk, steps))
    }

    /// Add an initialized-later local to the innermost scope.
    pub(super) fn declare(&mut self, name: &str) -> VarId {
        let id = self.vars.declare_local(name);
        if let Some(scope) = self.scopes.last_mut() {
            scope.locals.insert(name.to_owned(), id);
        }
        id
    }

    /// Resolve `name` against the scope chain.
    ///
    /// A local found beyond a function boundary is promoted to an upvalue.
    /// Names found nowhere are globals, except `_ENV` which always resolves
    /// to the unit's environment upvalue.
    pub(super) fn resolve(&mut self, name: &str) -> VarId {
        let mut crossed_function = false;
        let mut found = None;
        for scope in self.scopes.iter().rev() {
            if let Some(&id) = scope.locals.get(name) {
                found = Some(id);
                break;
            }
            if matches!(scope.kind, ScopeKind::Function { .. }) {
                crossed_function = true;
            }
        }

        match found {
            Some(id) => {
                if crossed_function {
                    self.vars.promote_to_upvalue(id);
                }
                id
            }
            None if name == ENV_NAME => self.vars.env(),
            None => self.vars.global(name),
        }
    }

    /// Whether `break` has a loop to leave without crossing a function.
    pub(super) fn in_loop(&self) -> bool {
        for scope in self.scopes.iter().rev() {
            match scope.kind {
                ScopeKind::Loop => return true,
                ScopeKind::Function { .. } => return false,
                ScopeKind::Block => {}
            }
        }
        false
    }

    /// Whether `...` is usable here.
    pub(super) fn varargs_in_scope(&self) -> bool {
        let own = self.scopes.iter().rev().find_map(|scope| match scope.kind {
            ScopeKind::Function { varargs } => Some(varargs),
            ScopeKind::Loop | ScopeKind::Block => None,
        });
        match own {
            Some(true) => true,
            Some(false) => {
                self.options.allow_upvalue_varargs
                    && self
                        .scopes
                        .iter()
                        .any(|scope| scope.kind == ScopeKind::Function { varargs: true })
            }
            None => false,
        }
    }
}
