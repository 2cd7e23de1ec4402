//! Declared variables and the per-unit arena that owns them.
//!
//! IR nodes refer to variables through [`VarId`] handles. The record behind
//! a handle keeps mutating while its scope is being lowered (more write
//! sites, upvalue promotion) and is read-only afterwards.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{CombinedType, StaticType, TypeSource};

/// Name of the implicit upvalue holding the global table.
pub const ENV_NAME: &str = "_ENV";

/// Index into a [`VariableArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct VarId(u32);

impl VarId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        VarId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarId({})", self.0)
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// How generated code reaches a variable.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VariableMode {
    Local,
    /// Captured by a nested function.
    Upvalue,
    /// Field of `_ENV`.
    Global,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum WriteState {
    Uninitialized,
    /// Written exactly once.
    Final,
    /// Written more than once.
    NonFinal,
}

#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum VariableError {
    #[error("type of `{0}` queried before initialization")]
    TypeQueryBeforeInit(String),
    #[error("global `{0}` has no write tracking")]
    GlobalWrite(String),
    #[error("global `{0}` cannot become an upvalue")]
    GlobalPromotion(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableInfo {
    name: String,
    mode: VariableMode,
    state: WriteState,
    ty: CombinedType,
}

impl VariableInfo {
    fn new(name: String, mode: VariableMode) -> Self {
        VariableInfo {
            name,
            mode,
            state: WriteState::Uninitialized,
            ty: CombinedType::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> VariableMode {
        self.mode
    }

    pub fn state(&self) -> WriteState {
        self.state
    }

    pub fn is_global(&self) -> bool {
        self.mode == VariableMode::Global
    }

    pub fn is_upvalue(&self) -> bool {
        self.mode == VariableMode::Upvalue
    }

    /// Globals are never final.
    pub fn is_final(&self) -> bool {
        !self.is_global() && self.state == WriteState::Final
    }

    pub fn is_initialized(&self) -> bool {
        self.is_global() || self.state != WriteState::Uninitialized
    }
}

/// Owns every variable of one compilation unit.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableArena {
    vars: Vec<VariableInfo>,
    globals: FxHashMap<String, VarId>,
    env: VarId,
}

impl Default for VariableArena {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableArena {
    /// Create an arena holding only the `_ENV` upvalue.
    pub fn new() -> Self {
        let mut env = VariableInfo::new(ENV_NAME.to_owned(), VariableMode::Upvalue);
        env.state = WriteState::Final;
        env.ty.add(StaticType::Table);
        VariableArena {
            vars: vec![env],
            globals: FxHashMap::default(),
            env: VarId::new(0),
        }
    }

    fn push(&mut self, info: VariableInfo) -> VarId {
        let index = u32::try_from(self.vars.len())
            .unwrap_or_else(|_| panic!("internal compiler error: variable arena overflow"));
        self.vars.push(info);
        VarId::new(index)
    }

    pub fn env(&self) -> VarId {
        self.env
    }

    /// Add a fresh, uninitialized local.
    pub fn declare_local(&mut self, name: impl Into<String>) -> VarId {
        self.push(VariableInfo::new(name.into(), VariableMode::Local))
    }

    /// The global record for `name`, created on first use.
    pub fn global(&mut self, name: &str) -> VarId {
        if let Some(&id) = self.globals.get(name) {
            return id;
        }
        let id = self.push(VariableInfo::new(name.to_owned(), VariableMode::Global));
        self.globals.insert(name.to_owned(), id);
        id
    }

    pub fn get(&self, id: VarId) -> &VariableInfo {
        &self.vars[id.index()]
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &VariableInfo)> {
        (0u32..).map(VarId::new).zip(self.vars.iter())
    }

    /// Record one more write site.
    ///
    /// The first write initializes the variable as final, any later write
    /// makes it non-final for good.
    pub fn try_mark_written(&mut self, id: VarId) -> Result<(), VariableError> {
        let info = &mut self.vars[id.index()];
        if info.is_global() {
            return Err(VariableError::GlobalWrite(info.name.clone()));
        }
        info.state = match info.state {
            WriteState::Uninitialized => WriteState::Final,
            WriteState::Final | WriteState::NonFinal => WriteState::NonFinal,
        };
        Ok(())
    }

    pub fn mark_written(&mut self, id: VarId) {
        if let Err(err) = self.try_mark_written(id) {
            panic!("internal compiler error: {err}");
        }
    }

    /// Register a type source for a later [`type_of`](Self::type_of) query.
    /// Globals ignore sources.
    pub fn add_type_source(&mut self, id: VarId, source: impl Into<TypeSource>) {
        let info = &mut self.vars[id.index()];
        if !info.is_global() {
            info.ty.add(source);
        }
    }

    /// Record a write of a value with the given type source.
    ///
    /// For globals this does nothing: they are untyped and never final.
    pub fn record_write(&mut self, id: VarId, source: impl Into<TypeSource>) {
        if self.get(id).is_global() {
            return;
        }
        self.add_type_source(id, source);
        self.mark_written(id);
    }

    /// One-way promotion of a local to an upvalue.
    pub fn try_promote_to_upvalue(&mut self, id: VarId) -> Result<(), VariableError> {
        let info = &mut self.vars[id.index()];
        match info.mode {
            VariableMode::Global => Err(VariableError::GlobalPromotion(info.name.clone())),
            VariableMode::Local | VariableMode::Upvalue => {
                if info.mode == VariableMode::Local {
                    tracing::trace!(name = %info.name, "promoted to upvalue");
                }
                info.mode = VariableMode::Upvalue;
                Ok(())
            }
        }
    }

    pub fn promote_to_upvalue(&mut self, id: VarId) {
        if let Err(err) = self.try_promote_to_upvalue(id) {
            panic!("internal compiler error: {err}");
        }
    }

    /// Static type of a variable.
    ///
    /// Globals are `Object`. Upvalues whose joined type has no boxed
    /// representation (anything but integer, number, table or function)
    /// degrade to `Object`.
    pub fn try_type_of(&self, id: VarId) -> Result<StaticType, VariableError> {
        let info = self.get(id);
        match info.mode {
            VariableMode::Global => Ok(StaticType::Object),
            _ if info.state == WriteState::Uninitialized => {
                Err(VariableError::TypeQueryBeforeInit(info.name.clone()))
            }
            VariableMode::Local => Ok(info.ty.get(self)),
            VariableMode::Upvalue => Ok(match info.ty.get(self) {
                ty @ (StaticType::Integer
                | StaticType::Number
                | StaticType::Table
                | StaticType::Function) => ty,
                _ => StaticType::Object,
            }),
        }
    }

    /// Like [`try_type_of`](Self::try_type_of), panicking on misuse.
    pub fn type_of(&self, id: VarId) -> StaticType {
        match self.try_type_of(id) {
            Ok(ty) => ty,
            Err(err) => panic!("internal compiler error: {err}"),
        }
    }
}

impl std::ops::Index<VarId> for VariableArena {
    type Output = VariableInfo;

    fn index(&self, id: VarId) -> &VariableInfo {
        self.get(id)
    }
}
