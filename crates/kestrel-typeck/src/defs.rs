use kestrel_ast::Span;
use la_arena::Idx;
use smol_str::SmolStr;

use crate::scope::ScopeId;
use crate::types::TypeId;

// ── Checked declarations ─────────────────────────────────────────

pub type RecordId = Idx<CheckedRecord>;
pub type FunctionId = Idx<CheckedFunction>;

#[derive(Clone, Debug)]
pub struct CheckedRecord {
    pub name: SmolStr,
    /// TypeIds of the record's own `TypeVariable`s, in declaration order.
    pub generic_parameters: Vec<TypeId>,
    /// Empty until the full declaration pass has run.
    pub fields: Vec<CheckedVarDecl>,
    /// Body scope: generic parameters and methods live here.
    pub scope_id: ScopeId,
    /// One stub per declared method, in declaration order. A redefined
    /// method still has its own stub, though only the first is reachable
    /// by name.
    pub methods: Vec<FunctionId>,
}

#[derive(Clone, Debug)]
pub struct CheckedFunction {
    pub name: SmolStr,
    /// `TypeId::UNKNOWN` until the method signature is finalized.
    pub return_type_id: TypeId,
    pub parameters: Vec<CheckedParameter>,
    pub generic_parameters: Vec<TypeId>,
    pub scope_id: ScopeId,
}

impl CheckedFunction {
    /// True when every parameter must be passed with its name as a label.
    pub fn is_fully_labeled(&self) -> bool {
        self.parameters.iter().all(|p| p.requires_label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckedParameter {
    pub requires_label: bool,
    pub variable: CheckedVariable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckedVariable {
    pub name: SmolStr,
    pub type_id: TypeId,
}

/// A declared variable that keeps its source location, used for fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckedVarDecl {
    pub name: SmolStr,
    pub type_id: TypeId,
    pub span: Span,
}
