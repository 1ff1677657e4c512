use std::collections::HashMap;

use kestrel_ast::Span;
use la_arena::Idx;
use smol_str::SmolStr;

use crate::defs::{CheckedVariable, FunctionId, RecordId};
use crate::error::TypeError;
use crate::project::Project;
use crate::types::TypeId;

pub type ScopeId = Idx<Scope>;

/// One symbol table in the scope tree.
///
/// Types, records, functions and variables are four separate namespaces: a
/// name may be bound in all of them at once without conflict.
#[derive(Debug, Default)]
pub struct Scope {
    pub namespace_name: Option<SmolStr>,
    pub types: HashMap<SmolStr, TypeId>,
    pub records: HashMap<SmolStr, RecordId>,
    pub functions: HashMap<SmolStr, FunctionId>,
    pub vars: HashMap<SmolStr, CheckedVariable>,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
}

fn redefinition(kind: &str, name: &str, span: Span) -> TypeError {
    TypeError::new(format!("redefinition of {} `{}`", kind, name), span)
}

impl Project {
    // ── Scope tree ───────────────────────────────────────────────

    /// Allocate an empty scope as the last child of `parent`.
    pub fn create_scope(&mut self, parent: ScopeId) -> ScopeId {
        let scope_id = self.scopes.alloc(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        self.scopes[parent].children.push(scope_id);
        scope_id
    }

    /// `scope_id` followed by each of its ancestors up to the root.
    pub fn scope_chain(&self, scope_id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope_id), move |&id| self.scopes[id].parent)
    }

    // ── Insertion (own scope only) ───────────────────────────────

    pub fn add_type_to_scope(
        &mut self,
        scope_id: ScopeId,
        name: &SmolStr,
        type_id: TypeId,
        span: Span,
    ) -> Result<(), TypeError> {
        let scope = &mut self.scopes[scope_id];
        if scope.types.contains_key(name) {
            return Err(redefinition("type", name, span));
        }
        scope.types.insert(name.clone(), type_id);
        Ok(())
    }

    pub fn add_record_to_scope(
        &mut self,
        scope_id: ScopeId,
        name: &SmolStr,
        record_id: RecordId,
        span: Span,
    ) -> Result<(), TypeError> {
        let scope = &mut self.scopes[scope_id];
        if scope.records.contains_key(name) {
            return Err(redefinition("record", name, span));
        }
        scope.records.insert(name.clone(), record_id);
        Ok(())
    }

    pub fn add_function_to_scope(
        &mut self,
        scope_id: ScopeId,
        name: &SmolStr,
        function_id: FunctionId,
        span: Span,
    ) -> Result<(), TypeError> {
        let scope = &mut self.scopes[scope_id];
        if scope.functions.contains_key(name) {
            return Err(redefinition("function", name, span));
        }
        scope.functions.insert(name.clone(), function_id);
        Ok(())
    }

    pub fn add_var_to_scope(
        &mut self,
        scope_id: ScopeId,
        var: CheckedVariable,
        span: Span,
    ) -> Result<(), TypeError> {
        let scope = &mut self.scopes[scope_id];
        if scope.vars.contains_key(&var.name) {
            return Err(redefinition("variable", &var.name, span));
        }
        scope.vars.insert(var.name.clone(), var);
        Ok(())
    }

    // ── Lookup (nearest scope wins) ──────────────────────────────

    pub fn find_type_in_scope(&self, scope_id: ScopeId, name: &str) -> Option<TypeId> {
        self.scope_chain(scope_id)
            .find_map(|id| self.scopes[id].types.get(name).copied())
    }

    pub fn find_record_in_scope(&self, scope_id: ScopeId, name: &str) -> Option<RecordId> {
        self.scope_chain(scope_id)
            .find_map(|id| self.scopes[id].records.get(name).copied())
    }

    pub fn find_function_in_scope(&self, scope_id: ScopeId, name: &str) -> Option<FunctionId> {
        self.scope_chain(scope_id)
            .find_map(|id| self.scopes[id].functions.get(name).copied())
    }

    pub fn find_var_in_scope(&self, scope_id: ScopeId, name: &str) -> Option<&CheckedVariable> {
        self.scope_chain(scope_id)
            .find_map(|id| self.scopes[id].vars.get(name))
    }

    /// Like `find_function_in_scope`, without walking to the parents.
    pub fn find_function_in_own_scope(&self, scope_id: ScopeId, name: &str) -> Option<FunctionId> {
        self.scopes[scope_id].functions.get(name).copied()
    }
}
