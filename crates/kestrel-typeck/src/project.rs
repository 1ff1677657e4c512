use kestrel_ast::Span;
use la_arena::Arena;
use smol_str::SmolStr;

use crate::defs::{CheckedFunction, CheckedRecord, RecordId};
use crate::error::{CheckResult, InternalError, TypeError};
use crate::options::CheckOptions;
use crate::scope::{Scope, ScopeId};
use crate::type_table::TypeTable;
use crate::types::{CheckedType, TypeId};

/// Names of the records every project must hold in its root scope.
pub const ARRAY: &str = "Array";
pub const OPTIONAL: &str = "Optional";
pub const WEAK_PTR: &str = "WeakPtr";

/// Everything checking produces: the type table, the scope tree and the
/// record/function arenas. All cross-references are ids into these.
#[derive(Debug)]
pub struct Project {
    pub types: TypeTable,
    pub scopes: Arena<Scope>,
    pub records: Arena<CheckedRecord>,
    pub functions: Arena<CheckedFunction>,
    /// Every user-facing error reported by a declaration pass, in traversal order.
    pub diagnostics: Vec<TypeError>,
    pub options: CheckOptions,
    root_scope: ScopeId,
}

impl Project {
    pub fn new() -> Self {
        Self::with_options(CheckOptions::default())
    }

    /// A project whose root scope holds the builtin `Array`, `Optional` and
    /// `WeakPtr` records.
    pub fn with_options(options: CheckOptions) -> Self {
        let mut project = Self::without_builtins(options);
        for name in [ARRAY, OPTIONAL, WEAK_PTR] {
            project.declare_builtin_record(name);
        }
        project
    }

    /// A project with only the root scope. Checking anything that needs a
    /// builtin record fails with `InternalError::MissingBuiltin`.
    pub fn without_builtins(options: CheckOptions) -> Self {
        let mut scopes = Arena::new();
        let root_scope = scopes.alloc(Scope::default());
        Self {
            types: TypeTable::new(),
            scopes,
            records: Arena::new(),
            functions: Arena::new(),
            diagnostics: Vec::new(),
            options,
            root_scope,
        }
    }

    /// Scope 0: the only scope without a parent.
    pub fn root_scope(&self) -> ScopeId {
        self.root_scope
    }

    // Builtins are generic over a single `T`.
    fn declare_builtin_record(&mut self, name: &'static str) {
        let name = SmolStr::new_static(name);
        let scope_id = self.create_scope(self.root_scope);

        let param_name = SmolStr::new_static("T");
        let param_type_id = self
            .types
            .push(CheckedType::TypeVariable(param_name.clone()));
        self.scopes[scope_id].types.insert(param_name, param_type_id);

        let record_id = self.records.alloc(CheckedRecord {
            name: name.clone(),
            generic_parameters: vec![param_type_id],
            fields: Vec::new(),
            scope_id,
            methods: Vec::new(),
        });
        let type_id = self.types.push(CheckedType::Record(record_id));

        let root = &mut self.scopes[self.root_scope];
        root.types.insert(name.clone(), type_id);
        root.records.insert(name, record_id);
    }

    /// Look up a required builtin record in the root scope.
    pub fn builtin_record(&self, name: &'static str) -> CheckResult<RecordId> {
        self.find_record_in_scope(self.root_scope, name)
            .ok_or(InternalError::MissingBuiltin(name))
    }

    // ── Type table ───────────────────────────────────────────────

    pub fn find_or_add_type_id(&mut self, ty: CheckedType) -> TypeId {
        self.types.find_or_add(ty)
    }

    /// The nominal `Record` type of `record_id`.
    pub fn record_type_id(&mut self, record_id: RecordId) -> TypeId {
        self.find_or_add_type_id(CheckedType::Record(record_id))
    }

    /// Render a type the way it is written in source.
    pub fn typename_for_type_id(&self, type_id: TypeId) -> String {
        match self.types.get(type_id) {
            CheckedType::Unknown => "unknown".to_string(),
            CheckedType::Unit => "Unit".to_string(),
            CheckedType::Int => "Int".to_string(),
            CheckedType::String => "String".to_string(),
            CheckedType::Record(record_id) => self.records[*record_id].name.to_string(),
            CheckedType::GenericInstance(record_id, args) => {
                let args: Vec<String> = args
                    .iter()
                    .map(|&arg| self.typename_for_type_id(arg))
                    .collect();
                format!("{}<{}>", self.records[*record_id].name, args.join(", "))
            }
            CheckedType::TypeVariable(name) => name.to_string(),
            CheckedType::RawPtr(inner) => format!("raw {}", self.typename_for_type_id(*inner)),
        }
    }

    /// Mismatch error naming both resolved types.
    pub(crate) fn type_mismatch(&self, expected: TypeId, actual: TypeId, span: Span) -> TypeError {
        TypeError::new(
            format!(
                "type mismatch; expected {}, but got {} instead",
                self.typename_for_type_id(expected),
                self.typename_for_type_id(actual)
            ),
            span,
        )
    }

    /// Record a diagnostic reported by a declaration pass.
    pub(crate) fn report(&mut self, err: TypeError) -> TypeError {
        tracing::debug!(%err, "type error");
        self.diagnostics.push(err.clone());
        err
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}
