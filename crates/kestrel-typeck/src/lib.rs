//! Declaration-level type checking.
//!
//! Turns a `ParsedModule` into a `Project`: a hash-consed type table, a tree
//! of scopes, and fully typed record and function declarations. Records are
//! declared in three passes over each namespace (nominal types, signatures,
//! bodies) so they may refer to each other in any order.

mod checker;
mod compat;
mod constructor;
mod defs;
mod error;
mod expr;
mod generic;
mod options;
mod project;
mod scope;
mod type_table;
mod typename;
mod types;

pub use checker::TypeChecker;
pub use defs::{
    CheckedFunction, CheckedParameter, CheckedRecord, CheckedVarDecl, CheckedVariable,
    FunctionId, RecordId,
};
pub use error::{CheckResult, InternalError, TypeError};
pub use expr::{CheckedExpression, CheckedStatement};
pub use generic::GenericBindings;
pub use options::CheckOptions;
pub use project::{Project, ARRAY, OPTIONAL, WEAK_PTR};
pub use scope::{Scope, ScopeId};
pub use type_table::TypeTable;
pub use types::{CheckedType, TypeId, TypeIdVec};

use kestrel_ast::ParsedModule;

pub struct TypeCheckResult {
    pub project: Project,
    /// The earliest error in traversal order, if any.
    pub error: Option<TypeError>,
}

// ── Public API ───────────────────────────────────────────────────

pub fn check(module: &ParsedModule) -> CheckResult<TypeCheckResult> {
    check_with_options(module, CheckOptions::default())
}

pub fn check_with_options(
    module: &ParsedModule,
    options: CheckOptions,
) -> CheckResult<TypeCheckResult> {
    let mut project = Project::with_options(options);
    let error = TypeChecker::new(module, &mut project).check_module()?;
    Ok(TypeCheckResult { project, error })
}
