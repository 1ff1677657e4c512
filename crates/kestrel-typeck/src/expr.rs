use kestrel_ast::*;
use smol_str::SmolStr;

use crate::checker::TypeChecker;
use crate::defs::{CheckedVarDecl, CheckedVariable};
use crate::error::{keep_first, CheckResult, TypeError};
use crate::scope::ScopeId;
use crate::types::TypeId;

// ── Checked statements and expressions ───────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckedStatement {
    VarDecl {
        var: CheckedVarDecl,
        init: CheckedExpression,
    },
    Expr(CheckedExpression),
    /// A statement kind checking does not handle yet.
    Invalid { span: Span },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckedExpression {
    Int { value: i64, span: Span },
    Str { value: SmolStr, span: Span },
    Var { var: CheckedVariable, span: Span },
    /// Could not be checked; the accompanying error says why.
    Invalid { span: Span },
}

impl CheckedExpression {
    pub fn type_id(&self) -> TypeId {
        match self {
            CheckedExpression::Int { .. } => TypeId::INT,
            CheckedExpression::Str { .. } => TypeId::STRING,
            CheckedExpression::Var { var, .. } => var.type_id,
            CheckedExpression::Invalid { .. } => TypeId::UNKNOWN,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            CheckedExpression::Int { span, .. }
            | CheckedExpression::Str { span, .. }
            | CheckedExpression::Var { span, .. }
            | CheckedExpression::Invalid { span } => *span,
        }
    }
}

fn not_supported(what: &str, span: Span) -> TypeError {
    TypeError::new(format!("{} is not supported yet", what), span)
}

impl TypeChecker<'_> {
    // ── Statement checking ───────────────────────────────────────

    pub fn typecheck_statement(
        &mut self,
        stmt: &Stmt,
        scope_id: ScopeId,
    ) -> CheckResult<(CheckedStatement, Option<TypeError>)> {
        let span = stmt.span;
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                let (checked, error) = self.typecheck_expression(*expr, scope_id, None)?;
                Ok((CheckedStatement::Expr(checked), error))
            }

            StmtKind::Var { id, type_ann, init } => {
                let module = self.module;
                let mut error = None;

                let (declared, err) = self.project.typecheck_typename(module, *type_ann, scope_id)?;
                keep_first(&mut error, err);

                let (init, err) = self.typecheck_expression(*init, scope_id, Some(declared))?;
                keep_first(&mut error, err);

                // Without an annotation the variable takes the initializer's type.
                let type_id = if declared.is_unknown() {
                    init.type_id()
                } else {
                    declared
                };
                let var = CheckedVariable {
                    name: id.value.clone(),
                    type_id,
                };
                let result = self.project.add_var_to_scope(scope_id, var, id.span);
                keep_first(&mut error, result.err());

                let decl = CheckedVarDecl {
                    name: id.value.clone(),
                    type_id,
                    span: id.span,
                };
                Ok((CheckedStatement::VarDecl { var: decl, init }, error))
            }

            StmtKind::Object(_)
            | StmtKind::Interface(_)
            | StmtKind::Fun(_)
            | StmtKind::Return(_) => Ok((
                CheckedStatement::Invalid { span },
                Some(not_supported(
                    &format!("{} statement", stmt.kind.describe()),
                    span,
                )),
            )),
        }
    }

    // ── Expression checking ──────────────────────────────────────

    /// Check an expression. When `type_hint` is given, the result must be
    /// compatible with it.
    pub fn typecheck_expression(
        &mut self,
        expr_id: ExprId,
        scope_id: ScopeId,
        type_hint: Option<TypeId>,
    ) -> CheckResult<(CheckedExpression, Option<TypeError>)> {
        let module = self.module;
        let expr = &module.exprs[expr_id];
        let span = expr.span;

        let checked = match &expr.kind {
            ExprKind::Int(value) => CheckedExpression::Int {
                value: *value,
                span,
            },
            ExprKind::Str(value) => CheckedExpression::Str {
                value: value.clone(),
                span,
            },
            ExprKind::Id(name) => match self.project.find_var_in_scope(scope_id, name) {
                Some(var) => CheckedExpression::Var {
                    var: var.clone(),
                    span,
                },
                None => {
                    let err = TypeError::new(format!("unknown variable `{}`", name), span);
                    return Ok((CheckedExpression::Invalid { span }, Some(err)));
                }
            },

            ExprKind::Null
            | ExprKind::Call { .. }
            | ExprKind::Index { .. }
            | ExprKind::Generic { .. }
            | ExprKind::Unary { .. }
            | ExprKind::Binary { .. }
            | ExprKind::If { .. }
            | ExprKind::Access { .. }
            | ExprKind::Switch { .. }
            | ExprKind::UnsafeBlock(_) => {
                let err = not_supported(&format!("{} expression", expr.kind.describe()), span);
                return Ok((CheckedExpression::Invalid { span }, Some(err)));
            }
        };

        let (_, error) = self
            .project
            .unify_with_type_hint(checked.type_id(), type_hint, span)?;
        Ok((checked, error))
    }
}
