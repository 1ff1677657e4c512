use kestrel_ast::{ParsedModule, TypeExprId, TypeExprKind};
use smallvec::smallvec;

use crate::error::{keep_first, CheckResult, TypeError};
use crate::project::{Project, ARRAY, OPTIONAL, WEAK_PTR};
use crate::scope::ScopeId;
use crate::types::{CheckedType, TypeId, TypeIdVec};

impl Project {
    // ── Type resolution (TypeExpr → TypeId) ──────────────────────

    /// Resolve a written type in `scope_id`.
    ///
    /// Always yields a type id, falling back to `TypeId::UNKNOWN`, so callers
    /// can keep populating tables. The error is the first one met while
    /// resolving, nested arguments included.
    pub fn typecheck_typename(
        &mut self,
        module: &ParsedModule,
        type_expr: TypeExprId,
        scope_id: ScopeId,
    ) -> CheckResult<(TypeId, Option<TypeError>)> {
        let texpr = &module.type_exprs[type_expr];
        let span = texpr.span;

        match &texpr.kind {
            TypeExprKind::Undetermined => Ok((TypeId::UNKNOWN, None)),

            TypeExprKind::Name(name) => match self.find_type_in_scope(scope_id, name) {
                Some(type_id) => Ok((type_id, None)),
                None => Ok((
                    TypeId::UNKNOWN,
                    Some(TypeError::new(format!("unknown type `{}`", name), span)),
                )),
            },

            TypeExprKind::Str => Ok((TypeId::STRING, None)),
            TypeExprKind::Int => Ok((TypeId::INT, None)),

            TypeExprKind::Array(inner) => self.builtin_instance(module, ARRAY, *inner, scope_id),
            TypeExprKind::Weak(inner) => self.builtin_instance(module, WEAK_PTR, *inner, scope_id),
            TypeExprKind::Optional(inner) => {
                self.builtin_instance(module, OPTIONAL, *inner, scope_id)
            }

            TypeExprKind::Raw(inner) => {
                let (inner_type_id, error) = self.typecheck_typename(module, *inner, scope_id)?;
                let type_id = self.find_or_add_type_id(CheckedType::RawPtr(inner_type_id));
                Ok((type_id, error))
            }

            TypeExprKind::Generic { name, args } => {
                let mut error = None;
                let mut checked_args = TypeIdVec::new();
                for &arg in args {
                    let (arg_type_id, err) = self.typecheck_typename(module, arg, scope_id)?;
                    keep_first(&mut error, err);
                    checked_args.push(arg_type_id);
                }

                // Generic instantiation names a record, not a type.
                match self.find_record_in_scope(scope_id, name) {
                    Some(record_id) => {
                        let type_id = self.find_or_add_type_id(CheckedType::GenericInstance(
                            record_id,
                            checked_args,
                        ));
                        Ok((type_id, error))
                    }
                    None => {
                        let undefined = TypeError::new(format!("undefined type `{}`", name), span);
                        keep_first(&mut error, Some(undefined));
                        Ok((TypeId::UNKNOWN, error))
                    }
                }
            }
        }
    }

    /// `Array<T>`, `WeakPtr<T>`, `Optional<T>`: instantiate the root-scope builtin.
    fn builtin_instance(
        &mut self,
        module: &ParsedModule,
        builtin: &'static str,
        inner: TypeExprId,
        scope_id: ScopeId,
    ) -> CheckResult<(TypeId, Option<TypeError>)> {
        let (inner_type_id, error) = self.typecheck_typename(module, inner, scope_id)?;
        let record_id = self.builtin_record(builtin)?;
        let type_id = self.find_or_add_type_id(CheckedType::GenericInstance(
            record_id,
            smallvec![inner_type_id],
        ));
        Ok((type_id, error))
    }
}
