use kestrel_ast::Span;

use crate::error::{CheckResult, TypeError};
use crate::generic::GenericBindings;
use crate::project::{Project, OPTIONAL, WEAK_PTR};
use crate::types::{CheckedType, TypeId};

impl Project {
    // ── Compatibility ────────────────────────────────────────────

    /// Is a value of type `actual` acceptable where `expected` is required?
    ///
    /// Directional: type variables in `expected` are bound to the matching
    /// part of `actual` in `bindings`, and a variable already bound must be
    /// met by the same type again. `bindings` is shared by the whole
    /// recursive walk.
    pub fn check_types_for_compat(
        &self,
        expected: TypeId,
        actual: TypeId,
        bindings: &mut GenericBindings,
        span: Span,
    ) -> CheckResult {
        let optional_record_id = self.builtin_record(OPTIONAL)?;
        let weak_ptr_record_id = self.builtin_record(WEAK_PTR)?;

        let expected_type = self.types.get(expected);

        // A bare `T` is accepted where `Optional<T>` or `WeakPtr<T>` is expected.
        if let CheckedType::GenericInstance(record_id, args) = expected_type {
            if (*record_id == optional_record_id || *record_id == weak_ptr_record_id)
                && matches!(args.as_slice(), [inner] if *inner == actual)
            {
                tracing::trace!(?expected, ?actual, "implicit wrapper coercion");
                return Ok(None);
            }
        }

        match expected_type {
            CheckedType::TypeVariable(_) => match bindings.get(&expected) {
                Some(&seen) if seen != actual => {
                    Ok(Some(self.type_mismatch(seen, actual, span)))
                }
                Some(_) => Ok(None),
                None => {
                    bindings.insert(expected, actual);
                    Ok(None)
                }
            },

            CheckedType::GenericInstance(expected_record_id, expected_args) => {
                let (actual_record_id, actual_args) = match self.types.get(actual) {
                    CheckedType::GenericInstance(record_id, args) => (*record_id, args),
                    _ => return Ok(self.mismatch_unless_equal(expected, actual, span)),
                };
                if actual_record_id != *expected_record_id {
                    return Ok(Some(self.type_mismatch(expected, actual, span)));
                }
                if actual_args.len() != expected_args.len() {
                    return Ok(Some(TypeError::new(
                        format!(
                            "mismatched number of generic parameters for {}",
                            self.records[*expected_record_id].name
                        ),
                        span,
                    )));
                }
                for (&expected_arg, &actual_arg) in expected_args.iter().zip(actual_args.iter()) {
                    let err = self.check_types_for_compat(expected_arg, actual_arg, bindings, span)?;
                    if err.is_some() {
                        return Ok(err);
                    }
                }
                Ok(None)
            }

            CheckedType::Record(_)
            | CheckedType::Unknown
            | CheckedType::Unit
            | CheckedType::Int
            | CheckedType::String
            | CheckedType::RawPtr(_) => Ok(self.mismatch_unless_equal(expected, actual, span)),
        }
    }

    fn mismatch_unless_equal(&self, expected: TypeId, actual: TypeId, span: Span) -> Option<TypeError> {
        if expected == actual {
            None
        } else {
            Some(self.type_mismatch(expected, actual, span))
        }
    }

    /// Check an inferred type against an optional expected type.
    ///
    /// With no hint (or an unknown one) the type passes through untouched.
    /// Otherwise the type comes back with whatever the compatibility check
    /// bound substituted into it.
    pub fn unify_with_type_hint(
        &mut self,
        type_id: TypeId,
        hint: Option<TypeId>,
        span: Span,
    ) -> CheckResult<(TypeId, Option<TypeError>)> {
        let hint = match hint {
            Some(hint) if !hint.is_unknown() => hint,
            _ => return Ok((type_id, None)),
        };

        let mut bindings = GenericBindings::new();
        if let Some(err) = self.check_types_for_compat(hint, type_id, &mut bindings, span)? {
            return Ok((type_id, Some(err)));
        }
        let type_id = self.substitute_typevars_in_type(type_id, &bindings)?;
        Ok((type_id, None))
    }
}
