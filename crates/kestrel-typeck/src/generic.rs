// Generic substitution: rewrite type-variable occurrences according to a
// binding map until the result stops changing.

use std::collections::HashMap;

use crate::error::{CheckResult, InternalError};
use crate::project::Project;
use crate::types::{CheckedType, TypeId, TypeIdVec};

/// Type variable (by its `TypeId`) → the type it is bound to.
pub type GenericBindings = HashMap<TypeId, TypeId>;

impl Project {
    /// Apply `bindings` to `type_id` repeatedly until a fixed point.
    ///
    /// Fails with `InternalError::SubstitutionDiverged` when the binding map is
    /// cyclic (e.g. `T -> Box<T>`) and no fixed point is reached within
    /// `options.max_substitution_rounds`.
    pub fn substitute_typevars_in_type(
        &mut self,
        type_id: TypeId,
        bindings: &GenericBindings,
    ) -> CheckResult<TypeId> {
        let max_rounds = self.options.max_substitution_rounds;
        let mut result = type_id;
        for round in 0..max_rounds {
            let next = self.substitute_step(result, bindings);
            if next == result {
                tracing::trace!(?type_id, ?result, round, "substitution reached fixed point");
                return Ok(result);
            }
            result = next;
        }
        tracing::warn!(?type_id, max_rounds, "substitution did not converge");
        Err(InternalError::SubstitutionDiverged { rounds: max_rounds })
    }

    /// One structural rewrite. Each type-variable leaf is replaced at most
    /// once, so a cyclic binding grows by one level per round instead of
    /// recursing here.
    fn substitute_step(&mut self, type_id: TypeId, bindings: &GenericBindings) -> TypeId {
        match self.types.get(type_id).clone() {
            CheckedType::TypeVariable(_) => bindings.get(&type_id).copied().unwrap_or(type_id),

            CheckedType::GenericInstance(record_id, args) => {
                let new_args = self.substitute_all(&args, bindings);
                if new_args == args {
                    return type_id;
                }
                self.find_or_add_type_id(CheckedType::GenericInstance(record_id, new_args))
            }

            // A bare generic record picks up the ambient bindings of its own
            // parameters, becoming an instance.
            CheckedType::Record(record_id) => {
                let params: TypeIdVec = self.records[record_id]
                    .generic_parameters
                    .iter()
                    .copied()
                    .collect();
                if params.is_empty() {
                    return type_id;
                }
                let args = self.substitute_all(&params, bindings);
                if args == params {
                    return type_id;
                }
                self.find_or_add_type_id(CheckedType::GenericInstance(record_id, args))
            }

            CheckedType::Unknown
            | CheckedType::Unit
            | CheckedType::Int
            | CheckedType::String
            | CheckedType::RawPtr(_) => type_id,
        }
    }

    fn substitute_all(
        &mut self,
        args: &TypeIdVec,
        bindings: &GenericBindings,
    ) -> TypeIdVec {
        args.iter()
            .map(|&arg| self.substitute_step(arg, bindings))
            .collect()
    }
}
