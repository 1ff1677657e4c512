use kestrel_ast::Span;

use crate::defs::{CheckedFunction, CheckedParameter, CheckedVariable, RecordId};
use crate::error::TypeError;
use crate::project::Project;

impl Project {
    /// Give `record_id` a constructor whose labeled parameters mirror its
    /// fields, unless its scope already declares a function of the record's
    /// name. Runs after the fields are resolved.
    pub fn synthesize_constructor(
        &mut self,
        record_id: RecordId,
        span: Span,
    ) -> Result<(), TypeError> {
        let record = &self.records[record_id];
        let record_scope_id = record.scope_id;
        let name = record.name.clone();

        if self.find_function_in_own_scope(record_scope_id, &name).is_some() {
            return Ok(());
        }

        let parameters = record
            .fields
            .iter()
            .map(|field| CheckedParameter {
                requires_label: true,
                variable: CheckedVariable {
                    name: field.name.clone(),
                    type_id: field.type_id,
                },
            })
            .collect();
        let generic_parameters = record.generic_parameters.clone();
        let return_type_id = self.record_type_id(record_id);

        let scope_id = self.create_scope(record_scope_id);
        let function_id = self.functions.alloc(CheckedFunction {
            name: name.clone(),
            return_type_id,
            parameters,
            generic_parameters,
            scope_id,
        });
        tracing::debug!(record = %name, ?function_id, "synthesized constructor");

        self.add_function_to_scope(record_scope_id, &name, function_id, span)
    }
}
