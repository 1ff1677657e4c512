use kestrel_ast::*;
use la_arena::RawIdx;

use crate::defs::*;
use crate::error::{keep_first, CheckResult, InternalError, TypeError};
use crate::project::Project;
use crate::scope::ScopeId;
use crate::types::{CheckedType, TypeId};

// ── Type checker ─────────────────────────────────────────────────

/// Walks a parsed module and declares everything in it into a `Project`.
///
/// Every pass keeps going after an error so sibling declarations still get
/// registered, and returns the earliest error it met. All errors reported on
/// the way are also appended to `Project::diagnostics`.
pub struct TypeChecker<'a> {
    pub(crate) module: &'a ParsedModule,
    pub(crate) project: &'a mut Project,
}

impl<'a> TypeChecker<'a> {
    pub fn new(module: &'a ParsedModule, project: &'a mut Project) -> Self {
        Self { module, project }
    }

    /// Check the module's root namespace into the project's root scope.
    pub fn check_module(&mut self) -> CheckResult {
        let module = self.module;
        let root = self.project.root_scope();
        self.typecheck_namespace(&module.root, root)
    }

    fn note(&mut self, error: &mut Option<TypeError>, err: Option<TypeError>) {
        if let Some(err) = err {
            let err = self.project.report(err);
            keep_first(error, Some(err));
        }
    }

    // ── Namespaces ───────────────────────────────────────────────

    #[tracing::instrument(level = "debug", skip_all, fields(namespace = ?namespace.name))]
    pub fn typecheck_namespace(
        &mut self,
        namespace: &ParsedNamespace,
        scope_id: ScopeId,
    ) -> CheckResult {
        let mut error = None;

        for child in &namespace.namespaces {
            let child_scope_id = self.project.create_scope(scope_id);
            self.project.scopes[child_scope_id].namespace_name = child.name.clone();
            let child_error = self.typecheck_namespace(child, child_scope_id)?;
            keep_first(&mut error, child_error);
        }

        // The pre-declaration pass allocates records in declaration order, so
        // their ids are known before any record exists.
        let first_record = self.project.records.len();
        let record_ids: Vec<RecordId> = (0..namespace.objects.len())
            .map(|offset| RecordId::from_raw(RawIdx::from((first_record + offset) as u32)))
            .collect();

        // Pass 1: nominal types, so records can name each other in any order.
        for (object, &record_id) in namespace.objects.iter().zip(&record_ids) {
            let type_id = self.project.types.push(CheckedType::Record(record_id));
            let result =
                self.project
                    .add_type_to_scope(scope_id, &object.id.value, type_id, object.id.span);
            self.note(&mut error, result.err());
        }
        tracing::debug!(records = record_ids.len(), "registered record types");

        // Pass 2: generic parameters and method signatures.
        for (object, &record_id) in namespace.objects.iter().zip(&record_ids) {
            let record_error = self.typecheck_record_predecl(object, record_id, scope_id)?;
            keep_first(&mut error, record_error);
        }
        tracing::debug!("pre-declared records");

        // Pass 3: fields, constructors, return types.
        for (object, &record_id) in namespace.objects.iter().zip(&record_ids) {
            let record_error = self.typecheck_record(object, record_id)?;
            keep_first(&mut error, record_error);
        }
        tracing::debug!("declared records");

        Ok(error)
    }

    // ── Records ──────────────────────────────────────────────────

    /// Create the record's body scope, its generic parameters and a stub for
    /// every method, then register the record in `parent_scope_id`.
    pub fn typecheck_record_predecl(
        &mut self,
        object: &ParsedObject,
        record_id: RecordId,
        parent_scope_id: ScopeId,
    ) -> CheckResult {
        let mut error = None;

        let scope_id = self.project.create_scope(parent_scope_id);
        let generic_parameters =
            self.declare_generic_parameters(&object.generic_params, scope_id, &mut error);

        let mut methods = Vec::with_capacity(object.methods.len());
        for method in &object.methods {
            let method_id =
                self.predeclare_method(method, &generic_parameters, scope_id, &mut error)?;
            methods.push(method_id);
        }

        let allocated = self.project.records.alloc(CheckedRecord {
            name: object.id.value.clone(),
            generic_parameters,
            fields: Vec::new(),
            scope_id,
            methods,
        });
        if allocated != record_id {
            return Err(InternalError::RecordOutOfOrder(object.id.value.clone()));
        }

        let result = self.project.add_record_to_scope(
            parent_scope_id,
            &object.id.value,
            record_id,
            object.id.span,
        );
        self.note(&mut error, result.err());

        Ok(error)
    }

    /// Bind each generic parameter as a fresh type variable in `scope_id`.
    fn declare_generic_parameters(
        &mut self,
        params: &[GenericParameter],
        scope_id: ScopeId,
        error: &mut Option<TypeError>,
    ) -> Vec<TypeId> {
        let mut type_ids = Vec::with_capacity(params.len());
        for param in params {
            let type_id = self
                .project
                .types
                .push(CheckedType::TypeVariable(param.id.value.clone()));
            type_ids.push(type_id);
            let result = self
                .project
                .add_type_to_scope(scope_id, &param.id.value, type_id, param.id.span);
            self.note(error, result.err());
        }
        type_ids
    }

    fn predeclare_method(
        &mut self,
        method: &ParsedMethod,
        record_generics: &[TypeId],
        record_scope_id: ScopeId,
        error: &mut Option<TypeError>,
    ) -> CheckResult<FunctionId> {
        let module = self.module;
        let method_scope_id = self.project.create_scope(record_scope_id);

        let mut generic_parameters = record_generics.to_vec();
        generic_parameters.extend(self.declare_generic_parameters(
            &method.generic_params,
            method_scope_id,
            error,
        ));

        let mut parameters = Vec::with_capacity(method.parameters.len());
        for param in &method.parameters {
            let (type_id, err) =
                self.project
                    .typecheck_typename(module, param.type_ann, method_scope_id)?;
            self.note(error, err);
            parameters.push(CheckedParameter {
                requires_label: param.requires_label,
                variable: CheckedVariable {
                    name: param.id.value.clone(),
                    type_id,
                },
            });
        }

        let function_id = self.project.functions.alloc(CheckedFunction {
            name: method.id.value.clone(),
            return_type_id: TypeId::UNKNOWN,
            parameters,
            generic_parameters,
            scope_id: method_scope_id,
        });
        let result = self.project.add_function_to_scope(
            record_scope_id,
            &method.id.value,
            function_id,
            method.id.span,
        );
        self.note(error, result.err());

        Ok(function_id)
    }

    /// Resolve the record's fields, give it a constructor if it has none,
    /// and finalize its method signatures.
    pub fn typecheck_record(&mut self, object: &ParsedObject, record_id: RecordId) -> CheckResult {
        let module = self.module;
        let mut error = None;
        let record_scope_id = self.project.records[record_id].scope_id;

        let mut fields = Vec::with_capacity(object.fields.len());
        for field in &object.fields {
            let (type_id, err) =
                self.project
                    .typecheck_typename(module, field.type_ann, record_scope_id)?;
            self.note(&mut error, err);
            fields.push(CheckedVarDecl {
                name: field.id.value.clone(),
                type_id,
                span: field.id.span,
            });
        }
        self.project.records[record_id].fields = fields;

        if self.project.options.synthesize_constructors {
            let result = self.project.synthesize_constructor(record_id, object.id.span);
            self.note(&mut error, result.err());
        }

        let method_ids = self.project.records[record_id].methods.clone();
        for (method, method_id) in object.methods.iter().zip(method_ids) {
            let method_error = self.typecheck_method(method, record_id, method_id)?;
            keep_first(&mut error, method_error);
        }

        Ok(error)
    }

    // ── Methods ──────────────────────────────────────────────────

    /// Bind the method's parameters in its scope and resolve its return type
    /// into `method_id`, the stub pre-declared for this method. The body is
    /// not checked.
    pub fn typecheck_method(
        &mut self,
        method: &ParsedMethod,
        record_id: RecordId,
        method_id: FunctionId,
    ) -> CheckResult {
        let module = self.module;
        let mut error = None;
        let record_scope_id = self.project.records[record_id].scope_id;

        if self
            .project
            .find_function_in_own_scope(record_scope_id, &method.id.value)
            .is_none()
        {
            return Err(InternalError::MissingMethodStub(method.id.value.clone()));
        }
        let function_scope_id = self.project.functions[method_id].scope_id;

        let parameters: Vec<CheckedVariable> = self.project.functions[method_id]
            .parameters
            .iter()
            .map(|param| param.variable.clone())
            .collect();
        for (variable, param) in parameters.into_iter().zip(&method.parameters) {
            let result = self
                .project
                .add_var_to_scope(function_scope_id, variable, param.id.span);
            self.note(&mut error, result.err());
        }

        let mut return_type_id = TypeId::UNKNOWN;
        if let Some(ret_type) = method.ret_type {
            let (type_id, err) =
                self.project
                    .typecheck_typename(module, ret_type, function_scope_id)?;
            self.note(&mut error, err);
            return_type_id = type_id;
        }
        if return_type_id.is_unknown() {
            return_type_id = TypeId::UNIT;
        }
        self.project.functions[method_id].return_type_id = return_type_id;

        Ok(error)
    }
}
