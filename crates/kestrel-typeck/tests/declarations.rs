use kestrel_ast::*;
use kestrel_typeck::*;

fn span(at: u32) -> Span {
    Span::new(at, at + 1)
}

fn ident(name: &str, at: u32) -> Ident {
    Ident::new(name, span(at))
}

fn field(name: &str, at: u32, type_ann: TypeExprId) -> ParsedField {
    ParsedField {
        id: ident(name, at),
        type_ann,
    }
}

fn param(name: &str, at: u32, type_ann: TypeExprId) -> ParsedParameter {
    ParsedParameter {
        id: ident(name, at),
        type_ann,
        requires_label: false,
    }
}

fn check_ok(module: &ParsedModule) -> Project {
    let result = check(module).expect("no internal error");
    assert!(
        result.error.is_none(),
        "unexpected type error: {:?}",
        result.error
    );
    result.project
}

fn check_err(module: &ParsedModule) -> (Project, TypeError) {
    let result = check(module).expect("no internal error");
    let error = result.error.expect("expected a type error, got none");
    (result.project, error)
}

fn record_in(project: &Project, scope_id: ScopeId, name: &str) -> RecordId {
    project
        .find_record_in_scope(scope_id, name)
        .unwrap_or_else(|| panic!("record `{}` not declared", name))
}

fn function_in(project: &Project, record_id: RecordId, name: &str) -> FunctionId {
    let scope_id = project.records[record_id].scope_id;
    project
        .find_function_in_own_scope(scope_id, name)
        .unwrap_or_else(|| panic!("function `{}` not declared", name))
}

fn functions_named(project: &Project, name: &str) -> usize {
    project
        .functions
        .iter()
        .filter(|(_, function)| function.name == name)
        .count()
}

// ── Records ──────────────────────────────────────────────────────

#[test]
fn mutually_referencing_records_in_either_order() {
    for (first, second) in [("A", "B"), ("B", "A")] {
        let mut module = ParsedModule::new();
        let to_second = module.named_type(second, span(5));
        let to_first = module.named_type(first, span(15));

        let mut a = ParsedObject::new(ident(first, 0));
        a.fields.push(field("other", 3, to_second));
        let mut b = ParsedObject::new(ident(second, 10));
        b.fields.push(field("other", 13, to_first));
        module.root.objects = vec![a, b];

        let mut project = check_ok(&module);
        let root = project.root_scope();
        let first_id = record_in(&project, root, first);
        let second_id = record_in(&project, root, second);

        let first_type = project.record_type_id(first_id);
        let second_type = project.record_type_id(second_id);
        assert_eq!(project.records[first_id].fields[0].type_id, second_type);
        assert_eq!(project.records[second_id].fields[0].type_id, first_type);
        assert_eq!(project.types.get(second_type), &CheckedType::Record(second_id));
    }
}

#[test]
fn self_referential_generic_record() {
    let mut module = ParsedModule::new();
    let t = module.named_type("T", span(8));
    let node_t = module.generic_type("Node", vec![t], span(10));
    let raw_node = module.alloc_type(TypeExprKind::Raw(node_t), span(9));
    let value_t = module.named_type("T", span(20));

    let mut node = ParsedObject::new(ident("Node", 0));
    node.generic_params.push(GenericParameter { id: ident("T", 5) });
    node.fields.push(field("next", 7, raw_node));
    node.fields.push(field("value", 19, value_t));
    module.root.objects.push(node);

    let project = check_ok(&module);
    let node_id = record_in(&project, project.root_scope(), "Node");
    let record = &project.records[node_id];
    let next = record.fields[0].type_id;
    assert_eq!(project.typename_for_type_id(next), "raw Node<T>");
    assert_eq!(record.fields[1].type_id, record.generic_parameters[0]);
}

#[test]
fn builtin_wrappers_resolve_to_generic_instances() {
    let mut module = ParsedModule::new();
    let int = module.alloc_type(TypeExprKind::Int, span(1));
    let string = module.alloc_type(TypeExprKind::Str, span(2));
    let items = module.alloc_type(TypeExprKind::Array(int), span(3));
    let maybe = module.alloc_type(TypeExprKind::Optional(string), span(4));
    let owner_name = module.named_type("Holder", span(5));
    let owner = module.alloc_type(TypeExprKind::Weak(owner_name), span(6));

    let mut holder = ParsedObject::new(ident("Holder", 0));
    holder.fields.push(field("items", 10, items));
    holder.fields.push(field("label", 11, maybe));
    holder.fields.push(field("owner", 12, owner));
    module.root.objects.push(holder);

    let project = check_ok(&module);
    let holder_id = record_in(&project, project.root_scope(), "Holder");
    let names: Vec<String> = project.records[holder_id]
        .fields
        .iter()
        .map(|f| project.typename_for_type_id(f.type_id))
        .collect();
    assert_eq!(names, ["Array<Int>", "Optional<String>", "WeakPtr<Holder>"]);
}

#[test]
fn unknown_type_names() {
    let mut module = ParsedModule::new();
    let missing = module.named_type("Missing", span(6));
    let mut record = ParsedObject::new(ident("Holder", 0));
    record.fields.push(field("value", 4, missing));
    module.root.objects.push(record);

    let (project, error) = check_err(&module);
    assert_eq!(error.message, "unknown type `Missing`");
    assert_eq!(error.span, span(6));
    let holder_id = record_in(&project, project.root_scope(), "Holder");
    assert_eq!(project.records[holder_id].fields[0].type_id, TypeId::UNKNOWN);
}

#[test]
fn undefined_generic_type() {
    let mut module = ParsedModule::new();
    let int = module.alloc_type(TypeExprKind::Int, span(9));
    let missing = module.generic_type("Missing", vec![int], span(6));
    let mut record = ParsedObject::new(ident("Holder", 0));
    record.fields.push(field("value", 4, missing));
    module.root.objects.push(record);

    let (_, error) = check_err(&module);
    assert_eq!(error.message, "undefined type `Missing`");
    assert_eq!(error.span, span(6));
}

#[test]
fn missing_builtin_is_an_internal_error() {
    let mut module = ParsedModule::new();
    let int = module.alloc_type(TypeExprKind::Int, span(5));
    let items = module.alloc_type(TypeExprKind::Array(int), span(4));
    let mut record = ParsedObject::new(ident("Holder", 0));
    record.fields.push(field("items", 2, items));
    module.root.objects.push(record);

    let mut project = Project::without_builtins(CheckOptions::default());
    let result = TypeChecker::new(&module, &mut project).check_module();
    assert_eq!(result, Err(InternalError::MissingBuiltin(ARRAY)));
}

// ── Redefinition ─────────────────────────────────────────────────

#[test]
fn duplicate_records_in_one_scope() {
    let mut module = ParsedModule::new();
    module.root.objects.push(ParsedObject::new(ident("Point", 0)));
    module.root.objects.push(ParsedObject::new(ident("Point", 10)));

    let (project, error) = check_err(&module);
    assert_eq!(error.message, "redefinition of type `Point`");
    assert_eq!(error.span, span(10));
    assert!(project
        .diagnostics
        .iter()
        .any(|d| d.message == "redefinition of record `Point`"));
}

#[test]
fn duplicate_methods_in_one_record() {
    let mut module = ParsedModule::new();
    let n_ty = module.alloc_type(TypeExprKind::Int, span(7));
    let int_ret = module.alloc_type(TypeExprKind::Int, span(8));
    let string_ret = module.alloc_type(TypeExprKind::Str, span(17));
    let mut record = ParsedObject::new(ident("Counter", 0));

    let mut first = ParsedMethod::new(ident("bump", 5));
    first.parameters.push(param("n", 6, n_ty));
    first.ret_type = Some(int_ret);
    let mut second = ParsedMethod::new(ident("bump", 15));
    second.ret_type = Some(string_ret);
    record.methods = vec![first, second];
    module.root.objects.push(record);

    let (project, error) = check_err(&module);
    assert_eq!(error.message, "redefinition of function `bump`");
    assert_eq!(error.span, span(15));
    assert_eq!(project.diagnostics, [error]);

    // The name resolves to the first declaration, whose signature is intact.
    let counter_id = record_in(&project, project.root_scope(), "Counter");
    let bump = function_in(&project, counter_id, "bump");
    assert_eq!(project.functions[bump].return_type_id, TypeId::INT);
    assert_eq!(project.functions[bump].parameters.len(), 1);

    let stubs = &project.records[counter_id].methods;
    assert_eq!(stubs.len(), 2);
    assert_eq!(stubs[0], bump);
    let shadowed = &project.functions[stubs[1]];
    assert_eq!(shadowed.return_type_id, TypeId::STRING);
    assert!(shadowed.parameters.is_empty());
}

#[test]
fn same_names_in_sibling_namespaces() {
    let mut module = ParsedModule::new();
    for (ns_name, at) in [("left", 0), ("right", 20)] {
        let mut ns = ParsedNamespace::named(ns_name);
        let mut record = ParsedObject::new(ident("Point", at));
        record.methods.push(ParsedMethod::new(ident("len", at + 5)));
        ns.objects.push(record);
        module.root.namespaces.push(ns);
    }

    let project = check_ok(&module);
    let root = project.root_scope();
    let namespaces: Vec<ScopeId> = project.scopes[root]
        .children
        .iter()
        .copied()
        .filter(|&child| project.scopes[child].namespace_name.is_some())
        .collect();
    assert_eq!(namespaces.len(), 2);

    let left = record_in(&project, namespaces[0], "Point");
    let right = record_in(&project, namespaces[1], "Point");
    assert_ne!(left, right);
    assert_eq!(project.scopes[namespaces[0]].namespace_name.as_deref(), Some("left"));
    assert!(project.find_record_in_scope(root, "Point").is_none());
}

#[test]
fn nested_namespace_errors_propagate() {
    let mut module = ParsedModule::new();
    let missing = module.named_type("Missing", span(30));
    let mut inner = ParsedNamespace::named("inner");
    let mut record = ParsedObject::new(ident("Holder", 25));
    record.fields.push(field("value", 28, missing));
    inner.objects.push(record);
    module.root.namespaces.push(inner);
    module.root.objects.push(ParsedObject::new(ident("Outer", 0)));

    let (_, error) = check_err(&module);
    assert_eq!(error.span, span(30));
}

// ── First error wins ─────────────────────────────────────────────

#[test]
fn first_error_wins_but_all_records_register() {
    let mut module = ParsedModule::new();
    let first_missing = module.named_type("Nope", span(6));
    let second_missing = module.named_type("AlsoNope", span(16));

    let mut first = ParsedObject::new(ident("First", 0));
    first.fields.push(field("a", 4, first_missing));
    let mut second = ParsedObject::new(ident("Second", 10));
    second.fields.push(field("b", 14, second_missing));
    module.root.objects = vec![first, second];

    let (project, error) = check_err(&module);
    assert_eq!(error.message, "unknown type `Nope`");
    assert_eq!(error.span, span(6));

    let root = project.root_scope();
    let first_id = record_in(&project, root, "First");
    let second_id = record_in(&project, root, "Second");
    assert_eq!(project.records[first_id].fields.len(), 1);
    assert_eq!(project.records[second_id].fields.len(), 1);

    let messages: Vec<&str> = project
        .diagnostics
        .iter()
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(messages, ["unknown type `Nope`", "unknown type `AlsoNope`"]);
}

// ── Constructors ─────────────────────────────────────────────────

#[test]
fn constructor_mirrors_fields() {
    let mut module = ParsedModule::new();
    let x_ty = module.alloc_type(TypeExprKind::Int, span(4));
    let y_ty = module.alloc_type(TypeExprKind::Int, span(8));
    let mut point = ParsedObject::new(ident("Point", 0));
    point.fields.push(field("x", 2, x_ty));
    point.fields.push(field("y", 6, y_ty));
    module.root.objects.push(point);

    let mut project = check_ok(&module);
    let point_id = record_in(&project, project.root_scope(), "Point");
    let constructor_id = function_in(&project, point_id, "Point");
    let point_type = project.record_type_id(point_id);

    let constructor = &project.functions[constructor_id];
    assert_eq!(constructor.return_type_id, point_type);
    assert!(constructor.is_fully_labeled());
    let params: Vec<(&str, TypeId)> = constructor
        .parameters
        .iter()
        .map(|p| (p.variable.name.as_str(), p.variable.type_id))
        .collect();
    assert_eq!(params, [("x", TypeId::INT), ("y", TypeId::INT)]);
    assert_eq!(project.typename_for_type_id(constructor.return_type_id), "Point");

    let record_scope = project.records[point_id].scope_id;
    assert_eq!(project.scopes[constructor.scope_id].parent, Some(record_scope));
}

#[test]
fn constructor_for_record_without_fields() {
    let mut module = ParsedModule::new();
    module.root.objects.push(ParsedObject::new(ident("Marker", 0)));

    let project = check_ok(&module);
    let marker_id = record_in(&project, project.root_scope(), "Marker");
    let constructor_id = function_in(&project, marker_id, "Marker");
    assert!(project.functions[constructor_id].parameters.is_empty());
    assert_eq!(functions_named(&project, "Marker"), 1);
}

#[test]
fn explicit_constructor_is_not_duplicated() {
    let mut module = ParsedModule::new();
    let int = module.alloc_type(TypeExprKind::Int, span(4));
    let arg_ty = module.alloc_type(TypeExprKind::Int, span(14));
    let mut point = ParsedObject::new(ident("Point", 0));
    point.fields.push(field("x", 2, int));
    let mut explicit = ParsedMethod::new(ident("Point", 10));
    explicit.parameters.push(param("value", 12, arg_ty));
    point.methods.push(explicit);
    module.root.objects.push(point);

    let project = check_ok(&module);
    assert_eq!(functions_named(&project, "Point"), 1);
    let point_id = record_in(&project, project.root_scope(), "Point");
    let constructor = &project.functions[function_in(&project, point_id, "Point")];
    assert_eq!(constructor.parameters.len(), 1);
    assert!(!constructor.parameters[0].requires_label);
    assert_eq!(constructor.return_type_id, TypeId::UNIT);
}

#[test]
fn constructor_synthesis_can_be_disabled() {
    let mut module = ParsedModule::new();
    module.root.objects.push(ParsedObject::new(ident("Marker", 0)));

    let options = CheckOptions {
        synthesize_constructors: false,
        ..CheckOptions::default()
    };
    let result = check_with_options(&module, options).expect("no internal error");
    assert!(result.error.is_none());
    assert_eq!(functions_named(&result.project, "Marker"), 0);
}

// ── Methods ──────────────────────────────────────────────────────

#[test]
fn method_signatures_are_finalized() {
    let mut module = ParsedModule::new();
    let amount_ty = module.alloc_type(TypeExprKind::Int, span(12));
    let ret_ty = module.named_type("Counter", span(14));
    let mut counter = ParsedObject::new(ident("Counter", 0));

    let mut add = ParsedMethod::new(ident("add", 10));
    add.parameters.push(param("amount", 11, amount_ty));
    add.ret_type = Some(ret_ty);
    counter.methods.push(add);
    counter.methods.push(ParsedMethod::new(ident("reset", 20)));
    module.root.objects.push(counter);

    let mut project = check_ok(&module);
    let counter_id = record_in(&project, project.root_scope(), "Counter");
    let counter_type = project.record_type_id(counter_id);

    let add = &project.functions[function_in(&project, counter_id, "add")];
    assert_eq!(add.return_type_id, counter_type);
    let amount = project
        .find_var_in_scope(add.scope_id, "amount")
        .expect("parameter bound in method scope");
    assert_eq!(amount.type_id, TypeId::INT);

    let reset = &project.functions[function_in(&project, counter_id, "reset")];
    assert_eq!(reset.return_type_id, TypeId::UNIT);
}

#[test]
fn unresolved_return_type_defaults_to_unit() {
    let mut module = ParsedModule::new();
    let ret_ty = module.named_type("Ghost", span(14));
    let mut record = ParsedObject::new(ident("Holder", 0));
    let mut method = ParsedMethod::new(ident("get", 10));
    method.ret_type = Some(ret_ty);
    record.methods.push(method);
    module.root.objects.push(record);

    let (project, error) = check_err(&module);
    assert_eq!(error.message, "unknown type `Ghost`");
    let holder_id = record_in(&project, project.root_scope(), "Holder");
    let get = &project.functions[function_in(&project, holder_id, "get")];
    assert_eq!(get.return_type_id, TypeId::UNIT);
}

#[test]
fn duplicate_parameter_names() {
    let mut module = ParsedModule::new();
    let a = module.alloc_type(TypeExprKind::Int, span(12));
    let b = module.alloc_type(TypeExprKind::Str, span(16));
    let mut record = ParsedObject::new(ident("Holder", 0));
    let mut method = ParsedMethod::new(ident("set", 10));
    method.parameters.push(param("value", 11, a));
    method.parameters.push(param("value", 15, b));
    record.methods.push(method);
    module.root.objects.push(record);

    let (_, error) = check_err(&module);
    assert_eq!(error.message, "redefinition of variable `value`");
    assert_eq!(error.span, span(15));
}

#[test]
fn method_generics_extend_record_generics() {
    let mut module = ParsedModule::new();
    let u = module.named_type("U", span(14));
    let t = module.named_type("T", span(18));
    let mut boxed = ParsedObject::new(ident("Box", 0));
    boxed.generic_params.push(GenericParameter { id: ident("T", 2) });

    let mut map = ParsedMethod::new(ident("map", 10));
    map.generic_params.push(GenericParameter { id: ident("U", 12) });
    map.parameters.push(param("seed", 13, u));
    map.ret_type = Some(t);
    boxed.methods.push(map);
    module.root.objects.push(boxed);

    let project = check_ok(&module);
    let box_id = record_in(&project, project.root_scope(), "Box");
    let record_t = project.records[box_id].generic_parameters[0];
    let map = &project.functions[function_in(&project, box_id, "map")];

    assert_eq!(map.generic_parameters.len(), 2);
    assert_eq!(map.generic_parameters[0], record_t);
    let method_u = map.generic_parameters[1];
    assert_eq!(map.parameters[0].variable.type_id, method_u);
    assert_eq!(project.types.get(method_u), &CheckedType::TypeVariable("U".into()));
    assert_eq!(map.return_type_id, record_t);

    // `U` is only visible inside the method.
    let box_scope = project.records[box_id].scope_id;
    assert!(project.find_type_in_scope(box_scope, "U").is_none());
}
