//! End-to-end tests for the read-graph walk, built on the fake host
//! workspace.

use embedql_host::{DeclarationShape, HostKind, HostNodeId};
use embedql_resolver::FieldPathTable;
use embedql_test_utils::{occurrence, FakeWorkspace};
use embedql_types::{FileId, OffsetRange};
use embedql_usage::{compute_usage, unused_leaves, Binding};

const FILE: FileId = FileId::new(0);

fn table(doc: &str) -> FieldPathTable {
    let occ = occurrence(FILE, 0, doc);
    let ws = FakeWorkspace::new();
    let resolved = embedql_resolver::resolve(&occ, &ws);
    embedql_resolver::field_paths(&resolved).unwrap()
}

fn binding(ws: &mut FakeWorkspace, name: &str) -> Binding {
    let declaration = ws.declare(FILE, name, DeclarationShape::Opaque);
    Binding {
        name: name.into(),
        file: FILE,
        declaration,
    }
}

fn node(ws: &mut FakeWorkspace, parent: Option<HostNodeId>, kind: HostKind, text: Option<&str>) -> HostNodeId {
    let text = text.map(Into::into);
    match parent {
        Some(p) => ws.tree_mut().alloc_child(p, kind, text, OffsetRange::at(0)),
        None => ws.tree_mut().alloc(kind, text, OffsetRange::at(0)),
    }
}

#[test]
fn destructured_name_leaves_attacks_unused() {
    let table = table("{ id name attacks { fast { damage name } } }");
    let mut ws = FakeWorkspace::new();
    let result = binding(&mut ws, "result");

    // const { name } = result;
    let var_decl = node(&mut ws, None, HostKind::VarDecl, None);
    let pattern = node(&mut ws, Some(var_decl), HostKind::ObjectPattern, None);
    let field = node(&mut ws, Some(pattern), HostKind::PatternField, Some("name"));
    node(&mut ws, Some(field), HostKind::Identifier, Some("name"));
    ws.reference_ident(result.declaration, FILE, Some(var_decl), "result");

    let report = compute_usage(&table, &result, ws.tree(), &ws);
    assert!(report.is_used("name"));
    assert!(!report.is_used("attacks"));
    assert!(!report.bailed);

    let groups = unused_leaves(&table, &report);
    assert_eq!(groups.len(), 1, "expected a single group: {groups:?}");
    assert_eq!(groups[0].anchor.path.as_ref(), "attacks.fast");
    let leaves: Vec<&str> = groups[0].leaves.iter().map(|l| l.path.as_ref()).collect();
    // `id` is reserved and never reported
    assert_eq!(leaves, vec!["attacks.fast.damage", "attacks.fast.name"]);
}

#[test]
fn unknown_destructured_names_are_ignored() {
    let table = table("{ name }");
    let mut ws = FakeWorkspace::new();
    let result = binding(&mut ws, "result");

    // const { nonexistent } = result;
    let var_decl = node(&mut ws, None, HostKind::VarDecl, None);
    let pattern = node(&mut ws, Some(var_decl), HostKind::ObjectPattern, None);
    let field = node(&mut ws, Some(pattern), HostKind::PatternField, Some("nonexistent"));
    node(&mut ws, Some(field), HostKind::Identifier, Some("nonexistent"));
    ws.reference_ident(result.declaration, FILE, Some(var_decl), "result");

    let report = compute_usage(&table, &result, ws.tree(), &ws);
    assert!(report.access_paths().is_empty());
}

#[test]
fn returning_the_result_marks_everything_used() {
    let table = table("{ id name attacks { fast { damage } } }");
    let mut ws = FakeWorkspace::new();
    let result = binding(&mut ws, "result");

    // return result;
    let ret = node(&mut ws, None, HostKind::Return, None);
    ws.reference_ident(result.declaration, FILE, Some(ret), "result");

    let report = compute_usage(&table, &result, ws.tree(), &ws);
    assert!(report.bailed);
    assert!(report.is_used("attacks.fast.damage"));
    assert!(unused_leaves(&table, &report).is_empty());
}

#[test]
fn map_callback_reads_element_fields() {
    let table = table("{ todos { id text completed } }");
    let mut ws = FakeWorkspace::new();
    let result = binding(&mut ws, "result");

    // const texts = result.todos.map(t => t.text);
    let var_decl = node(&mut ws, None, HostKind::VarDecl, None);
    node(&mut ws, Some(var_decl), HostKind::Identifier, Some("texts"));
    let call = node(&mut ws, Some(var_decl), HostKind::Call, Some("map"));
    let todos = node(&mut ws, Some(call), HostKind::PropertyAccess, Some("todos"));
    ws.reference_ident(result.declaration, FILE, Some(todos), "result");
    let callback = node(&mut ws, Some(call), HostKind::Function, None);
    let param = node(&mut ws, Some(callback), HostKind::Param, Some("t"));
    let t_decl = ws.declare_at(FILE, "t", Some(param), DeclarationShape::Opaque);
    let text_access = node(&mut ws, Some(callback), HostKind::PropertyAccess, Some("text"));
    ws.reference_ident(t_decl, FILE, Some(text_access), "t");

    let report = compute_usage(&table, &result, ws.tree(), &ws);
    assert!(report.is_used("todos"));
    assert!(report.is_used("todos.text"));
    assert!(!report.bailed);

    let groups = unused_leaves(&table, &report);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].anchor.path.as_ref(), "todos");
    assert_eq!(groups[0].leaves[0].path.as_ref(), "todos.completed");
}

#[test]
fn return_inside_array_callback_does_not_bail() {
    let table = table("{ todos { text completed } }");
    let mut ws = FakeWorkspace::new();
    let result = binding(&mut ws, "result");

    // result.todos.map(t => { return t.text; });
    let call = node(&mut ws, None, HostKind::Call, Some("map"));
    let todos = node(&mut ws, Some(call), HostKind::PropertyAccess, Some("todos"));
    ws.reference_ident(result.declaration, FILE, Some(todos), "result");
    let callback = node(&mut ws, Some(call), HostKind::Function, None);
    let param = node(&mut ws, Some(callback), HostKind::Param, Some("t"));
    let t_decl = ws.declare_at(FILE, "t", Some(param), DeclarationShape::Opaque);
    let ret = node(&mut ws, Some(callback), HostKind::Return, None);
    let text_access = node(&mut ws, Some(ret), HostKind::PropertyAccess, Some("text"));
    ws.reference_ident(t_decl, FILE, Some(text_access), "t");

    let report = compute_usage(&table, &result, ws.tree(), &ws);
    assert!(report.is_used("todos.text"));
    assert!(!report.bailed);
    assert_eq!(unused_leaves(&table, &report).len(), 1); // todos.completed
}

#[test]
fn reduce_skips_the_accumulator_parameter() {
    let table = table("{ items { price qty } }");
    let mut ws = FakeWorkspace::new();
    let result = binding(&mut ws, "result");

    // const total = result.items.reduce((acc, item) => acc + item.price, 0);
    let var_decl = node(&mut ws, None, HostKind::VarDecl, None);
    node(&mut ws, Some(var_decl), HostKind::Identifier, Some("total"));
    let call = node(&mut ws, Some(var_decl), HostKind::Call, Some("reduce"));
    let items = node(&mut ws, Some(call), HostKind::PropertyAccess, Some("items"));
    ws.reference_ident(result.declaration, FILE, Some(items), "result");
    let callback = node(&mut ws, Some(call), HostKind::Function, None);
    node(&mut ws, Some(callback), HostKind::Param, Some("acc"));
    let item_param = node(&mut ws, Some(callback), HostKind::Param, Some("item"));
    let item_decl = ws.declare_at(FILE, "item", Some(item_param), DeclarationShape::Opaque);
    let price_access = node(&mut ws, Some(callback), HostKind::PropertyAccess, Some("price"));
    ws.reference_ident(item_decl, FILE, Some(price_access), "item");

    let report = compute_usage(&table, &result, ws.tree(), &ws);
    assert!(report.is_used("items.price"));

    let groups = unused_leaves(&table, &report);
    assert_eq!(groups[0].leaves[0].path.as_ref(), "items.qty");
}

#[test]
fn guards_are_transparent() {
    let table = table("{ attacks { fast { damage } } }");
    let mut ws = FakeWorkspace::new();
    let result = binding(&mut ws, "result");

    // const d = result?.attacks!.fast.damage;
    let var_decl = node(&mut ws, None, HostKind::VarDecl, None);
    node(&mut ws, Some(var_decl), HostKind::Identifier, Some("d"));
    let damage = node(&mut ws, Some(var_decl), HostKind::PropertyAccess, Some("damage"));
    let fast = node(&mut ws, Some(damage), HostKind::PropertyAccess, Some("fast"));
    let guard_outer = node(&mut ws, Some(fast), HostKind::Guard, None);
    let attacks = node(&mut ws, Some(guard_outer), HostKind::PropertyAccess, Some("attacks"));
    let guard_inner = node(&mut ws, Some(attacks), HostKind::Guard, None);
    ws.reference_ident(result.declaration, FILE, Some(guard_inner), "result");

    let report = compute_usage(&table, &result, ws.tree(), &ws);
    assert!(report.is_used("attacks"));
    assert!(report.is_used("attacks.fast"));
    assert!(report.is_used("attacks.fast.damage"));
    assert!(unused_leaves(&table, &report).is_empty());
}

#[test]
fn reassignment_carries_the_prefix() {
    let table = table("{ name email }");
    let mut ws = FakeWorkspace::new();
    let result = binding(&mut ws, "result");
    let alias_decl = ws.declare(FILE, "alias", DeclarationShape::Opaque);

    // const alias = result;
    let var_decl = node(&mut ws, None, HostKind::VarDecl, None);
    node(&mut ws, Some(var_decl), HostKind::Identifier, Some("alias"));
    ws.reference_ident(result.declaration, FILE, Some(var_decl), "result");

    // alias.name
    let name_access = node(&mut ws, None, HostKind::PropertyAccess, Some("name"));
    ws.reference_ident(alias_decl, FILE, Some(name_access), "alias");

    let report = compute_usage(&table, &result, ws.tree(), &ws);
    assert!(report.is_used("name"));

    let groups = unused_leaves(&table, &report);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].anchor.path.as_ref(), "email");
}

#[test]
fn data_wrapper_is_unwrapped_without_extending_the_path() {
    let table = table("{ name email }");
    let mut ws = FakeWorkspace::new();
    let response = binding(&mut ws, "response");

    // const { data: { name } } = response;
    let var_decl = node(&mut ws, None, HostKind::VarDecl, None);
    let pattern = node(&mut ws, Some(var_decl), HostKind::ObjectPattern, None);
    let data_field = node(&mut ws, Some(pattern), HostKind::PatternField, Some("data"));
    let inner = node(&mut ws, Some(data_field), HostKind::ObjectPattern, None);
    let name_field = node(&mut ws, Some(inner), HostKind::PatternField, Some("name"));
    node(&mut ws, Some(name_field), HostKind::Identifier, Some("name"));
    ws.reference_ident(response.declaration, FILE, Some(var_decl), "response");

    let report = compute_usage(&table, &response, ws.tree(), &ws);
    assert!(report.is_used("name"));
    assert!(!report.is_used("data"));

    let groups = unused_leaves(&table, &report);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].anchor.path.as_ref(), "email");
}

#[test]
fn data_access_chain_is_unwrapped_without_extending_the_path() {
    let table = table("{ name email }");
    let mut ws = FakeWorkspace::new();
    let response = binding(&mut ws, "response");

    // const n = response.data.name;
    let var_decl = node(&mut ws, None, HostKind::VarDecl, None);
    node(&mut ws, Some(var_decl), HostKind::Identifier, Some("n"));
    let name_access = node(&mut ws, Some(var_decl), HostKind::PropertyAccess, Some("name"));
    let data_access = node(&mut ws, Some(name_access), HostKind::PropertyAccess, Some("data"));
    ws.reference_ident(response.declaration, FILE, Some(data_access), "response");

    let report = compute_usage(&table, &response, ws.tree(), &ws);
    assert!(report.is_used("name"));
    assert!(!report.is_used("data"));

    let groups = unused_leaves(&table, &report);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].anchor.path.as_ref(), "email");
}

#[test]
fn circular_aliases_terminate() {
    let table = table("{ name }");
    let mut ws = FakeWorkspace::new();
    let a = binding(&mut ws, "a");
    let b_decl = ws.declare(FILE, "b", DeclarationShape::Opaque);

    // const b = a;
    let decl_b = node(&mut ws, None, HostKind::VarDecl, None);
    node(&mut ws, Some(decl_b), HostKind::Identifier, Some("b"));
    ws.reference_ident(a.declaration, FILE, Some(decl_b), "a");

    // const a = b; (cyclic shadowing as the resolver sees it)
    let decl_a = node(&mut ws, None, HostKind::VarDecl, None);
    node(&mut ws, Some(decl_a), HostKind::Identifier, Some("a"));
    ws.reference_ident(b_decl, FILE, Some(decl_a), "b");

    let report = compute_usage(&table, &a, ws.tree(), &ws);
    // Terminates without recording anything; nothing was actually read.
    assert!(report.access_paths().is_empty());
}

#[test]
fn array_pattern_position_keeps_the_prefix() {
    let table = table("{ name email }");
    let mut ws = FakeWorkspace::new();
    let result = binding(&mut ws, "result");
    let first_decl = ws.declare(FILE, "first", DeclarationShape::Opaque);

    // const [first] = result; first.email
    let var_decl = node(&mut ws, None, HostKind::VarDecl, None);
    let array_pattern = node(&mut ws, Some(var_decl), HostKind::ArrayPattern, None);
    node(&mut ws, Some(array_pattern), HostKind::Identifier, Some("first"));
    ws.reference_ident(result.declaration, FILE, Some(var_decl), "result");

    let email_access = node(&mut ws, None, HostKind::PropertyAccess, Some("email"));
    ws.reference_ident(first_decl, FILE, Some(email_access), "first");

    let report = compute_usage(&table, &result, ws.tree(), &ws);
    assert!(report.is_used("email"));
    assert!(!report.is_used("name"));
}
