mod common;

use common::{expected, identities, types, Store, ACTOR, OTHER_PERSON};
use myobjects_core::MyObjectsResolver;
use std::collections::BTreeSet;

fn resolve(store: &Store, names: &[&str], is_creator: bool) -> BTreeSet<(i64, String)> {
    let resolver = MyObjectsResolver::default();
    let requested = types(names);
    let relation = resolver.resolve_visible_objects(Some(&requested), ACTOR, is_creator);
    identities(&relation.fetch_all(&store.conn).unwrap())
}

#[test]
fn object_person_mapping_contributes_for_non_creators() {
    let store = Store::new();
    store.map_object_person(ACTOR, 5, "Risk");
    store.map_object_person(OTHER_PERSON, 6, "Risk");

    assert_eq!(resolve(&store, &["Risk"], false), expected(&[(5, "Risk")]));
}

#[test]
fn object_person_mapping_is_ignored_for_creators() {
    let store = Store::new();
    store.map_object_person(ACTOR, 5, "Risk");

    assert!(resolve(&store, &["Risk"], true).is_empty());
}

#[test]
fn person_custom_attribute_contributes() {
    let store = Store::new();
    store.custom_attribute("Person", ACTOR, 11, "Control");
    store.custom_attribute("Person", OTHER_PERSON, 12, "Control");
    store.custom_attribute("Text", ACTOR, 13, "Control");

    assert_eq!(
        resolve(&store, &["Control"], true),
        expected(&[(11, "Control")])
    );
}

#[test]
fn relationships_are_followed_in_both_directions() {
    let store = Store::new();
    store.relationship(ACTOR, "Person", 9, "Control");
    store.relationship(12, "Control", ACTOR, "Person");
    store.relationship(OTHER_PERSON, "Person", 13, "Control");
    // Not a person edge, even though the id matches the actor.
    store.relationship(ACTOR, "Risk", 14, "Control");

    assert_eq!(
        resolve(&store, &["Control"], false),
        expected(&[(9, "Control"), (12, "Control")])
    );
}

#[test]
fn acl_grant_requires_my_work_and_read_flags() {
    let store = Store::new();
    let owner = store.role("Admin", "Risk", true, true);
    let hidden = store.role("Auditor", "Risk", false, true);
    let no_read = store.role("Reviewer", "Risk", true, false);
    store.acl(ACTOR, owner, 20, "Risk");
    store.acl(ACTOR, hidden, 21, "Risk");
    store.acl(ACTOR, no_read, 22, "Risk");
    store.acl(OTHER_PERSON, owner, 23, "Risk");

    assert_eq!(resolve(&store, &["Risk"], false), expected(&[(20, "Risk")]));
}

#[test]
fn flipping_either_role_flag_removes_the_object() {
    let store = Store::new();
    let role = store.role("Admin", "Risk", true, true);
    store.acl(ACTOR, role, 20, "Risk");
    assert_eq!(resolve(&store, &["Risk"], false), expected(&[(20, "Risk")]));

    store
        .conn
        .execute("UPDATE access_control_roles SET read = 0 WHERE id = ?1;", [role])
        .unwrap();
    assert!(resolve(&store, &["Risk"], false).is_empty());

    store
        .conn
        .execute(
            "UPDATE access_control_roles SET read = 1, my_work = 0 WHERE id = ?1;",
            [role],
        )
        .unwrap();
    assert!(resolve(&store, &["Risk"], false).is_empty());
}

#[test]
fn context_role_grants_each_context_scoped_type() {
    let store = Store::new();
    store.context(30);
    store.context(31);
    store.program(3, Some(30));
    store.program(4, Some(31));
    store.program(5, None);
    store.audit(7, Some(30));
    store.workflow(8, None, Some(30));
    store.user_role(ACTOR, 30, "ProgramEditor");
    store.user_role(OTHER_PERSON, 31, "ProgramEditor");

    assert_eq!(
        resolve(&store, &["Program", "Audit", "Workflow"], false),
        expected(&[(3, "Program"), (7, "Audit"), (8, "Workflow")])
    );
}

#[test]
fn context_role_grants_collapse_multiple_user_roles() {
    let store = Store::new();
    store.context(30);
    store.program(3, Some(30));
    store.user_role(ACTOR, 30, "ProgramOwner");
    store.user_role(ACTOR, 30, "ProgramReader");

    let resolver = MyObjectsResolver::default();
    let requested = types(&["Program"]);
    let rows = resolver
        .resolve_visible_objects(Some(&requested), ACTOR, false)
        .fetch_all(&store.conn)
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn context_role_is_not_applied_to_unrequested_types() {
    let store = Store::new();
    store.context(30);
    store.program(3, Some(30));
    store.user_role(ACTOR, 30, "ProgramEditor");

    assert!(resolve(&store, &["Risk"], false).is_empty());
}

#[test]
fn person_type_lists_the_actor_only() {
    let store = Store::new();

    assert_eq!(
        resolve(&store, &["Person"], true),
        expected(&[(ACTOR, "Person")])
    );
}

#[test]
fn backlog_workflows_are_included_when_workflows_are_requested() {
    let store = Store::new();
    store.workflow(40, Some("Backlog"), None);
    store.workflow(41, None, None);

    assert_eq!(
        resolve(&store, &["Workflow"], true),
        expected(&[(40, "Workflow")])
    );
    assert!(resolve(&store, &["Risk"], true).is_empty());
}

#[test]
fn candidates_never_carry_a_context_id() {
    let store = Store::new();
    store.context(30);
    store.program(3, Some(30));
    store.user_role(ACTOR, 30, "ProgramEditor");
    store.map_object_person(ACTOR, 5, "Risk");

    let resolver = MyObjectsResolver::default();
    let rows = resolver
        .resolve_visible_objects(None, ACTOR, false)
        .fetch_all(&store.conn)
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.context_id.is_none()));
}
