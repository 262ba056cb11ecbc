//! Grant channel query fragments.
//!
//! # Responsibility
//! - Build one relation per grant mechanism, each yielding
//!   `(id, type, context_id)` candidates for a single actor.
//!
//! # Invariants
//! - Channels are independent: none reads another channel's output.
//! - Every channel restricts `type` to the names it is given.
//! - `context_id` is always `NULL`; context filtering belongs to the
//!   downstream permission check.
//! - An empty type list yields the empty relation.

use crate::model::entity_type::{EntityType, PERSON_TYPE};
use crate::model::object_ref::PersonId;
use crate::query::{placeholders, Relation};
use rusqlite::types::Value;

/// Value of `custom_attribute_values.attribute_value` for person references.
const PERSON_ATTRIBUTE_VALUE: &str = "Person";

/// The actor's own person row.
///
/// Yields nothing when the actor does not exist.
pub fn person_self_listing(actor: PersonId, entity: &EntityType) -> Relation {
    let Some(table) = entity.table.as_deref() else {
        return Relation::empty();
    };

    Relation::from_sql(
        format!(
            "SELECT person.id AS id, ? AS type, NULL AS context_id
             FROM {table} AS person
             WHERE person.id = ?"
        ),
        vec![Value::Text(entity.name.clone()), Value::Integer(actor)],
    )
}

/// Objects the actor is mapped to through `object_people`.
///
/// Callers skip this channel for creators: a mapping alone does not grant a
/// creator read access.
pub fn object_people(actor: PersonId, type_names: &[&str]) -> Relation {
    if type_names.is_empty() {
        return Relation::empty();
    }

    let mut params = vec![Value::Integer(actor)];
    params.extend(type_values(type_names));
    Relation::from_sql(
        format!(
            "SELECT personable_id AS id, personable_type AS type, NULL AS context_id
             FROM object_people
             WHERE person_id = ?
               AND personable_type IN ({})",
            placeholders(type_names.len())
        ),
        params,
    )
}

/// Objects carrying a person-valued custom attribute that points at the actor.
pub fn custom_attribute_people(actor: PersonId, type_names: &[&str]) -> Relation {
    if type_names.is_empty() {
        return Relation::empty();
    }

    let mut params = vec![
        Value::Text(PERSON_ATTRIBUTE_VALUE.to_string()),
        Value::Integer(actor),
    ];
    params.extend(type_values(type_names));
    Relation::from_sql(
        format!(
            "SELECT attributable_id AS id, attributable_type AS type, NULL AS context_id
             FROM custom_attribute_values
             WHERE attribute_value = ?
               AND attribute_object_id = ?
               AND attributable_type IN ({})",
            placeholders(type_names.len())
        ),
        params,
    )
}

/// Objects related to the actor's person row, in either edge direction.
pub fn relationship_assignments(actor: PersonId, type_names: &[&str]) -> Relation {
    if type_names.is_empty() {
        return Relation::empty();
    }

    let in_list = placeholders(type_names.len());

    let mut destination_params = vec![Value::Text(PERSON_TYPE.to_string()), Value::Integer(actor)];
    destination_params.extend(type_values(type_names));
    let as_source = Relation::from_sql(
        format!(
            "SELECT destination_id AS id, destination_type AS type, NULL AS context_id
             FROM relationships
             WHERE source_type = ?
               AND source_id = ?
               AND destination_type IN ({in_list})"
        ),
        destination_params,
    );

    let mut source_params = vec![Value::Text(PERSON_TYPE.to_string()), Value::Integer(actor)];
    source_params.extend(type_values(type_names));
    let as_destination = Relation::from_sql(
        format!(
            "SELECT source_id AS id, source_type AS type, NULL AS context_id
             FROM relationships
             WHERE destination_type = ?
               AND destination_id = ?
               AND source_type IN ({in_list})"
        ),
        source_params,
    );

    Relation::union(vec![as_source, as_destination])
}

/// Instances of one context-scoped type whose context the actor holds a
/// legacy user role in.
///
/// The join key is the type's own `context_id` column, so this is built once
/// per type.
pub fn context_role_grants(actor: PersonId, entity: &EntityType) -> Relation {
    let Some(table) = entity.table.as_deref() else {
        return Relation::empty();
    };

    Relation::from_sql(
        format!(
            "SELECT scoped.id AS id, ? AS type, NULL AS context_id
             FROM {table} AS scoped
             JOIN user_roles
               ON user_roles.context_id = scoped.context_id
              AND user_roles.person_id = ?"
        ),
        vec![Value::Text(entity.name.clone()), Value::Integer(actor)],
    )
}

/// Objects the actor holds an access-control role on, where the role is both
/// shown on "my work" and read-granting.
pub fn custom_role_grants(actor: PersonId, type_names: &[&str]) -> Relation {
    if type_names.is_empty() {
        return Relation::empty();
    }

    let mut params = vec![Value::Integer(actor)];
    params.extend(type_values(type_names));
    Relation::from_sql(
        format!(
            "SELECT acl.object_id AS id, acl.object_type AS type, NULL AS context_id
             FROM access_control_list AS acl
             JOIN access_control_roles AS role
               ON role.id = acl.ac_role_id
             WHERE acl.person_id = ?
               AND acl.object_type IN ({})
               AND role.my_work = 1
               AND role.read = 1",
            placeholders(type_names.len())
        ),
        params,
    )
}

fn type_values<'a>(type_names: &'a [&'a str]) -> impl Iterator<Item = Value> + 'a {
    type_names
        .iter()
        .map(|name| Value::Text((*name).to_string()))
}

#[cfg(test)]
mod tests {
    use super::{
        context_role_grants, custom_attribute_people, custom_role_grants, object_people,
        person_self_listing, relationship_assignments,
    };
    use crate::model::entity_type::EntityType;
    use rusqlite::types::Value;

    #[test]
    fn empty_type_list_yields_empty_relation() {
        assert!(object_people(1, &[]).is_empty_relation());
        assert!(custom_attribute_people(1, &[]).is_empty_relation());
        assert!(relationship_assignments(1, &[]).is_empty_relation());
        assert!(custom_role_grants(1, &[]).is_empty_relation());
    }

    #[test]
    fn placeholder_count_matches_params() {
        let relations = [
            object_people(3, &["Risk", "Control"]),
            custom_attribute_people(3, &["Risk", "Control"]),
            relationship_assignments(3, &["Risk", "Control"]),
            custom_role_grants(3, &["Risk", "Control"]),
            context_role_grants(3, &EntityType::generic("Program").with_table("programs")),
            person_self_listing(3, &EntityType::generic("Person").with_table("people")),
        ];

        for relation in relations {
            assert_eq!(
                relation.sql().matches('?').count(),
                relation.params().len(),
                "placeholder mismatch in {}",
                relation.sql()
            );
        }
    }

    #[test]
    fn type_names_bind_in_order_after_actor() {
        let relation = object_people(5, &["Risk", "Control", "Issue"]);
        assert_eq!(
            relation.params(),
            &[
                Value::Integer(5),
                Value::Text("Risk".to_string()),
                Value::Text("Control".to_string()),
                Value::Text("Issue".to_string()),
            ]
        );
    }

    #[test]
    fn relationship_channel_binds_both_directions() {
        let relation = relationship_assignments(8, &["Control"]);
        let actor_bindings = relation
            .params()
            .iter()
            .filter(|value| **value == Value::Integer(8))
            .count();
        assert_eq!(actor_bindings, 2);
        assert!(relation.sql().contains("UNION"));
    }

    #[test]
    fn table_channels_without_table_are_empty() {
        assert!(context_role_grants(1, &EntityType::generic("Program")).is_empty_relation());
        assert!(person_self_listing(1, &EntityType::generic("Person")).is_empty_relation());
    }
}
