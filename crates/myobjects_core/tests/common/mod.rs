#![allow(dead_code)]

use myobjects_core::db::open_db_in_memory;
use myobjects_core::{ObjectReference, TaskStatus};
use rusqlite::{params, Connection};
use std::collections::BTreeSet;

pub const ACTOR: i64 = 1;
pub const OTHER_PERSON: i64 = 2;

/// In-memory grant store with row builders for each grant table.
pub struct Store {
    pub conn: Connection,
}

impl Store {
    /// Migrated store holding the actor and one other person.
    pub fn new() -> Self {
        let store = Self {
            conn: open_db_in_memory().unwrap(),
        };
        store.person(ACTOR, "actor@example.com");
        store.person(OTHER_PERSON, "other@example.com");
        store
    }

    pub fn person(&self, id: i64, email: &str) {
        self.conn
            .execute(
                "INSERT INTO people (id, email) VALUES (?1, ?2);",
                params![id, email],
            )
            .unwrap();
    }

    pub fn map_object_person(&self, person_id: i64, object_id: i64, object_type: &str) {
        self.conn
            .execute(
                "INSERT INTO object_people (person_id, personable_id, personable_type)
                 VALUES (?1, ?2, ?3);",
                params![person_id, object_id, object_type],
            )
            .unwrap();
    }

    pub fn custom_attribute(
        &self,
        attribute_value: &str,
        attribute_object_id: i64,
        object_id: i64,
        object_type: &str,
    ) {
        self.conn
            .execute(
                "INSERT INTO custom_attribute_values
                    (attributable_id, attributable_type, attribute_value, attribute_object_id)
                 VALUES (?1, ?2, ?3, ?4);",
                params![object_id, object_type, attribute_value, attribute_object_id],
            )
            .unwrap();
    }

    pub fn relationship(
        &self,
        source_id: i64,
        source_type: &str,
        destination_id: i64,
        destination_type: &str,
    ) {
        self.conn
            .execute(
                "INSERT INTO relationships (source_id, source_type, destination_id, destination_type)
                 VALUES (?1, ?2, ?3, ?4);",
                params![source_id, source_type, destination_id, destination_type],
            )
            .unwrap();
    }

    pub fn role(&self, name: &str, object_type: &str, my_work: bool, read: bool) -> i64 {
        self.conn
            .execute(
                "INSERT INTO access_control_roles (name, object_type, my_work, read)
                 VALUES (?1, ?2, ?3, ?4);",
                params![name, object_type, my_work, read],
            )
            .unwrap();
        self.conn.last_insert_rowid()
    }

    pub fn acl(&self, person_id: i64, role_id: i64, object_id: i64, object_type: &str) {
        self.conn
            .execute(
                "INSERT INTO access_control_list (person_id, ac_role_id, object_id, object_type)
                 VALUES (?1, ?2, ?3, ?4);",
                params![person_id, role_id, object_id, object_type],
            )
            .unwrap();
    }

    pub fn context(&self, id: i64) {
        self.conn
            .execute("INSERT INTO contexts (id) VALUES (?1);", [id])
            .unwrap();
    }

    pub fn user_role(&self, person_id: i64, context_id: i64, role_name: &str) {
        self.conn
            .execute(
                "INSERT INTO user_roles (person_id, context_id, role_name) VALUES (?1, ?2, ?3);",
                params![person_id, context_id, role_name],
            )
            .unwrap();
    }

    pub fn program(&self, id: i64, context_id: Option<i64>) {
        self.conn
            .execute(
                "INSERT INTO programs (id, title, context_id) VALUES (?1, 'program', ?2);",
                params![id, context_id],
            )
            .unwrap();
    }

    pub fn audit(&self, id: i64, context_id: Option<i64>) {
        self.conn
            .execute(
                "INSERT INTO audits (id, title, context_id) VALUES (?1, 'audit', ?2);",
                params![id, context_id],
            )
            .unwrap();
    }

    pub fn workflow(&self, id: i64, kind: Option<&str>, context_id: Option<i64>) {
        self.conn
            .execute(
                "INSERT INTO workflows (id, title, kind, context_id) VALUES (?1, 'workflow', ?2, ?3);",
                params![id, kind, context_id],
            )
            .unwrap();
    }

    pub fn cycle(&self, id: i64, workflow_id: i64, is_current: bool, is_verification_needed: bool) {
        self.conn
            .execute(
                "INSERT INTO cycles (id, workflow_id, is_current, is_verification_needed)
                 VALUES (?1, ?2, ?3, ?4);",
                params![id, workflow_id, is_current, is_verification_needed],
            )
            .unwrap();
    }

    pub fn task(&self, id: i64, cycle_id: i64, status: TaskStatus) {
        self.conn
            .execute(
                "INSERT INTO cycle_task_group_object_tasks (id, cycle_id, title, status)
                 VALUES (?1, ?2, 'task', ?3);",
                params![id, cycle_id, status.as_db_str()],
            )
            .unwrap();
    }
}

/// Candidate identities, for order-insensitive comparison.
pub fn identities(references: &[ObjectReference]) -> BTreeSet<(i64, String)> {
    references
        .iter()
        .map(|reference| (reference.id, reference.kind.clone()))
        .collect()
}

pub fn expected(pairs: &[(i64, &str)]) -> BTreeSet<(i64, String)> {
    pairs
        .iter()
        .map(|(id, kind)| (*id, kind.to_string()))
        .collect()
}

pub fn types(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}
