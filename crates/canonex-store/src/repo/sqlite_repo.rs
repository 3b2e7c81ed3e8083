//! SQLite repository implementation
//!
//! Row-level persistence of examples and canonical key claims. Every
//! function takes a `&Connection`; pass a `Transaction` (which derefs to
//! one) to group writes.

#![allow(clippy::result_large_err)]

use std::sync::Mutex;

use canonex_core::errors::{ExError, ExErrorKind};
use canonex_core::model::{EntityScope, EntitySpan, Example, GroupingKey};
use canonex_core::{ChangeSet, ExampleRepository};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::errors::{config_mismatch, from_rusqlite, from_serde_json, invalid_timestamp, Result};

const META_ENTITY_SCOPE: &str = "entity_scope";

const EXAMPLE_COLUMNS: &str = "id, text, intent, entities, canonical, created_at, updated_at";

/// SQLite repository for examples and canonical keys
pub struct SqliteRepo;

impl SqliteRepo {
    /// Insert or update an example
    ///
    /// New rows are appended to the insertion order; updates keep their
    /// position.
    pub fn persist_example(conn: &Connection, example: &Example) -> Result<()> {
        let entities = serde_json::to_string(&example.entities)
            .map_err(|e| from_serde_json("entities", e))?;

        conn.execute(
            "INSERT INTO examples (id, seq, text, intent, entities, canonical, created_at, updated_at)
             VALUES (?1, (SELECT COALESCE(MAX(seq), 0) + 1 FROM examples), ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                text = excluded.text,
                intent = excluded.intent,
                entities = excluded.entities,
                canonical = excluded.canonical,
                updated_at = excluded.updated_at",
            rusqlite::params![
                example.id,
                example.text,
                example.intent,
                entities,
                if example.canonical { 1 } else { 0 },
                example.created_at.timestamp_millis(),
                example.updated_at.timestamp_millis(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    pub fn delete_example(conn: &Connection, example_id: &str) -> Result<()> {
        conn.execute("DELETE FROM examples WHERE id = ?1", [example_id])
            .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn get_example(conn: &Connection, example_id: &str) -> Result<Option<Example>> {
        let sql = format!("SELECT {} FROM examples WHERE id = ?1", EXAMPLE_COLUMNS);
        let row = conn
            .query_row(&sql, [example_id], read_example_row)
            .optional()
            .map_err(from_rusqlite)?;
        row.map(decode_example).transpose()
    }

    /// All examples in insertion order
    pub fn list_examples(conn: &Connection) -> Result<Vec<Example>> {
        let sql = format!("SELECT {} FROM examples ORDER BY seq", EXAMPLE_COLUMNS);
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], read_example_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        rows.into_iter().map(decode_example).collect()
    }

    /// Map `key` to `example_id`, replacing any previous holder
    pub fn claim_key(conn: &Connection, key: &GroupingKey, example_id: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO canonical_keys (key, example_id, claimed_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                example_id = excluded.example_id,
                claimed_at = excluded.claimed_at",
            rusqlite::params![encode_key(key)?, example_id, Utc::now().timestamp_millis()],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn release_key(conn: &Connection, key: &GroupingKey) -> Result<()> {
        conn.execute(
            "DELETE FROM canonical_keys WHERE key = ?1",
            [encode_key(key)?],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Every (key, holder id) pair, ordered by encoded key
    pub fn list_claims(conn: &Connection) -> Result<Vec<(GroupingKey, String)>> {
        let mut stmt = conn
            .prepare("SELECT key, example_id FROM canonical_keys ORDER BY key")
            .map_err(from_rusqlite)?;
        let rows: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        rows.into_iter()
            .map(|(key, id)| Ok((decode_key(&key)?, id)))
            .collect()
    }

    /// Apply a change set: deletes, upserts, key releases, key claims
    pub fn apply_changes(conn: &Connection, changes: &ChangeSet) -> Result<()> {
        for id in &changes.deleted {
            Self::delete_example(conn, id)?;
        }
        for example in &changes.upserted {
            Self::persist_example(conn, example)?;
        }
        for key in &changes.released {
            Self::release_key(conn, key)?;
        }
        for (key, id) in &changes.claimed {
            Self::claim_key(conn, key, id)?;
        }
        Ok(())
    }

    /// Record the entity scope on first use, reject a different one later
    ///
    /// Stored keys are only meaningful under the scope that produced them.
    pub fn ensure_entity_scope(conn: &Connection, scope: EntityScope) -> Result<()> {
        let wanted = scope_name(scope);
        let stored: Option<String> = conn
            .query_row(
                "SELECT value FROM store_meta WHERE name = ?1",
                [META_ENTITY_SCOPE],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;

        match stored {
            Some(stored) if stored == wanted => Ok(()),
            Some(stored) => Err(config_mismatch(&format!(
                "Database was created with entity_scope = {}, configuration asks for {}",
                stored, wanted
            ))),
            None => {
                conn.execute(
                    "INSERT INTO store_meta (name, value) VALUES (?1, ?2)",
                    [META_ENTITY_SCOPE, wanted],
                )
                .map_err(from_rusqlite)?;
                Ok(())
            }
        }
    }
}

/// Transactional [`ExampleRepository`] over one SQLite connection
pub struct SqliteExampleRepository {
    conn: Mutex<Connection>,
}

impl SqliteExampleRepository {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl ExampleRepository for SqliteExampleRepository {
    fn commit(&self, changes: &ChangeSet) -> Result<()> {
        let mut conn = self.conn.lock().map_err(|_| {
            ExError::new(ExErrorKind::Concurrency)
                .with_op("sqlite_commit")
                .with_message("connection lock poisoned")
        })?;

        let tx = conn.transaction().map_err(from_rusqlite)?;
        SqliteRepo::apply_changes(&tx, changes)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(())
    }
}

type ExampleRow = (String, String, Option<String>, String, i64, i64, i64);

fn read_example_row(row: &Row<'_>) -> rusqlite::Result<ExampleRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn decode_example(row: ExampleRow) -> Result<Example> {
    let (id, text, intent, entities_json, canonical, created_at, updated_at) = row;
    let entities: Vec<EntitySpan> =
        serde_json::from_str(&entities_json).map_err(|e| from_serde_json("entities", e))?;

    let mut example = Example::new(id, text).with_entities(entities);
    example.intent = intent;
    example.canonical = canonical != 0;
    example.created_at = from_millis("created_at", created_at)?;
    example.updated_at = from_millis("updated_at", updated_at)?;
    Ok(example)
}

fn from_millis(column: &str, millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| invalid_timestamp(column, millis))
}

fn encode_key(key: &GroupingKey) -> Result<String> {
    key.encode().map_err(ExError::from)
}

fn decode_key(text: &str) -> Result<GroupingKey> {
    GroupingKey::decode(text).map_err(ExError::from)
}

fn scope_name(scope: EntityScope) -> &'static str {
    match scope {
        EntityScope::Global => "global",
        EntityScope::PerIntent => "per_intent",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::apply_migrations;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_persist_and_get_example() {
        let conn = setup();
        let example = Example::new("ex-1".to_string(), "hello paris".to_string())
            .with_intent("greet")
            .with_entities(vec![EntitySpan::new("city", "paris", 6, 11)]);

        SqliteRepo::persist_example(&conn, &example).unwrap();
        let loaded = SqliteRepo::get_example(&conn, "ex-1").unwrap().unwrap();

        assert_eq!(loaded.text, "hello paris");
        assert_eq!(loaded.intent.as_deref(), Some("greet"));
        assert_eq!(loaded.entities, example.entities);
        assert!(SqliteRepo::get_example(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_timestamp_is_a_serialization_error() {
        // GIVEN a stored row whose updated_at is out of chrono's range
        let conn = setup();
        let example = Example::new("ex-1".to_string(), "hello".to_string());
        SqliteRepo::persist_example(&conn, &example).unwrap();
        conn.execute(
            "UPDATE examples SET updated_at = ?1 WHERE id = 'ex-1'",
            [i64::MAX],
        )
        .unwrap();

        // WHEN the row is read back
        let err = SqliteRepo::get_example(&conn, "ex-1").unwrap_err();

        // THEN decoding fails instead of substituting a timestamp
        assert_eq!(err.kind(), ExErrorKind::Serialization);
        assert!(err.message().contains("updated_at"));
    }

    #[test]
    fn test_update_keeps_insertion_position() {
        let conn = setup();
        let a = Example::new("a".to_string(), "first".to_string());
        let b = Example::new("b".to_string(), "second".to_string());
        SqliteRepo::persist_example(&conn, &a).unwrap();
        SqliteRepo::persist_example(&conn, &b).unwrap();

        let mut a2 = a.clone();
        a2.text = "first, edited".to_string();
        SqliteRepo::persist_example(&conn, &a2).unwrap();

        let ids: Vec<_> = SqliteRepo::list_examples(&conn)
            .unwrap()
            .into_iter()
            .map(|e| (e.id, e.text))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("a".to_string(), "first, edited".to_string()),
                ("b".to_string(), "second".to_string())
            ]
        );
    }

    #[test]
    fn test_claim_replaces_holder() {
        let conn = setup();
        for id in ["a", "b"] {
            SqliteRepo::persist_example(&conn, &Example::new(id.to_string(), id.to_string()))
                .unwrap();
        }
        let key = GroupingKey::intent("greet");

        SqliteRepo::claim_key(&conn, &key, "a").unwrap();
        SqliteRepo::claim_key(&conn, &key, "b").unwrap();

        assert_eq!(
            SqliteRepo::list_claims(&conn).unwrap(),
            vec![(key.clone(), "b".to_string())]
        );
        SqliteRepo::release_key(&conn, &key).unwrap();
        assert!(SqliteRepo::list_claims(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_entity_scope_recorded_once() {
        let conn = setup();
        SqliteRepo::ensure_entity_scope(&conn, EntityScope::Global).unwrap();
        SqliteRepo::ensure_entity_scope(&conn, EntityScope::Global).unwrap();

        let err = SqliteRepo::ensure_entity_scope(&conn, EntityScope::PerIntent).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }
}
