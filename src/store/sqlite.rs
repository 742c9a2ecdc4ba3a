//! # SQLite Store
//!
//! Single-connection SQLite backend. Used for local runs and tests, and
//! as the default when no PostgreSQL URL is configured.
//!
//! Writers are serialised twice over: the connection sits behind a mutex,
//! and every write transaction is opened with `BEGIN IMMEDIATE` so another
//! process sharing the file cannot interleave between check and write.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use super::errors::{StoreError, StoreResult};
use super::sql::{Dialect, SQLITE_LOWER_FN};
use super::{StudentStore, StudentTx, WriteWork};
use crate::student::{Column, Filter, ListQuery, Student, StudentFields, StudentResult};

const DIALECT: Dialect = Dialect::Sqlite;

/// How long a writer waits on a file locked by another process
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed student store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::from_connection(conn)
    }

    /// Private in-memory database; contents vanish with the store
    pub fn in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        register_functions(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

/// Unicode lowercase for case-insensitive filtering; NULL stays NULL
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        SQLITE_LOWER_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
    )
}

fn row_to_student(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student::new(
        row.get(0)?,
        StudentFields {
            name: row.get(1)?,
            gender: row.get(2)?,
            student_id: row.get(3)?,
            birth_date: row.get(4)?,
            phone: row.get(5)?,
            email: row.get(6)?,
            address: row.get(7)?,
        },
    ))
}

fn to_u64(value: i64) -> StoreResult<u64> {
    u64::try_from(value).map_err(|_| StoreError::InvalidData(format!("negative count: {}", value)))
}

fn to_i64(value: u64) -> StoreResult<i64> {
    i64::try_from(value).map_err(|_| StoreError::InvalidData(format!("offset too large: {}", value)))
}

struct SqliteTx<'a> {
    conn: &'a Connection,
}

impl StudentTx for SqliteTx<'_> {
    fn exists(
        &mut self,
        column: Column,
        value: &str,
        exclude_id: Option<i64>,
    ) -> StoreResult<bool> {
        let sql = DIALECT.exists_sql(column, exclude_id.is_some());
        let found = match exclude_id {
            Some(id) => self
                .conn
                .query_row(&sql, params![value, id], |_| Ok(()))
                .optional()?,
            None => self
                .conn
                .query_row(&sql, params![value], |_| Ok(()))
                .optional()?,
        };
        Ok(found.is_some())
    }

    fn insert(&mut self, fields: &StudentFields) -> StoreResult<i64> {
        let id = self.conn.query_row(
            &DIALECT.insert_sql(),
            params![
                fields.name,
                fields.gender,
                fields.student_id,
                fields.birth_date,
                fields.phone,
                fields.email,
                fields.address,
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn update(&mut self, id: i64, fields: &StudentFields) -> StoreResult<u64> {
        let affected = self.conn.execute(
            &DIALECT.update_sql(),
            params![
                fields.name,
                fields.gender,
                fields.student_id,
                fields.birth_date,
                fields.phone,
                fields.email,
                fields.address,
                id,
            ],
        )?;
        Ok(affected as u64)
    }
}

impl StudentStore for SqliteStore {
    fn init_schema(&self) -> StoreResult<()> {
        self.lock()?.execute_batch(&DIALECT.create_table_sql())?;
        Ok(())
    }

    fn write(&self, work: &mut WriteWork<'_>) -> StudentResult<()> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        // Dropping an uncommitted transaction rolls it back.
        work(&mut SqliteTx { conn: &tx })?;
        tx.commit().map_err(StoreError::from)?;
        Ok(())
    }

    fn count(&self, filter: Option<&Filter>) -> StoreResult<u64> {
        let sql = DIALECT.count_sql(filter);
        let conn = self.lock()?;
        let total: i64 = match filter {
            Some(filter) => conn.query_row(&sql, params![filter.like_pattern()], |row| row.get(0))?,
            None => conn.query_row(&sql, [], |row| row.get(0))?,
        };
        to_u64(total)
    }

    fn fetch_page(&self, query: &ListQuery) -> StoreResult<Vec<Student>> {
        let sql = DIALECT.page_sql(query);
        let limit = i64::from(query.page_size);
        let offset = to_i64(query.offset())?;

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = match &query.filter {
            Some(filter) => stmt
                .query_map(params![filter.like_pattern(), limit, offset], row_to_student)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map(params![limit, offset], row_to_student)?
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(rows)
    }

    fn delete(&self, id: i64) -> StoreResult<u64> {
        let affected = self.lock()?.execute(&DIALECT.delete_sql(), params![id])?;
        Ok(affected as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::student::StudentError;
    use chrono::NaiveDate;

    fn fields(tag: &str) -> StudentFields {
        StudentFields {
            name: format!("name-{tag}"),
            gender: "F".to_string(),
            student_id: format!("S-{tag}"),
            birth_date: NaiveDate::from_ymd_opt(2002, 1, 31).unwrap(),
            phone: format!("phone-{tag}"),
            email: format!("{tag}@example.com"),
            address: "Somewhere".to_string(),
        }
    }

    fn store() -> SqliteStore {
        let store = SqliteStore::in_memory().unwrap();
        store.init_schema().unwrap();
        store
    }

    fn insert(store: &SqliteStore, tag: &str) -> i64 {
        let mut id = 0;
        store
            .write(&mut |tx| {
                id = tx.insert(&fields(tag))?;
                Ok(())
            })
            .unwrap();
        id
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let store = store();
        store.init_schema().unwrap();
        assert_eq!(store.count(None).unwrap(), 0);
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = store();
        let first = insert(&store, "a");
        let second = insert(&store, "b");
        assert!(second > first);
        assert_eq!(store.count(None).unwrap(), 2);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let store = store();
        let first = insert(&store, "a");
        assert_eq!(store.delete(first).unwrap(), 1);
        let second = insert(&store, "b");
        assert_ne!(first, second);
    }

    #[test]
    fn test_exists_honours_exclusion() {
        let store = store();
        let id = insert(&store, "a");
        store
            .write(&mut |tx| {
                assert!(tx.exists(Column::Email, "a@example.com", None)?);
                assert!(!tx.exists(Column::Email, "a@example.com", Some(id))?);
                assert!(!tx.exists(Column::Email, "z@example.com", None)?);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_failed_work_rolls_back() {
        let store = store();
        let result = store.write(&mut |tx| {
            tx.insert(&fields("a"))?;
            Err(StudentError::NameTaken)
        });
        assert!(matches!(result, Err(StudentError::NameTaken)));
        assert_eq!(store.count(None).unwrap(), 0);
    }

    #[test]
    fn test_student_id_constraint_is_enforced() {
        let store = store();
        insert(&store, "a");
        let mut dup = fields("b");
        dup.student_id = "S-a".to_string();
        let result = store.write(&mut |tx| {
            tx.insert(&dup)?;
            Ok(())
        });
        assert!(matches!(result, Err(StudentError::Store(StoreError::Sqlite(_)))));
    }

    #[test]
    fn test_lower_function_folds_unicode() {
        let store = store();
        let conn = store.lock().unwrap();
        let lowered: String = conn
            .query_row("SELECT ulower('ÉMILE ÅSTRÖM')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(lowered, "émile åström");
        let null: Option<String> = conn
            .query_row("SELECT ulower(NULL)", [], |row| row.get(0))
            .unwrap();
        assert_eq!(null, None);
    }

    #[test]
    fn test_birth_date_round_trips() {
        let store = store();
        insert(&store, "a");
        let rows = store.fetch_page(&ListQuery::default()).unwrap();
        assert_eq!(
            rows[0].fields.birth_date,
            NaiveDate::from_ymd_opt(2002, 1, 31).unwrap()
        );
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("students.sqlite3");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.init_schema().unwrap();
            insert(&store, "a");
        }
        let reopened = SqliteStore::open(&path).unwrap();
        reopened.init_schema().unwrap();
        assert_eq!(reopened.count(None).unwrap(), 1);
    }
}
