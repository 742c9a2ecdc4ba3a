//! # PostgreSQL Store
//!
//! Pooled PostgreSQL backend (`postgres` + `r2d2`). Every request checks a
//! connection out of the pool, runs its statements, and returns it.
//!
//! Write transactions take `SHARE ROW EXCLUSIVE` on the table, which
//! conflicts with itself: two concurrent create/update calls queue up
//! instead of both passing their duplicate checks. Readers are not
//! blocked.
//!
//! Connections are plain TCP (`NoTls`).

use std::time::Duration;

use postgres::{NoTls, Row, Transaction};
use r2d2::{Pool, PooledConnection};
use r2d2_postgres::PostgresConnectionManager;

use super::config::StoreConfig;
use super::errors::{StoreError, StoreResult};
use super::sql::{Dialect, TABLE};
use super::{StudentStore, StudentTx, WriteWork};
use crate::student::{Column, Filter, ListQuery, Student, StudentFields, StudentResult};

const DIALECT: Dialect = Dialect::Postgres;

type Manager = PostgresConnectionManager<NoTls>;

/// PostgreSQL-backed student store
pub struct PostgresStore {
    /// `None` only while dropping
    pool: Option<Pool<Manager>>,
}

impl Drop for PostgresStore {
    fn drop(&mut self) {
        // The sync client owns a runtime that must not be dropped from
        // inside an async context.
        if let Some(pool) = self.pool.take() {
            let _ = std::thread::spawn(move || drop(pool));
        }
    }
}

impl PostgresStore {
    /// Build the pool.
    ///
    /// Connections are opened lazily, so an unreachable server does not
    /// fail construction; the first checkout reports it instead.
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let mut pg_config = config
            .url
            .parse::<postgres::Config>()
            .map_err(|err| StoreError::Config(err.to_string()))?;
        pg_config.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
        let options = format!("-c statement_timeout={}", config.statement_timeout_ms);
        pg_config.options(&options);

        let manager = PostgresConnectionManager::new(pg_config, NoTls);
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .min_idle(Some(0))
            .connection_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build_unchecked(manager);

        Ok(Self { pool: Some(pool) })
    }

    fn connection(&self) -> StoreResult<PooledConnection<Manager>> {
        let pool = self
            .pool
            .as_ref()
            .ok_or_else(|| StoreError::Config("postgres store closed".to_string()))?;
        Ok(pool.get()?)
    }
}

fn row_to_student(row: &Row) -> Result<Student, postgres::Error> {
    Ok(Student::new(
        row.try_get(0)?,
        StudentFields {
            name: row.try_get(1)?,
            gender: row.try_get(2)?,
            student_id: row.try_get(3)?,
            birth_date: row.try_get(4)?,
            phone: row.try_get(5)?,
            email: row.try_get(6)?,
            address: row.try_get(7)?,
        },
    ))
}

fn to_u64(value: i64) -> StoreResult<u64> {
    u64::try_from(value).map_err(|_| StoreError::InvalidData(format!("negative count: {}", value)))
}

fn to_i64(value: u64) -> StoreResult<i64> {
    i64::try_from(value).map_err(|_| StoreError::InvalidData(format!("offset too large: {}", value)))
}

struct PgTx<'a, 'c> {
    tx: &'a mut Transaction<'c>,
}

impl StudentTx for PgTx<'_, '_> {
    fn exists(
        &mut self,
        column: Column,
        value: &str,
        exclude_id: Option<i64>,
    ) -> StoreResult<bool> {
        let sql = DIALECT.exists_sql(column, exclude_id.is_some());
        let found = match exclude_id {
            Some(id) => self.tx.query_opt(sql.as_str(), &[&value, &id])?,
            None => self.tx.query_opt(sql.as_str(), &[&value])?,
        };
        Ok(found.is_some())
    }

    fn insert(&mut self, fields: &StudentFields) -> StoreResult<i64> {
        let row = self.tx.query_one(
            DIALECT.insert_sql().as_str(),
            &[
                &fields.name,
                &fields.gender,
                &fields.student_id,
                &fields.birth_date,
                &fields.phone,
                &fields.email,
                &fields.address,
            ],
        )?;
        Ok(row.try_get(0)?)
    }

    fn update(&mut self, id: i64, fields: &StudentFields) -> StoreResult<u64> {
        let affected = self.tx.execute(
            DIALECT.update_sql().as_str(),
            &[
                &fields.name,
                &fields.gender,
                &fields.student_id,
                &fields.birth_date,
                &fields.phone,
                &fields.email,
                &fields.address,
                &id,
            ],
        )?;
        Ok(affected)
    }
}

impl StudentStore for PostgresStore {
    fn init_schema(&self) -> StoreResult<()> {
        self.connection()?
            .batch_execute(&DIALECT.create_table_sql())?;
        Ok(())
    }

    fn write(&self, work: &mut WriteWork<'_>) -> StudentResult<()> {
        let mut conn = self.connection()?;
        let mut tx = conn.transaction().map_err(StoreError::from)?;
        tx.batch_execute(&format!("LOCK TABLE {TABLE} IN SHARE ROW EXCLUSIVE MODE"))
            .map_err(StoreError::from)?;
        work(&mut PgTx { tx: &mut tx })?;
        tx.commit().map_err(StoreError::from)?;
        Ok(())
    }

    fn count(&self, filter: Option<&Filter>) -> StoreResult<u64> {
        let sql = DIALECT.count_sql(filter);
        let mut conn = self.connection()?;
        let row = match filter {
            Some(filter) => conn.query_one(sql.as_str(), &[&filter.like_pattern()])?,
            None => conn.query_one(sql.as_str(), &[])?,
        };
        to_u64(row.try_get(0)?)
    }

    fn fetch_page(&self, query: &ListQuery) -> StoreResult<Vec<Student>> {
        let sql = DIALECT.page_sql(query);
        let limit = i64::from(query.page_size);
        let offset = to_i64(query.offset())?;

        let mut conn = self.connection()?;
        let rows = match &query.filter {
            Some(filter) => {
                conn.query(sql.as_str(), &[&filter.like_pattern(), &limit, &offset])?
            }
            None => conn.query(sql.as_str(), &[&limit, &offset])?,
        };
        let students = rows
            .iter()
            .map(row_to_student)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(students)
    }

    fn delete(&self, id: i64) -> StoreResult<u64> {
        Ok(self.connection()?.execute(DIALECT.delete_sql().as_str(), &[&id])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_url() {
        let config = StoreConfig::with_url("postgres://localhost:notaport/db");
        assert!(matches!(
            PostgresStore::new(&config),
            Err(StoreError::Config(_))
        ));
    }

    #[test]
    fn test_unreachable_server_fails_at_checkout() {
        let config = StoreConfig {
            connect_timeout_ms: 200,
            ..StoreConfig::with_url("postgres://nobody@127.0.0.1:1/none")
        };
        let store = PostgresStore::new(&config).unwrap();
        assert!(matches!(store.init_schema(), Err(StoreError::Pool(_))));
    }
}
