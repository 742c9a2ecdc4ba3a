//! # SQL Generation
//!
//! Statement text for the students table, per backend dialect. Only
//! identifiers from [`Column`] are ever spliced into a statement; every
//! value travels as a bound parameter.

use crate::student::{Column, Filter, ListQuery};

/// Table name
pub const TABLE: &str = "students";

/// Unicode-aware lowercase function registered on every SQLite connection
pub const SQLITE_LOWER_FN: &str = "ulower";

/// Column list used by every SELECT, in [`Column::ALL`] order
pub const SELECT_COLUMNS: &str =
    "\"id\", \"name\", \"gender\", \"studentId\", \"birthDate\", \"phone\", \"email\", \"address\"";

/// SQL dialect of a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Positional parameter marker, 1-based
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", index),
            Dialect::Sqlite => format!("?{}", index),
        }
    }

    /// Case-insensitive substring match of `target` against parameter 1.
    ///
    /// SQLite's own `LIKE` folds ASCII only, so both sides go through
    /// [`SQLITE_LOWER_FN`] there.
    fn like_predicate(&self, target: &str) -> String {
        match self {
            Dialect::Postgres => format!("{} ILIKE {} ESCAPE '\\'", target, self.placeholder(1)),
            Dialect::Sqlite => format!(
                "{f}({}) LIKE {f}({}) ESCAPE '\\'",
                target,
                self.placeholder(1),
                f = SQLITE_LOWER_FN
            ),
        }
    }

    /// Schema DDL. `studentId` is the only column with a storage-level
    /// uniqueness constraint.
    pub fn create_table_sql(&self) -> String {
        let id = match self {
            Dialect::Postgres => "\"id\" BIGSERIAL PRIMARY KEY",
            Dialect::Sqlite => "\"id\" INTEGER PRIMARY KEY AUTOINCREMENT",
        };
        format!(
            "CREATE TABLE IF NOT EXISTS {TABLE} (\
             {id}, \
             \"name\" TEXT NOT NULL, \
             \"gender\" TEXT NOT NULL, \
             \"studentId\" TEXT NOT NULL UNIQUE, \
             \"birthDate\" DATE NOT NULL, \
             \"phone\" TEXT NOT NULL, \
             \"email\" TEXT NOT NULL, \
             \"address\" TEXT NOT NULL)"
        )
    }

    /// Probe for another row holding `value` in `column`
    pub fn exists_sql(&self, column: Column, exclude_id: bool) -> String {
        let mut sql = format!(
            "SELECT 1 FROM {TABLE} WHERE {} = {}",
            column.ident(),
            self.placeholder(1)
        );
        if exclude_id {
            sql.push_str(&format!(" AND \"id\" <> {}", self.placeholder(2)));
        }
        sql.push_str(" LIMIT 1");
        sql
    }

    pub fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {TABLE} (\"name\", \"gender\", \"studentId\", \"birthDate\", \"phone\", \"email\", \"address\") \
             VALUES ({}) RETURNING \"id\"",
            (1..=7)
                .map(|i| self.placeholder(i))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }

    pub fn update_sql(&self) -> String {
        format!(
            "UPDATE {TABLE} SET \"name\" = {}, \"gender\" = {}, \"studentId\" = {}, \
             \"birthDate\" = {}, \"phone\" = {}, \"email\" = {}, \"address\" = {} \
             WHERE \"id\" = {}",
            self.placeholder(1),
            self.placeholder(2),
            self.placeholder(3),
            self.placeholder(4),
            self.placeholder(5),
            self.placeholder(6),
            self.placeholder(7),
            self.placeholder(8),
        )
    }

    pub fn delete_sql(&self) -> String {
        format!("DELETE FROM {TABLE} WHERE \"id\" = {}", self.placeholder(1))
    }

    /// WHERE clause for an optional filter; binds the pattern as parameter 1
    fn where_clause(&self, filter: Option<&Filter>) -> String {
        match filter {
            None => String::new(),
            Some(filter) => {
                let target = if filter.column.is_text() {
                    filter.column.ident().to_string()
                } else {
                    format!("CAST({} AS TEXT)", filter.column.ident())
                };
                format!(" WHERE {}", self.like_predicate(&target))
            }
        }
    }

    /// Row count ignoring pagination
    pub fn count_sql(&self, filter: Option<&Filter>) -> String {
        format!("SELECT COUNT(*) FROM {TABLE}{}", self.where_clause(filter))
    }

    /// One page of rows. LIMIT and OFFSET bind after the filter pattern.
    pub fn page_sql(&self, query: &ListQuery) -> String {
        let first = if query.filter.is_some() { 2 } else { 1 };
        let mut sql = format!(
            "SELECT {SELECT_COLUMNS} FROM {TABLE}{} ORDER BY {} {}",
            self.where_clause(query.filter.as_ref()),
            query.sort.ident(),
            query.order.as_sql()
        );
        if query.sort != Column::Id {
            sql.push_str(", \"id\" ASC");
        }
        sql.push_str(&format!(
            " LIMIT {} OFFSET {}",
            self.placeholder(first),
            self.placeholder(first + 1)
        ));
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::student::SortOrder;

    #[test]
    fn test_placeholders() {
        assert_eq!(Dialect::Postgres.placeholder(3), "$3");
        assert_eq!(Dialect::Sqlite.placeholder(3), "?3");
    }

    #[test]
    fn test_create_table_keeps_student_id_unique() {
        for dialect in [Dialect::Postgres, Dialect::Sqlite] {
            let sql = dialect.create_table_sql();
            assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS students"));
            assert!(sql.contains("\"studentId\" TEXT NOT NULL UNIQUE"));
            assert!(!sql.contains("\"email\" TEXT NOT NULL UNIQUE"));
        }
        assert!(Dialect::Postgres.create_table_sql().contains("BIGSERIAL"));
        assert!(Dialect::Sqlite.create_table_sql().contains("AUTOINCREMENT"));
    }

    #[test]
    fn test_exists_with_and_without_exclusion() {
        assert_eq!(
            Dialect::Postgres.exists_sql(Column::Phone, false),
            "SELECT 1 FROM students WHERE \"phone\" = $1 LIMIT 1"
        );
        assert_eq!(
            Dialect::Sqlite.exists_sql(Column::StudentId, true),
            "SELECT 1 FROM students WHERE \"studentId\" = ?1 AND \"id\" <> ?2 LIMIT 1"
        );
    }

    #[test]
    fn test_insert_and_update_bind_all_fields() {
        let insert = Dialect::Postgres.insert_sql();
        assert!(insert.contains("VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING \"id\""));
        let update = Dialect::Sqlite.update_sql();
        assert!(update.ends_with("WHERE \"id\" = ?8"));
    }

    #[test]
    fn test_count_with_filter() {
        let filter = Filter::new(Column::Email, "x");
        assert_eq!(
            Dialect::Postgres.count_sql(Some(&filter)),
            "SELECT COUNT(*) FROM students WHERE \"email\" ILIKE $1 ESCAPE '\\'"
        );
        assert_eq!(Dialect::Sqlite.count_sql(None), "SELECT COUNT(*) FROM students");
    }

    #[test]
    fn test_non_text_filter_is_cast() {
        let filter = Filter::new(Column::BirthDate, "2001");
        let sql = Dialect::Postgres.count_sql(Some(&filter));
        assert!(sql.contains("CAST(\"birthDate\" AS TEXT) ILIKE $1"));
        let sql = Dialect::Sqlite.count_sql(Some(&filter));
        assert!(sql.contains("ulower(CAST(\"birthDate\" AS TEXT)) LIKE ulower(?1)"));
    }

    #[test]
    fn test_page_sql_parameter_numbering() {
        let unfiltered = ListQuery::default();
        assert_eq!(
            Dialect::Postgres.page_sql(&unfiltered),
            format!(
                "SELECT {SELECT_COLUMNS} FROM students ORDER BY \"id\" ASC LIMIT $1 OFFSET $2"
            )
        );

        let filtered = ListQuery {
            filter: Some(Filter::new(Column::Name, "a")),
            sort: Column::StudentId,
            order: SortOrder::Desc,
            ..Default::default()
        };
        let sql = Dialect::Sqlite.page_sql(&filtered);
        assert!(sql.contains("WHERE ulower(\"name\") LIKE ulower(?1) ESCAPE '\\'"));
        assert!(sql.contains("ORDER BY \"studentId\" DESC, \"id\" ASC"));
        assert!(sql.ends_with("LIMIT ?2 OFFSET ?3"));
    }
}
