//! # List Query
//!
//! Column allow-list, sorting, filtering and pagination for the list
//! operation. Client-supplied column names only ever reach SQL through
//! [`Column`], so an unknown name can never be interpolated.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::model::Student;

/// Default page number
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum page size accepted from clients
pub const MAX_PAGE_SIZE: u32 = 1000;

/// The eight columns of the students table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Name,
    Gender,
    StudentId,
    BirthDate,
    Phone,
    Email,
    Address,
}

impl Column {
    /// All columns in table order
    pub const ALL: [Column; 8] = [
        Column::Id,
        Column::Name,
        Column::Gender,
        Column::StudentId,
        Column::BirthDate,
        Column::Phone,
        Column::Email,
        Column::Address,
    ];

    /// Wire name, as used in JSON bodies and query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Name => "name",
            Column::Gender => "gender",
            Column::StudentId => "studentId",
            Column::BirthDate => "birthDate",
            Column::Phone => "phone",
            Column::Email => "email",
            Column::Address => "address",
        }
    }

    /// Quoted SQL identifier. Quoting keeps the mixed-case names intact
    /// on PostgreSQL, which folds bare identifiers to lower case.
    pub fn ident(&self) -> &'static str {
        match self {
            Column::Id => "\"id\"",
            Column::Name => "\"name\"",
            Column::Gender => "\"gender\"",
            Column::StudentId => "\"studentId\"",
            Column::BirthDate => "\"birthDate\"",
            Column::Phone => "\"phone\"",
            Column::Email => "\"email\"",
            Column::Address => "\"address\"",
        }
    }

    /// Whether the column is stored as text in every backend
    pub fn is_text(&self) -> bool {
        !matches!(self, Column::Id | Column::BirthDate)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a name is not one of the eight columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColumn(pub String);

impl fmt::Display for UnknownColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown column: {}", self.0)
    }
}

impl std::error::Error for UnknownColumn {}

impl FromStr for Column {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::ALL
            .iter()
            .copied()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Only the exact string `"desc"` selects descending order
    pub fn parse_lenient(value: &str) -> Self {
        if value == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Case-insensitive substring filter on one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: Column,
    pub keyword: String,
}

impl Filter {
    pub fn new(column: Column, keyword: impl Into<String>) -> Self {
        Self {
            column,
            keyword: keyword.into(),
        }
    }

    /// LIKE pattern matching the keyword as a literal substring.
    ///
    /// `\` is the escape character, so the statement must carry
    /// `ESCAPE '\'`.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.keyword.len() + 2);
        pattern.push('%');
        for c in self.keyword.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// A fully normalized list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: Option<Filter>,
    pub sort: Column,
    pub order: SortOrder,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filter: None,
            sort: Column::Id,
            order: SortOrder::Asc,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    /// Row offset of the first row on this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Page count for `total` matching rows; never less than one
    pub fn total_pages(&self, total: u64) -> u64 {
        if total == 0 || self.page_size == 0 {
            return 1;
        }
        total.div_ceil(u64::from(self.page_size))
    }
}

/// One page of list results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPage {
    pub list: Vec<Student>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_round_trips_wire_names() {
        for column in Column::ALL {
            assert_eq!(column.as_str().parse::<Column>(), Ok(column));
        }
    }

    #[test]
    fn test_column_rejects_unknown_and_injection() {
        assert!("studentid".parse::<Column>().is_err());
        assert!("name\" OR 1=1 --".parse::<Column>().is_err());
        assert!("".parse::<Column>().is_err());
    }

    #[test]
    fn test_sort_order_only_exact_desc() {
        assert_eq!(SortOrder::parse_lenient("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse_lenient("DESC"), SortOrder::Asc);
        assert_eq!(SortOrder::parse_lenient("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse_lenient(""), SortOrder::Asc);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        let filter = Filter::new(Column::Email, "50%_off\\");
        assert_eq!(filter.like_pattern(), "%50\\%\\_off\\\\%");
        assert_eq!(Filter::new(Column::Name, "ann").like_pattern(), "%ann%");
    }

    #[test]
    fn test_offset() {
        let query = ListQuery {
            page: 3,
            page_size: 10,
            ..Default::default()
        };
        assert_eq!(query.offset(), 20);
        assert_eq!(ListQuery::default().offset(), 0);
    }

    #[test]
    fn test_total_pages() {
        let query = ListQuery::default();
        assert_eq!(query.total_pages(0), 1);
        assert_eq!(query.total_pages(1), 1);
        assert_eq!(query.total_pages(10), 1);
        assert_eq!(query.total_pages(11), 2);
        assert_eq!(query.total_pages(95), 10);
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = StudentPage {
            list: vec![],
            total: 0,
            total_pages: 1,
            current_page: 1,
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["totalPages"], 1);
        assert_eq!(value["currentPage"], 1);
        assert_eq!(value["list"], serde_json::json!([]));
    }
}
