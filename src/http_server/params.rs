//! # Request Parameters
//!
//! Lenient normalization of query and path parameters. Numbers are read
//! the forgiving way browsers' `parseInt` does (leading digits win, junk
//! after them is ignored) and fall back to defaults instead of failing.

use serde::Deserialize;

use crate::student::{
    Column, Filter, ListQuery, SortOrder, UnknownColumn, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};

/// Parse the leading integer of `value`.
///
/// Leading whitespace and one sign are allowed; parsing stops at the first
/// non-digit. `None` when there are no digits or the number overflows.
pub fn parse_int_lenient(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return None;
    }
    let magnitude: i64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Positive page-style number, or `default`
fn positive_or(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(parse_int_lenient)
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(default)
}

/// Raw query string of the list endpoint; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub filter_column: Option<String>,
    pub filter_keyword: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl ListParams {
    /// Normalize into a [`ListQuery`].
    ///
    /// The filter applies only when both column and keyword are non-empty.
    /// An unknown filter column is an error; an unknown sort field falls
    /// back to `id`.
    pub fn into_query(self) -> Result<ListQuery, UnknownColumn> {
        let filter = match (self.filter_column.as_deref(), self.filter_keyword) {
            (Some(column), Some(keyword)) if !column.is_empty() && !keyword.is_empty() => {
                Some(Filter::new(column.parse()?, keyword))
            }
            _ => None,
        };

        let sort = self
            .sort_field
            .as_deref()
            .and_then(|field| field.parse::<Column>().ok())
            .unwrap_or(Column::Id);

        let order = self
            .sort_order
            .as_deref()
            .map(SortOrder::parse_lenient)
            .unwrap_or_default();

        Ok(ListQuery {
            filter,
            sort,
            order,
            page: positive_or(self.page.as_deref(), DEFAULT_PAGE),
            page_size: positive_or(self.page_size.as_deref(), DEFAULT_PAGE_SIZE)
                .min(MAX_PAGE_SIZE),
        })
    }
}
