//! # Student Data Access
//!
//! Domain types and data access for the single `students` table:
//!
//! - `model` - `Student` and the client-supplied `StudentFields`
//! - `query` - column allow-list, sorting, filtering, pagination
//! - `errors` - write failure taxonomy
//! - `repository` - duplicate validation and the CRUD operations

mod errors;
mod model;
mod query;
mod repository;

pub use errors::{ErrorKind, StudentError, StudentResult};
pub use model::{Student, StudentFields};
pub use query::{
    Column, Filter, ListQuery, SortOrder, StudentPage, UnknownColumn, DEFAULT_PAGE,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use repository::StudentRepository;
