//! # Student Repository
//!
//! The data access layer proper: duplicate-field validation and the four
//! CRUD operations, expressed against an injected [`StudentStore`].
//!
//! Unless `force` is set, a write first runs the unique-field checks in a
//! fixed order (`studentId`, `phone`, `email`, `name`) and stops at the
//! first collision. Checks and write share one store transaction.

use std::sync::Arc;

use tracing::debug;

use super::errors::{StudentError, StudentResult};
use super::model::{Student, StudentFields};
use super::query::{Column, ListQuery, StudentPage};
use crate::store::{StoreError, StoreResult, StudentStore, StudentTx};

/// Fields that must be unique across students, in check order
const UNIQUE_CHECKS: [UniqueField; 4] = [
    UniqueField::StudentId,
    UniqueField::Phone,
    UniqueField::Email,
    UniqueField::Name,
];

#[derive(Debug, Clone, Copy)]
enum UniqueField {
    StudentId,
    Phone,
    Email,
    Name,
}

impl UniqueField {
    fn column(self) -> Column {
        match self {
            UniqueField::StudentId => Column::StudentId,
            UniqueField::Phone => Column::Phone,
            UniqueField::Email => Column::Email,
            UniqueField::Name => Column::Name,
        }
    }

    fn value(self, fields: &StudentFields) -> &str {
        match self {
            UniqueField::StudentId => &fields.student_id,
            UniqueField::Phone => &fields.phone,
            UniqueField::Email => &fields.email,
            UniqueField::Name => &fields.name,
        }
    }

    fn collision(self) -> StudentError {
        match self {
            UniqueField::StudentId => StudentError::StudentIdTaken,
            UniqueField::Phone => StudentError::PhoneTaken,
            UniqueField::Email => StudentError::EmailTaken,
            UniqueField::Name => StudentError::NameTaken,
        }
    }
}

/// Run the unique-field checks, short-circuiting on the first collision.
///
/// `exclude_id` is the row being updated, which never collides with itself.
fn check_unique(
    tx: &mut dyn StudentTx,
    fields: &StudentFields,
    exclude_id: Option<i64>,
) -> StudentResult<()> {
    for check in UNIQUE_CHECKS {
        if tx.exists(check.column(), check.value(fields), exclude_id)? {
            debug!(column = %check.column(), "duplicate value rejected");
            return Err(check.collision());
        }
    }
    Ok(())
}

/// Data access for the students table
#[derive(Clone)]
pub struct StudentRepository {
    store: Arc<dyn StudentStore>,
}

impl StudentRepository {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn StudentStore> {
        &self.store
    }

    /// Insert a new student, returning it with its assigned id.
    ///
    /// With `force` the duplicate checks are skipped; the storage-level
    /// `studentId` constraint still applies and surfaces as
    /// [`StudentError::Store`].
    pub fn create(&self, fields: &StudentFields, force: bool) -> StudentResult<Student> {
        let mut id = None;
        self.store.write(&mut |tx| {
            if !force {
                check_unique(tx, fields, None)?;
            }
            id = Some(tx.insert(fields)?);
            Ok(())
        })?;

        let id = id.ok_or_else(|| StoreError::InvalidData("insert returned no id".to_string()))?;
        Ok(Student::new(id, fields.clone()))
    }

    /// One page of students plus the total match count
    pub fn list(&self, query: &ListQuery) -> StoreResult<StudentPage> {
        let total = self.store.count(query.filter.as_ref())?;
        let list = self.store.fetch_page(query)?;
        Ok(StudentPage {
            list,
            total,
            total_pages: query.total_pages(total),
            current_page: query.page,
        })
    }

    /// Replace every field of student `id`.
    ///
    /// Returns rows affected; `0` means no such student and is not an
    /// error here.
    pub fn update(&self, id: i64, fields: &StudentFields, force: bool) -> StudentResult<u64> {
        let mut affected = 0;
        self.store.write(&mut |tx| {
            if !force {
                check_unique(tx, fields, Some(id))?;
            }
            affected = tx.update(id, fields)?;
            Ok(())
        })?;
        Ok(affected)
    }

    /// Delete student `id`; returns rows affected
    pub fn delete(&self, id: i64) -> StoreResult<u64> {
        self.store.delete(id)
    }
}
