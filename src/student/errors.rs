//! # Student Errors
//!
//! Write failures returned by create and update. The four duplicate
//! variants are expected outcomes; `Store` wraps anything the backing
//! store raised.

use std::fmt;

use thiserror::Error;

use crate::store::StoreError;

/// Result type for student writes
pub type StudentResult<T> = Result<T, StudentError>;

/// Create/update failure
#[derive(Debug, Error)]
pub enum StudentError {
    /// Another row already has this `studentId`
    #[error("ID duplicate!")]
    StudentIdTaken,

    /// Another row already has this phone number
    #[error("Phone duplicate!")]
    PhoneTaken,

    /// Another row already has this email address
    #[error("Email duplicate!")]
    EmailTaken,

    /// Another row already has this name
    #[error("Name exists!")]
    NameTaken,

    /// Unexpected storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Wire tag for a [`StudentError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Name collision
    Duplicate,
    /// `studentId` collision
    IdErr,
    PhoneErr,
    EmailErr,
    /// Storage failure
    Error,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Duplicate => "duplicate",
            ErrorKind::IdErr => "idErr",
            ErrorKind::PhoneErr => "phoneErr",
            ErrorKind::EmailErr => "emailErr",
            ErrorKind::Error => "error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StudentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StudentError::StudentIdTaken => ErrorKind::IdErr,
            StudentError::PhoneTaken => ErrorKind::PhoneErr,
            StudentError::EmailTaken => ErrorKind::EmailErr,
            StudentError::NameTaken => ErrorKind::Duplicate,
            StudentError::Store(_) => ErrorKind::Error,
        }
    }

    /// True for the four duplicate-field rejections
    pub fn is_validation(&self) -> bool {
        !matches!(self, StudentError::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(StudentError::StudentIdTaken.kind(), ErrorKind::IdErr);
        assert_eq!(StudentError::PhoneTaken.kind(), ErrorKind::PhoneErr);
        assert_eq!(StudentError::EmailTaken.kind(), ErrorKind::EmailErr);
        assert_eq!(StudentError::NameTaken.kind(), ErrorKind::Duplicate);
        let store = StudentError::from(StoreError::Poisoned);
        assert_eq!(store.kind(), ErrorKind::Error);
        assert!(!store.is_validation());
    }

    #[test]
    fn test_messages() {
        assert_eq!(StudentError::StudentIdTaken.to_string(), "ID duplicate!");
        assert_eq!(StudentError::NameTaken.to_string(), "Name exists!");
        assert_eq!(ErrorKind::IdErr.to_string(), "idErr");
    }
}
