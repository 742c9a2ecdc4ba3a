//! Student HTTP Routes
//!
//! CRUD endpoints over the students table. Store calls are blocking, so
//! each one runs on tokio's blocking pool.

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{post, put},
    Json, Router,
};
use serde::Deserialize;
use tracing::error;

use super::errors::{ApiError, ApiResult};
use super::params::{parse_int_lenient, ListParams};
use super::response::{CodeResponse, SuccessResponse};
use crate::student::{
    ErrorKind, Student, StudentError, StudentFields, StudentPage, StudentRepository,
};

/// Client-facing text for a redacted internal failure
const REDACTED_MESSAGE: &str = "Internal storage error";

// ==================
// Shared State
// ==================

/// Student state shared across handlers
pub struct StudentState {
    pub repository: StudentRepository,
    /// Send raw storage errors to clients instead of a generic message
    pub expose_internal_errors: bool,
}

impl StudentState {
    pub fn new(repository: StudentRepository, expose_internal_errors: bool) -> Self {
        Self {
            repository,
            expose_internal_errors,
        }
    }

    /// Log an internal failure and return the text the client may see
    fn internal_message(&self, err: &dyn Display) -> String {
        error!(error = %err, "student request failed");
        if self.expose_internal_errors {
            err.to_string()
        } else {
            REDACTED_MESSAGE.to_string()
        }
    }

    fn write_error(&self, err: StudentError) -> ApiError {
        if err.is_validation() {
            return ApiError::Write {
                kind: err.kind(),
                msg: err.to_string(),
            };
        }
        ApiError::Write {
            kind: ErrorKind::Error,
            msg: self.internal_message(&err),
        }
    }
}

// ==================
// Request Types
// ==================

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    pub student: StudentFields,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStudentRequest {
    pub student: StudentFields,
    #[serde(default)]
    pub force: bool,
}

// ==================
// Student Routes
// ==================

/// Create student routes
pub fn student_routes(state: Arc<StudentState>) -> Router {
    Router::new()
        .route(
            "/students",
            post(create_student_handler).get(list_students_handler),
        )
        .route(
            "/students/:id",
            put(update_student_handler).delete(delete_student_handler),
        )
        .with_state(state)
}

fn body_error(rejection: JsonRejection) -> ApiError {
    ApiError::InvalidBody(rejection.body_text())
}

// ==================
// Handlers
// ==================

async fn create_student_handler(
    State(state): State<Arc<StudentState>>,
    body: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> ApiResult<Json<CodeResponse<Student>>> {
    let Json(request) = body.map_err(body_error)?;

    let repository = state.repository.clone();
    let result =
        tokio::task::spawn_blocking(move || repository.create(&request.student, request.force))
            .await;

    match result {
        Ok(Ok(student)) => Ok(Json(CodeResponse::ok(student))),
        Ok(Err(err)) => Err(state.write_error(err)),
        Err(join) => Err(ApiError::Write {
            kind: ErrorKind::Error,
            msg: state.internal_message(&join),
        }),
    }
}

async fn list_students_handler(
    State(state): State<Arc<StudentState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<SuccessResponse<StudentPage>>> {
    let query = params
        .into_query()
        .map_err(|err| ApiError::InvalidQuery(err.to_string()))?;

    let repository = state.repository.clone();
    let result = tokio::task::spawn_blocking(move || repository.list(&query)).await;

    match result {
        Ok(Ok(page)) => Ok(Json(SuccessResponse::with_data(page))),
        Ok(Err(err)) => Err(ApiError::Internal(state.internal_message(&err))),
        Err(join) => Err(ApiError::Internal(state.internal_message(&join))),
    }
}

async fn update_student_handler(
    State(state): State<Arc<StudentState>>,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateStudentRequest>, JsonRejection>,
) -> ApiResult<Json<CodeResponse<Student>>> {
    let Json(request) = body.map_err(body_error)?;
    let Some(id) = parse_int_lenient(&raw_id) else {
        return Err(ApiError::UpdateNotFound(raw_id));
    };

    let repository = state.repository.clone();
    let UpdateStudentRequest { student, force } = request;
    let result = tokio::task::spawn_blocking(move || {
        repository
            .update(id, &student, force)
            .map(|affected| (affected, student))
    })
    .await;

    match result {
        Ok(Ok((0, _))) => Err(ApiError::UpdateNotFound(id.to_string())),
        Ok(Ok((_, student))) => Ok(Json(CodeResponse::ok(Student::new(id, student)))),
        Ok(Err(err)) => Err(state.write_error(err)),
        Err(join) => Err(ApiError::Write {
            kind: ErrorKind::Error,
            msg: state.internal_message(&join),
        }),
    }
}

async fn delete_student_handler(
    State(state): State<Arc<StudentState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<SuccessResponse<()>>> {
    let Some(id) = parse_int_lenient(&raw_id) else {
        return Err(ApiError::DeleteNotFound(raw_id));
    };

    let repository = state.repository.clone();
    let result = tokio::task::spawn_blocking(move || repository.delete(id)).await;

    match result {
        Ok(Ok(0)) => Err(ApiError::DeleteNotFound(id.to_string())),
        Ok(Ok(_)) => Ok(Json(SuccessResponse::empty())),
        Ok(Err(err)) => Err(ApiError::Internal(state.internal_message(&err))),
        Err(join) => Err(ApiError::Internal(state.internal_message(&join))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SqliteStore, StoreError};

    fn state(expose: bool) -> StudentState {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        StudentState::new(StudentRepository::new(store), expose)
    }

    #[test]
    fn test_validation_errors_keep_their_message() {
        match state(false).write_error(StudentError::PhoneTaken) {
            ApiError::Write { kind, msg } => {
                assert_eq!(kind, ErrorKind::PhoneErr);
                assert_eq!(msg, "Phone duplicate!");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_store_errors_are_redacted_by_default() {
        let err = StudentError::Store(StoreError::Config("secret dsn".to_string()));
        match state(false).write_error(err) {
            ApiError::Write { kind, msg } => {
                assert_eq!(kind, ErrorKind::Error);
                assert_eq!(msg, REDACTED_MESSAGE);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_store_errors_exposed_when_configured() {
        let err = StudentError::Store(StoreError::Config("secret dsn".to_string()));
        match state(true).write_error(err) {
            ApiError::Write { msg, .. } => assert!(msg.contains("secret dsn")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
