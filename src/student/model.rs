//! Student record types
//!
//! `StudentFields` is what clients submit; `Student` is a stored row with
//! its system-assigned `id`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The seven client-supplied fields of a student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFields {
    pub name: String,
    pub gender: String,
    pub student_id: String,
    pub birth_date: NaiveDate,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// A stored student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    #[serde(flatten)]
    pub fields: StudentFields,
}

impl Student {
    /// Pair submitted fields with an assigned id
    pub fn new(id: i64, fields: StudentFields) -> Self {
        Self { id, fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> StudentFields {
        StudentFields {
            name: "Ada".to_string(),
            gender: "F".to_string(),
            student_id: "S001".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2001, 4, 9).unwrap(),
            phone: "555-0100".to_string(),
            email: "ada@example.com".to_string(),
            address: "1 Main St".to_string(),
        }
    }

    #[test]
    fn test_fields_use_camel_case_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["studentId"], "S001");
        assert_eq!(value["birthDate"], "2001-04-09");
        assert!(value.get("student_id").is_none());
    }

    #[test]
    fn test_student_flattens_fields_next_to_id() {
        let student = Student::new(7, sample());
        let value = serde_json::to_value(&student).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["name"], "Ada");
        assert!(value.get("fields").is_none());
    }

    #[test]
    fn test_fields_reject_missing_key() {
        let result: Result<StudentFields, _> = serde_json::from_value(json!({
            "name": "Ada",
            "gender": "F",
            "birthDate": "2001-04-09",
            "phone": "1",
            "email": "a@b",
            "address": "x"
        }));
        assert!(result.is_err());
    }
}
