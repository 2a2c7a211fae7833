//! Storage constraints of the `students` and `courses` tables.
//!
//! Every repository implementation runs these checks before writing, so the
//! SQLite and in-memory adapters reject the same records.

use crate::entities::{Course, Student};
use crate::errors::DomainError;
use rust_decimal::{Decimal, RoundingStrategy};

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 100;
pub const PHONE_MAX_LEN: usize = 15;
pub const COURSE_NAME_MAX_LEN: usize = 100;

/// `balance` column is NUMERIC(10, 2).
pub const BALANCE_PRECISION: u32 = 10;
pub const BALANCE_SCALE: u32 = 2;

/// Blank and whitespace-only values count as missing.
fn required<'a>(field: &str, value: Option<&'a str>, max_len: usize) -> Result<&'a str, DomainError> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DomainError::validation(format!("{} is required", field)))?;
    check_len(field, value, max_len)?;
    Ok(value)
}

fn check_len(field: &str, value: &str, max_len: usize) -> Result<(), DomainError> {
    if value.chars().count() > max_len {
        return Err(DomainError::validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(())
}

/// Rounds a balance to the column scale and checks it fits the precision.
pub fn storage_balance(balance: Decimal) -> Result<Decimal, DomainError> {
    let mut rounded = balance.round_dp_with_strategy(BALANCE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(BALANCE_SCALE);

    // 10 digits with 2 after the point leaves 8 before it.
    let limit = Decimal::from(10_i64.pow(BALANCE_PRECISION - BALANCE_SCALE));
    if rounded.abs() >= limit {
        return Err(DomainError::validation(format!(
            "balance {} exceeds precision ({}, {})",
            balance, BALANCE_PRECISION, BALANCE_SCALE
        )));
    }
    Ok(rounded)
}

/// Checks the column constraints of a student about to be written and returns
/// the copy that should be stored (balance normalized to the column scale).
///
/// Email uniqueness is not checked here; it needs the rest of the table.
pub fn validate_student(student: &Student) -> Result<Student, DomainError> {
    required("name", student.name(), NAME_MAX_LEN)?;
    required("email", student.email(), EMAIL_MAX_LEN)?;
    if let Some(phone) = student.phone() {
        check_len("phone", phone, PHONE_MAX_LEN)?;
    }
    if student.course().is_some() && student.course_id().is_none() {
        return Err(DomainError::validation(
            "course must be saved before a student can reference it",
        ));
    }

    let balance = storage_balance(student.balance())?;
    Ok(student.clone().with_balance(balance))
}

pub fn validate_course(course: &Course) -> Result<(), DomainError> {
    required("course name", Some(course.course_name.as_str()), COURSE_NAME_MAX_LEN)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_student() -> Student {
        Student::with_contact("Ada Lovelace", "ada@example.com", "555-1234")
    }

    #[test]
    fn test_valid_student_passes() {
        let stored = validate_student(&valid_student()).unwrap();
        assert_eq!(stored.balance().scale(), 2);
    }

    #[test]
    fn test_missing_required_fields() {
        let err = validate_student(&Student::new()).unwrap_err();
        assert_eq!(err, DomainError::validation("name is required"));

        let err = validate_student(&Student::new().with_name("Ada")).unwrap_err();
        assert_eq!(err, DomainError::validation("email is required"));

        let err = validate_student(&valid_student().with_name("   ")).unwrap_err();
        assert_eq!(err, DomainError::validation("name is required"));

        let err = validate_student(&valid_student().with_email("")).unwrap_err();
        assert_eq!(err, DomainError::validation("email is required"));
    }

    #[test]
    fn test_length_limits_count_characters() {
        let at_limit = "é".repeat(NAME_MAX_LEN);
        assert!(validate_student(&valid_student().with_name(at_limit)).is_ok());

        let too_long = "a".repeat(NAME_MAX_LEN + 1);
        assert!(matches!(
            validate_student(&valid_student().with_name(too_long)),
            Err(DomainError::ValidationError(_))
        ));

        let long_phone = Some("1".repeat(PHONE_MAX_LEN + 1));
        assert!(validate_student(&valid_student().with_phone(long_phone)).is_err());
        assert!(validate_student(&valid_student().with_phone(None)).is_ok());
    }

    #[test]
    fn test_unsaved_course_rejected() {
        let student = valid_student().with_course(Some(Course::new("Algebra")));
        assert!(validate_student(&student).is_err());

        let student = valid_student().with_course(Some(Course::with_id(1, "Algebra")));
        assert!(validate_student(&student).is_ok());
    }

    #[test]
    fn test_storage_balance_rounds_and_bounds() {
        assert_eq!(
            storage_balance(Decimal::new(12_345, 3)).unwrap().to_string(),
            "12.35"
        );
        assert_eq!(storage_balance(Decimal::ZERO).unwrap().to_string(), "0.00");
        assert!(storage_balance(Decimal::new(9_999_999_999, 2)).is_ok());
        assert!(storage_balance(Decimal::new(100_000_000, 0)).is_err());
        assert!(storage_balance(Decimal::new(-9_999_999_999, 2)).is_ok());
    }

    #[test]
    fn test_course_name_required() {
        assert!(validate_course(&Course::new("Biology")).is_ok());
        assert!(validate_course(&Course::new("")).is_err());
        assert!(validate_course(&Course::new("x".repeat(COURSE_NAME_MAX_LEN + 1))).is_err());
    }
}
