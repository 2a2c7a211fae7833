use crate::entities::Course;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Core Student entity - one row of the `students` table.
///
/// A plain value holder: setters never validate. Required fields, lengths,
/// email uniqueness and id assignment are all enforced by the
/// [`StudentRepository`](crate::repositories::StudentRepository) at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    id: Option<i64>, // None for new students before persistence
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    course: Option<Course>,
    balance: Decimal,
    enrollment_date: NaiveDate,
}

impl Student {
    /// Empty student enrolled today with a zero balance.
    pub fn new() -> Self {
        Self {
            id: None,
            name: None,
            email: None,
            phone: None,
            course: None,
            balance: Decimal::ZERO,
            enrollment_date: Local::now().date_naive(),
        }
    }

    pub fn with_contact(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
            ..Self::new()
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Only repositories should call this; `insert` refuses students that
    /// already carry an id. `update` trusts the id as given and rewrites
    /// whichever row carries it, so reassigning the id of a loaded student
    /// overwrites a different student.
    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = Some(email.into());
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn set_phone(&mut self, phone: Option<String>) {
        self.phone = phone;
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn set_course(&mut self, course: Option<Course>) {
        self.course = course;
    }

    /// Id of the referenced course, the value stored in `course_id`.
    pub fn course_id(&self) -> Option<i64> {
        self.course.as_ref().and_then(|course| course.id)
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
    }

    pub fn enrollment_date(&self) -> NaiveDate {
        self.enrollment_date
    }

    pub fn set_enrollment_date(&mut self, enrollment_date: NaiveDate) {
        self.enrollment_date = enrollment_date;
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.set_email(email);
        self
    }

    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    pub fn with_course(mut self, course: Option<Course>) -> Self {
        self.course = course;
        self
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_enrollment_date(mut self, enrollment_date: NaiveDate) -> Self {
        self.enrollment_date = enrollment_date;
        self
    }
}

impl Default for Student {
    fn default() -> Self {
        Self::new()
    }
}

// Diagnostic rendering for logs; not meant to be parsed.
impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn quoted(value: Option<&str>) -> String {
            value.map_or_else(|| "null".to_string(), |v| format!("'{}'", v))
        }

        let id = self.id.map_or_else(|| "null".to_string(), |id| id.to_string());
        let course = self.course.as_ref().map_or("None", |c| c.course_name.as_str());

        write!(
            f,
            "Student{{studentId={}, name={}, email={}, phone={}, course={}, balance={}, enrollmentDate={}}}",
            id,
            quoted(self.name()),
            quoted(self.email()),
            quoted(self.phone()),
            course,
            self.balance,
            self.enrollment_date,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_student_defaults() {
        let before = Local::now().date_naive();
        let student = Student::new();
        let after = Local::now().date_naive();

        assert_eq!(student.id(), None);
        assert_eq!(student.name(), None);
        assert_eq!(student.email(), None);
        assert_eq!(student.phone(), None);
        assert!(student.course().is_none());
        assert_eq!(student.balance(), Decimal::ZERO);
        assert!(student.enrollment_date() >= before && student.enrollment_date() <= after);
    }

    #[test]
    fn test_student_with_contact() {
        let before = Local::now().date_naive();
        let student = Student::with_contact("Ada Lovelace", "ada@example.com", "555-1234");
        let after = Local::now().date_naive();

        assert_eq!(student.name(), Some("Ada Lovelace"));
        assert_eq!(student.email(), Some("ada@example.com"));
        assert_eq!(student.phone(), Some("555-1234"));
        assert_eq!(student.balance(), Decimal::new(0, 2));
        assert_eq!(student.id(), None);
        assert!(student.course().is_none());
        assert!(student.enrollment_date() >= before && student.enrollment_date() <= after);
    }

    #[test]
    fn test_setters_round_trip() {
        let course = Course::with_id(7, "Mathematics");
        let date = NaiveDate::from_ymd_opt(2021, 9, 1).unwrap();
        let mut student = Student::new();

        student.set_id(42);
        student.set_name("Grace Hopper");
        student.set_email("grace@example.com");
        student.set_phone(Some("555-0000".to_string()));
        student.set_course(Some(course.clone()));
        student.set_balance(Decimal::new(125_050, 2));
        student.set_enrollment_date(date);

        assert_eq!(student.id(), Some(42));
        assert_eq!(student.name(), Some("Grace Hopper"));
        assert_eq!(student.email(), Some("grace@example.com"));
        assert_eq!(student.phone(), Some("555-0000"));
        assert_eq!(student.course(), Some(&course));
        assert_eq!(student.course_id(), Some(7));
        assert_eq!(student.balance(), Decimal::new(125_050, 2));
        assert_eq!(student.enrollment_date(), date);

        student.set_phone(None);
        student.set_course(None);
        assert_eq!(student.phone(), None);
        assert_eq!(student.course_id(), None);
    }

    #[test]
    fn test_setters_do_not_validate() {
        let mut student = Student::new();
        student.set_email("not an email");
        student.set_balance(Decimal::new(-1, 3));
        assert_eq!(student.email(), Some("not an email"));
        assert_eq!(student.balance(), Decimal::new(-1, 3));
    }

    #[test]
    fn test_with_methods_return_changed_copy() {
        let original = Student::with_contact("Ada", "ada@example.com", "1");
        let changed = original
            .clone()
            .with_name("Ada King")
            .with_balance(Decimal::new(10, 0));

        assert_eq!(original.name(), Some("Ada"));
        assert_eq!(changed.name(), Some("Ada King"));
        assert_eq!(changed.email(), original.email());
        assert_eq!(changed.balance(), Decimal::new(10, 0));
    }

    #[test]
    fn test_display_without_course() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let student = Student::with_contact("Ada Lovelace", "ada@example.com", "555-1234")
            .with_enrollment_date(date);

        assert_eq!(
            student.to_string(),
            "Student{studentId=null, name='Ada Lovelace', email='ada@example.com', \
             phone='555-1234', course=None, balance=0, enrollmentDate=2024-01-15}"
        );
    }

    #[test]
    fn test_display_with_course_shows_name_not_id() {
        let mut student = Student::with_contact("Ada", "ada@example.com", "555")
            .with_course(Some(Course::with_id(991, "Analytical Engines")));
        student.set_id(5);

        let rendered = student.to_string();
        assert!(rendered.contains("course=Analytical Engines"));
        assert!(rendered.contains("studentId=5"));
        assert!(!rendered.contains("991"));
    }
}
