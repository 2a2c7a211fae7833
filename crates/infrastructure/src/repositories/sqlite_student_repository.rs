use crate::database::error::{is_foreign_key_violation, is_unique_violation};
use crate::database::{courses, run_blocking, students, SqlitePool, StorageError};
use crate::repositories::sqlite_course_repository::CourseRow;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use domain::{validate_student, Course, DomainError, Student, StudentRepository};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

// Database model - separate from domain entity
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct StudentRow {
    student_id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    course_id: Option<i64>,
    balance: String,
    enrollment_date: NaiveDate,
}

/// Column values written on insert and update. `None` clears the column.
#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = students)]
#[diesel(treat_none_as_null = true)]
struct StudentValues {
    name: String,
    email: String,
    phone: Option<String>,
    course_id: Option<i64>,
    balance: String,
    enrollment_date: NaiveDate,
}

/// A student row joined with its course, loaded in one query.
type StudentWithCourse = (StudentRow, Option<CourseRow>);

impl StudentValues {
    /// Expects a student that already passed `validate_student`.
    fn from_validated(student: &Student) -> Result<Self, DomainError> {
        let name = student
            .name()
            .ok_or_else(|| DomainError::validation("name is required"))?;
        let email = student
            .email()
            .ok_or_else(|| DomainError::validation("email is required"))?;

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: student.phone().map(str::to_string),
            course_id: student.course_id(),
            balance: student.balance().to_string(),
            enrollment_date: student.enrollment_date(),
        })
    }
}

fn into_student((row, course): StudentWithCourse) -> Result<Student, StorageError> {
    let balance = Decimal::from_str(&row.balance).map_err(|e| {
        DomainError::repository(format!(
            "invalid balance '{}' stored for student {}: {}",
            row.balance, row.student_id, e
        ))
    })?;

    let mut student = Student::new()
        .with_name(row.name)
        .with_email(row.email)
        .with_phone(row.phone)
        .with_course(course.map(Course::from))
        .with_balance(balance)
        .with_enrollment_date(row.enrollment_date);
    student.set_id(row.student_id);
    Ok(student)
}

fn load_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Student>, StorageError> {
    students::table
        .left_join(courses::table)
        .filter(students::student_id.eq(id))
        .select((StudentRow::as_select(), Option::<CourseRow>::as_select()))
        .first::<StudentWithCourse>(conn)
        .optional()?
        .map(into_student)
        .transpose()
}

/// Pre-checks the constraints SQLite would otherwise report as opaque errors.
fn check_references(
    conn: &mut SqliteConnection,
    values: &StudentValues,
    own_id: Option<i64>,
) -> Result<(), StorageError> {
    let mut same_email = students::table
        .filter(students::email.eq(&values.email))
        .select(students::student_id)
        .into_boxed();
    if let Some(id) = own_id {
        same_email = same_email.filter(students::student_id.ne(id));
    }
    if same_email.first::<i64>(conn).optional()?.is_some() {
        return Err(DomainError::EmailAlreadyExists(values.email.clone()).into());
    }

    if let Some(course_id) = values.course_id {
        let exists = courses::table
            .find(course_id)
            .select(courses::course_id)
            .first::<i64>(conn)
            .optional()?
            .is_some();
        if !exists {
            return Err(DomainError::CourseNotFound(course_id).into());
        }
    }
    Ok(())
}

fn classify_write_error(err: DieselError, values: &StudentValues) -> StorageError {
    if is_unique_violation(&err) {
        return DomainError::EmailAlreadyExists(values.email.clone()).into();
    }
    match values.course_id {
        Some(course_id) if is_foreign_key_violation(&err) => DomainError::CourseNotFound(course_id).into(),
        _ => err.into(),
    }
}

pub struct SqliteStudentRepository {
    pool: SqlitePool,
}

impl SqliteStudentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentRepository for SqliteStudentRepository {
    async fn insert(&self, student: &Student) -> Result<Student, DomainError> {
        if let Some(id) = student.id() {
            return Err(DomainError::validation(format!("student {} is already persisted", id)));
        }
        let values = StudentValues::from_validated(&validate_student(student)?)?;

        let saved = run_blocking(&self.pool, move |conn| {
            conn.immediate_transaction::<_, StorageError, _>(|conn| {
                check_references(conn, &values, None)?;

                let id = diesel::insert_into(students::table)
                    .values(&values)
                    .returning(students::student_id)
                    .get_result::<i64>(conn)
                    .map_err(|e| classify_write_error(e, &values))?;

                load_by_id(conn, id)?.ok_or_else(|| DomainError::StudentNotFound(id).into())
            })
        })
        .await?;

        debug!(student_id = ?saved.id(), "inserted student");
        Ok(saved)
    }

    async fn update(&self, student: &Student) -> Result<Student, DomainError> {
        let id = student
            .id()
            .ok_or_else(|| DomainError::validation("Student ID is required for updates"))?;
        let values = StudentValues::from_validated(&validate_student(student)?)?;

        let updated = run_blocking(&self.pool, move |conn| {
            conn.immediate_transaction::<_, StorageError, _>(|conn| {
                let exists = students::table
                    .find(id)
                    .select(students::student_id)
                    .first::<i64>(conn)
                    .optional()?
                    .is_some();
                if !exists {
                    return Err(DomainError::StudentNotFound(id).into());
                }

                check_references(conn, &values, Some(id))?;

                diesel::update(students::table.find(id))
                    .set(&values)
                    .execute(conn)
                    .map_err(|e| classify_write_error(e, &values))?;

                load_by_id(conn, id)?.ok_or_else(|| DomainError::StudentNotFound(id).into())
            })
        })
        .await?;

        debug!(student_id = id, "updated student");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let deleted = run_blocking(&self.pool, move |conn| {
            diesel::delete(students::table.find(id))
                .execute(conn)
                .map_err(StorageError::from)
        })
        .await?;

        if deleted == 0 {
            return Err(DomainError::StudentNotFound(id));
        }
        debug!(student_id = id, "deleted student");
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>, DomainError> {
        run_blocking(&self.pool, move |conn| load_by_id(conn, id)).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DomainError> {
        let email = email.to_string();

        run_blocking(&self.pool, move |conn| {
            students::table
                .left_join(courses::table)
                .filter(students::email.eq(email))
                .select((StudentRow::as_select(), Option::<CourseRow>::as_select()))
                .first::<StudentWithCourse>(conn)
                .optional()?
                .map(into_student)
                .transpose()
        })
        .await
    }

    async fn find_all(&self) -> Result<Vec<Student>, DomainError> {
        run_blocking(&self.pool, |conn| {
            students::table
                .left_join(courses::table)
                .order(students::student_id.asc())
                .select((StudentRow::as_select(), Option::<CourseRow>::as_select()))
                .load::<StudentWithCourse>(conn)?
                .into_iter()
                .map(into_student)
                .collect()
        })
        .await
    }

    async fn find_by_course(&self, course_id: i64) -> Result<Vec<Student>, DomainError> {
        run_blocking(&self.pool, move |conn| {
            students::table
                .left_join(courses::table)
                .filter(students::course_id.eq(course_id))
                .order(students::student_id.asc())
                .select((StudentRow::as_select(), Option::<CourseRow>::as_select()))
                .load::<StudentWithCourse>(conn)?
                .into_iter()
                .map(into_student)
                .collect()
        })
        .await
    }
}
