use crate::database::{courses, run_blocking, SqlitePool, StorageError};
use async_trait::async_trait;
use diesel::prelude::*;
use domain::{validate_course, Course, CourseRepository, DomainError};
use tracing::debug;

// Database model
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct CourseRow {
    course_id: i64,
    course_name: String,
}

#[derive(Insertable)]
#[diesel(table_name = courses)]
struct NewCourseRow {
    course_name: String,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course::with_id(row.course_id, row.course_name)
    }
}

pub struct SqliteCourseRepository {
    pool: SqlitePool,
}

impl SqliteCourseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for SqliteCourseRepository {
    async fn insert(&self, course: &Course) -> Result<Course, DomainError> {
        if let Some(id) = course.id {
            return Err(DomainError::validation(format!("course {} is already persisted", id)));
        }
        validate_course(course)?;

        let new_course = NewCourseRow {
            course_name: course.course_name.clone(),
        };

        let saved = run_blocking(&self.pool, move |conn| {
            let row = diesel::insert_into(courses::table)
                .values(&new_course)
                .returning(CourseRow::as_returning())
                .get_result::<CourseRow>(conn)?;
            Ok(Course::from(row))
        })
        .await?;

        debug!(course_id = ?saved.id, "inserted course");
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Course>, DomainError> {
        run_blocking(&self.pool, move |conn| {
            let row = courses::table
                .find(id)
                .select(CourseRow::as_select())
                .first::<CourseRow>(conn)
                .optional()?;
            Ok(row.map(Course::from))
        })
        .await
    }

    async fn find_all(&self) -> Result<Vec<Course>, DomainError> {
        run_blocking(&self.pool, |conn| {
            let rows = courses::table
                .order(courses::course_id.asc())
                .select(CourseRow::as_select())
                .load::<CourseRow>(conn)?;
            Ok(rows.into_iter().map(Course::from).collect())
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let deleted = run_blocking(&self.pool, move |conn| {
            diesel::delete(courses::table.find(id))
                .execute(conn)
                .map_err(StorageError::from)
        })
        .await?;

        if deleted == 0 {
            return Err(DomainError::CourseNotFound(id));
        }
        debug!(course_id = id, "deleted course");
        Ok(())
    }
}
