use crate::entities::{Course, Student};
use crate::errors::DomainError;
use crate::repositories::{CourseRepository, StudentRepository};
use std::sync::Arc;
use tracing::info;

pub struct CourseService {
    course_repository: Arc<dyn CourseRepository>,
    student_repository: Arc<dyn StudentRepository>,
}

impl CourseService {
    pub fn new(
        course_repository: Arc<dyn CourseRepository>,
        student_repository: Arc<dyn StudentRepository>,
    ) -> Self {
        Self {
            course_repository,
            student_repository,
        }
    }

    pub async fn create_course(&self, course_name: &str) -> Result<Course, DomainError> {
        let course = self.course_repository.insert(&Course::new(course_name)).await?;
        info!(course_id = ?course.id, "created course");
        Ok(course)
    }

    pub async fn get_course(&self, id: i64) -> Result<Course, DomainError> {
        self.course_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::CourseNotFound(id))
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, DomainError> {
        self.course_repository.find_all().await
    }

    pub async fn students_in_course(&self, course_id: i64) -> Result<Vec<Student>, DomainError> {
        self.get_course(course_id).await?;
        self.student_repository.find_by_course(course_id).await
    }

    /// Delete a course nobody is enrolled in
    pub async fn delete_course(&self, id: i64) -> Result<(), DomainError> {
        let enrolled = self.student_repository.find_by_course(id).await?;
        if !enrolled.is_empty() {
            return Err(DomainError::validation(format!(
                "course {} still has {} enrolled students",
                id,
                enrolled.len()
            )));
        }

        self.course_repository.delete(id).await?;
        info!(course_id = id, "deleted course");
        Ok(())
    }
}
