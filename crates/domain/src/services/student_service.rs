use crate::entities::Student;
use crate::errors::DomainError;
use crate::repositories::{CourseRepository, StudentRepository};
use std::sync::Arc;
use tracing::{debug, info};

/// Student Service - orchestrates the student and course repositories.
///
/// Holds no rules of its own beyond lookups; constraint enforcement lives in
/// the repositories.
pub struct StudentService {
    student_repository: Arc<dyn StudentRepository>,
    course_repository: Arc<dyn CourseRepository>,
}

impl StudentService {
    pub fn new(
        student_repository: Arc<dyn StudentRepository>,
        course_repository: Arc<dyn CourseRepository>,
    ) -> Self {
        Self {
            student_repository,
            course_repository,
        }
    }

    /// Create and store a student enrolled today with a zero balance
    pub async fn register_student(
        &self,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Student, DomainError> {
        let student = Student::new()
            .with_name(name)
            .with_email(email)
            .with_phone(phone.map(str::to_string));

        let saved = self.student_repository.insert(&student).await?;
        info!(student_id = ?saved.id(), "registered student");
        Ok(saved)
    }

    /// Get student by ID
    pub async fn get_student(&self, id: i64) -> Result<Student, DomainError> {
        self.student_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::StudentNotFound(id))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DomainError> {
        self.student_repository.find_by_email(email).await
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, DomainError> {
        self.student_repository.find_all().await
    }

    pub async fn update_student(&self, student: &Student) -> Result<Student, DomainError> {
        debug!(student_id = ?student.id(), "updating student");
        self.student_repository.update(student).await
    }

    /// Point a student at a stored course
    pub async fn assign_course(&self, student_id: i64, course_id: i64) -> Result<Student, DomainError> {
        let course = self
            .course_repository
            .find_by_id(course_id)
            .await?
            .ok_or(DomainError::CourseNotFound(course_id))?;

        let mut student = self.get_student(student_id).await?;
        student.set_course(Some(course));

        let updated = self.student_repository.update(&student).await?;
        info!(student_id, course_id, "assigned course");
        Ok(updated)
    }

    pub async fn clear_course(&self, student_id: i64) -> Result<Student, DomainError> {
        let student = self.get_student(student_id).await?.with_course(None);
        self.student_repository.update(&student).await
    }

    pub async fn delete_student(&self, id: i64) -> Result<(), DomainError> {
        self.student_repository.delete(id).await?;
        info!(student_id = id, "deleted student");
        Ok(())
    }
}
