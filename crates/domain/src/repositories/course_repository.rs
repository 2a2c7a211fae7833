use crate::entities::Course;
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn insert(&self, course: &Course) -> Result<Course, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Course>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Course>, DomainError>;
    async fn delete(&self, id: i64) -> Result<(), DomainError>;
}
