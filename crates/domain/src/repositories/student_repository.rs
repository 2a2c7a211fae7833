use crate::entities::Student;
use crate::errors::DomainError;
use async_trait::async_trait;

/// Repository trait - everything the domain needs from student storage.
///
/// Implementations own identifier assignment and constraint enforcement
/// (see [`validate_student`](crate::repositories::validate_student)) and must
/// return students with their course already loaded.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Stores a transient student and returns it with its generated id.
    async fn insert(&self, student: &Student) -> Result<Student, DomainError>;
    async fn update(&self, student: &Student) -> Result<Student, DomainError>;
    async fn delete(&self, id: i64) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Student>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Student>, DomainError>;
    async fn find_by_course(&self, course_id: i64) -> Result<Vec<Student>, DomainError>;
}
