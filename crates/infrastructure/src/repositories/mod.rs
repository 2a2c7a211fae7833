pub mod memory;
pub mod sqlite_course_repository;
pub mod sqlite_student_repository;

pub use memory::{InMemoryCourseRepository, InMemoryStudentRepository};
pub use sqlite_course_repository::SqliteCourseRepository;
pub use sqlite_student_repository::SqliteStudentRepository;
