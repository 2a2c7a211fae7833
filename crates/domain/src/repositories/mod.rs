pub mod constraints;
pub mod course_repository;
pub mod student_repository;

pub use constraints::*;
pub use course_repository::CourseRepository;
pub use student_repository::StudentRepository;
