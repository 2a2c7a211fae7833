use config::Config;
use domain::*;
use infrastructure::*;
use std::sync::Arc;
use tracing::info;

/// Student records application - wires storage adapters into the services
pub struct StudentApp {
    pub student_service: StudentService,
    pub course_service: CourseService,
}

impl StudentApp {
    /// SQLite-backed application; applies pending migrations first.
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        // Infrastructure layer - database setup
        let database = Database::new(&config.database_path, config.pool_size)?;
        database.run_migrations()?;
        info!(path = %config.database_path, pool_size = config.pool_size, "database ready");

        let pool = database.get_pool().clone();
        let student_repository: Arc<dyn StudentRepository> =
            Arc::new(SqliteStudentRepository::new(pool.clone()));
        let course_repository: Arc<dyn CourseRepository> =
            Arc::new(SqliteCourseRepository::new(pool));

        Ok(Self::from_repositories(student_repository, course_repository))
    }

    /// Application backed by the in-memory repositories; nothing is persisted.
    pub fn in_memory() -> Self {
        let courses = Arc::new(InMemoryCourseRepository::new());
        let student_repository: Arc<dyn StudentRepository> =
            Arc::new(InMemoryStudentRepository::new(courses.clone()));
        let course_repository: Arc<dyn CourseRepository> = courses;

        Self::from_repositories(student_repository, course_repository)
    }

    pub fn from_repositories(
        student_repository: Arc<dyn StudentRepository>,
        course_repository: Arc<dyn CourseRepository>,
    ) -> Self {
        // Domain services
        let student_service =
            StudentService::new(student_repository.clone(), course_repository.clone());
        let course_service = CourseService::new(course_repository, student_repository);

        Self {
            student_service,
            course_service,
        }
    }
}
