//! In-memory repositories for tests and embedding.
//!
//! They enforce the same constraints as the SQLite adapters: generated ids,
//! unique emails, known course references, courses that cannot be deleted
//! while referenced, and eager course loading.

use async_trait::async_trait;
use domain::{
    validate_course, validate_student, Course, CourseRepository, DomainError, Student,
    StudentRepository,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCourseRepository {
    courses: RwLock<Table<Course>>,
    /// student id -> course id, the in-memory `students.course_id` foreign key.
    enrollments: RwLock<BTreeMap<i64, i64>>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points `student_id` at `course_id`, or drops its reference on `None`.
    /// Fails with `CourseNotFound` when the course does not exist.
    async fn enroll(&self, student_id: i64, course_id: Option<i64>) -> Result<(), DomainError> {
        let courses = self.courses.read().await;
        let mut enrollments = self.enrollments.write().await;
        match course_id {
            Some(course_id) if !courses.rows.contains_key(&course_id) => {
                return Err(DomainError::CourseNotFound(course_id));
            }
            Some(course_id) => {
                enrollments.insert(student_id, course_id);
            }
            None => {
                enrollments.remove(&student_id);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn insert(&self, course: &Course) -> Result<Course, DomainError> {
        if let Some(id) = course.id {
            return Err(DomainError::validation(format!("course {} is already persisted", id)));
        }
        validate_course(course)?;

        let mut courses = self.courses.write().await;
        let id = courses.allocate_id();
        let saved = Course::with_id(id, course.course_name.clone());
        courses.rows.insert(id, saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Course>, DomainError> {
        let courses = self.courses.read().await;
        Ok(courses.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Course>, DomainError> {
        let courses = self.courses.read().await;
        Ok(courses.rows.values().cloned().collect())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let mut courses = self.courses.write().await;
        if !courses.rows.contains_key(&id) {
            return Err(DomainError::CourseNotFound(id));
        }
        if self.enrollments.read().await.values().any(|&course_id| course_id == id) {
            return Err(DomainError::repository(format!(
                "FOREIGN KEY constraint failed: course {} is still referenced by students",
                id
            )));
        }
        courses.rows.remove(&id);
        Ok(())
    }
}

/// Students are kept with a course id only, like the `students` table, and
/// the course is resolved on every read.
#[derive(Debug)]
pub struct InMemoryStudentRepository {
    students: RwLock<Table<Student>>,
    courses: Arc<InMemoryCourseRepository>,
}

impl InMemoryStudentRepository {
    pub fn new(courses: Arc<InMemoryCourseRepository>) -> Self {
        Self {
            students: RwLock::new(Table::default()),
            courses,
        }
    }

    async fn resolve_course(&self, mut student: Student) -> Result<Student, DomainError> {
        let course = match student.course_id() {
            Some(course_id) => self.courses.find_by_id(course_id).await?,
            None => None,
        };
        student.set_course(course);
        Ok(student)
    }

    async fn resolve_all(&self, students: Vec<Student>) -> Result<Vec<Student>, DomainError> {
        let mut resolved = Vec::with_capacity(students.len());
        for student in students {
            resolved.push(self.resolve_course(student).await?);
        }
        Ok(resolved)
    }
}

fn email_taken(table: &Table<Student>, email: Option<&str>, own_id: Option<i64>) -> bool {
    table
        .rows
        .iter()
        .any(|(id, s)| Some(*id) != own_id && s.email() == email)
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn insert(&self, student: &Student) -> Result<Student, DomainError> {
        if let Some(id) = student.id() {
            return Err(DomainError::validation(format!("student {} is already persisted", id)));
        }
        let mut stored = validate_student(student)?;

        let mut students = self.students.write().await;
        if email_taken(&students, stored.email(), None) {
            return Err(DomainError::EmailAlreadyExists(
                stored.email().unwrap_or_default().to_string(),
            ));
        }

        // A rejected course must not burn an id.
        self.courses.enroll(students.next_id, stored.course_id()).await?;
        let id = students.allocate_id();
        stored.set_id(id);
        students.rows.insert(id, stored.clone());
        drop(students);

        self.resolve_course(stored).await
    }

    async fn update(&self, student: &Student) -> Result<Student, DomainError> {
        let id = student
            .id()
            .ok_or_else(|| DomainError::validation("Student ID is required for updates"))?;
        let stored = validate_student(student)?;

        let mut students = self.students.write().await;
        if !students.rows.contains_key(&id) {
            return Err(DomainError::StudentNotFound(id));
        }
        if email_taken(&students, stored.email(), Some(id)) {
            return Err(DomainError::EmailAlreadyExists(
                stored.email().unwrap_or_default().to_string(),
            ));
        }
        self.courses.enroll(id, stored.course_id()).await?;
        students.rows.insert(id, stored.clone());
        drop(students);

        self.resolve_course(stored).await
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let mut students = self.students.write().await;
        if students.rows.remove(&id).is_none() {
            return Err(DomainError::StudentNotFound(id));
        }
        self.courses.enroll(id, None).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>, DomainError> {
        let found = self.students.read().await.rows.get(&id).cloned();
        match found {
            Some(student) => Ok(Some(self.resolve_course(student).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>, DomainError> {
        let found = self
            .students
            .read()
            .await
            .rows
            .values()
            .find(|s| s.email() == Some(email))
            .cloned();
        match found {
            Some(student) => Ok(Some(self.resolve_course(student).await?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Student>, DomainError> {
        let all: Vec<Student> = self.students.read().await.rows.values().cloned().collect();
        self.resolve_all(all).await
    }

    async fn find_by_course(&self, course_id: i64) -> Result<Vec<Student>, DomainError> {
        let matching: Vec<Student> = self
            .students
            .read()
            .await
            .rows
            .values()
            .filter(|s| s.course_id() == Some(course_id))
            .cloned()
            .collect();
        self.resolve_all(matching).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repositories() -> (Arc<InMemoryCourseRepository>, InMemoryStudentRepository) {
        let courses = Arc::new(InMemoryCourseRepository::new());
        let students = InMemoryStudentRepository::new(courses.clone());
        (courses, students)
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let (_, students) = repositories();

        let first = students
            .insert(&Student::with_contact("A", "a@example.com", "1"))
            .await
            .unwrap();
        students.delete(first.id().unwrap()).await.unwrap();
        let second = students
            .insert(&Student::with_contact("B", "b@example.com", "2"))
            .await
            .unwrap();

        assert_eq!(first.id(), Some(1));
        assert_eq!(second.id(), Some(2));
    }

    #[tokio::test]
    async fn test_course_rename_visible_through_student() {
        let (courses, students) = repositories();
        let course = courses.insert(&Course::new("Chemistry")).await.unwrap();

        let saved = students
            .insert(&Student::with_contact("A", "a@example.com", "1").with_course(Some(course.clone())))
            .await
            .unwrap();

        // Replace the stored course row directly; reads must pick it up.
        let id = course.id.unwrap();
        courses
            .courses
            .write()
            .await
            .rows
            .insert(id, Course::with_id(id, "Organic Chemistry"));

        let loaded = students.find_by_id(saved.id().unwrap()).await.unwrap().unwrap();
        assert_eq!(loaded.course().unwrap().course_name, "Organic Chemistry");
    }

    #[tokio::test]
    async fn test_course_released_when_students_leave() {
        let (courses, students) = repositories();
        let art = courses.insert(&Course::new("Art")).await.unwrap();
        let music = courses.insert(&Course::new("Music")).await.unwrap();

        let moved = students
            .insert(&Student::with_contact("A", "a@example.com", "1").with_course(Some(art.clone())))
            .await
            .unwrap();
        let stayed = students
            .insert(&Student::with_contact("B", "b@example.com", "2").with_course(Some(music.clone())))
            .await
            .unwrap();

        let moved_id = moved.id().unwrap();

        assert!(courses.delete(art.id.unwrap()).await.is_err());
        students.update(&moved.with_course(Some(music.clone()))).await.unwrap();
        courses.delete(art.id.unwrap()).await.unwrap();

        students.delete(stayed.id().unwrap()).await.unwrap();
        assert!(courses.delete(music.id.unwrap()).await.is_err());
        students.delete(moved_id).await.unwrap();
        courses.delete(music.id.unwrap()).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_course_does_not_consume_id() {
        let (_, students) = repositories();

        let ghost = Student::with_contact("A", "a@example.com", "1")
            .with_course(Some(Course::with_id(7, "Ghost")));
        assert_eq!(
            students.insert(&ghost).await.unwrap_err(),
            DomainError::CourseNotFound(7)
        );

        let saved = students
            .insert(&Student::with_contact("A", "a@example.com", "1"))
            .await
            .unwrap();
        assert_eq!(saved.id(), Some(1));
    }
}
