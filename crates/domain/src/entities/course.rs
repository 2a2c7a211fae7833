use serde::{Deserialize, Serialize};
use std::fmt;

/// A course students can be enrolled in. Students reference it but never own it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Option<i64>, // None until the course repository stores it
    pub course_name: String,
}

impl Course {
    pub fn new(course_name: impl Into<String>) -> Self {
        Self {
            id: None,
            course_name: course_name.into(),
        }
    }

    pub fn with_id(id: i64, course_name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            course_name: course_name.into(),
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "Course{{courseId={}, courseName='{}'}}", id, self.course_name),
            None => write!(f, "Course{{courseId=null, courseName='{}'}}", self.course_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_display() {
        assert_eq!(
            Course::with_id(3, "Physics").to_string(),
            "Course{courseId=3, courseName='Physics'}"
        );
        assert_eq!(
            Course::new("Physics").to_string(),
            "Course{courseId=null, courseName='Physics'}"
        );
    }
}
