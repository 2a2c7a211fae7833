// Database schema for student records, matching the embedded migrations
diesel::table! {
    courses (course_id) {
        course_id -> BigInt,
        course_name -> Text,       // Display name, at most 100 characters
    }
}

diesel::table! {
    students (student_id) {
        student_id -> BigInt,
        name -> Text,
        email -> Text,             // Unique across all students
        phone -> Nullable<Text>,
        course_id -> Nullable<BigInt>,
        balance -> Text,           // Decimal text, always scale 2
        enrollment_date -> Date,
    }
}

diesel::joinable!(students -> courses (course_id));

diesel::allow_tables_to_appear_in_same_query!(courses, students,);
