use crate::domain::validate::RecordKey;

/// Associates a student with a course they are taking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    /// The enrolled student's id.
    pub student_id: RecordKey,
    /// The course's code.
    pub course_code: RecordKey,
}
