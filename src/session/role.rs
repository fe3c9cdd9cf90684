use crate::domain::RecordKey;

/// The authenticated user of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// The administrator, who manages all records.
    Admin,
    /// A student, who manages their own profile and enrollments.
    Student {
        /// The student's id as stored.
        id: RecordKey,
    },
}

impl Role {
    /// The heading printed above the menu.
    #[must_use]
    pub const fn menu_title(&self) -> &'static str {
        match self {
            Self::Admin => "--- Admin Menu ---",
            Self::Student { .. } => "--- Student Menu ---",
        }
    }

    /// Numbered menu labels, starting from 1.
    #[must_use]
    pub fn menu_labels(&self) -> Vec<&'static str> {
        match self {
            Self::Admin => AdminOption::ALL.iter().map(|o| o.label()).collect(),
            Self::Student { .. } => StudentOption::ALL.iter().map(|o| o.label()).collect(),
        }
    }

    /// The number of menu options.
    #[must_use]
    pub const fn option_count(&self) -> usize {
        match self {
            Self::Admin => AdminOption::ALL.len(),
            Self::Student { .. } => StudentOption::ALL.len(),
        }
    }
}

/// Parses a menu selection.
///
/// Accepts only a non-empty run of ASCII digits naming an option in
/// `1..=count`.
#[must_use]
pub fn parse_selection(input: &str, count: usize) -> Option<usize> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
}

/// An entry of the admin menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum AdminOption {
    AddStudent,
    AddCourse,
    ViewAllStudents,
    ViewAllCourses,
    ViewStudentsPerCourse,
    EditStudent,
    EditCourse,
    DeleteStudent,
    DeleteCourse,
    ChangeDisplayMode,
    Logout,
}

impl AdminOption {
    /// Every option, in menu order.
    pub const ALL: [Self; 11] = [
        Self::AddStudent,
        Self::AddCourse,
        Self::ViewAllStudents,
        Self::ViewAllCourses,
        Self::ViewStudentsPerCourse,
        Self::EditStudent,
        Self::EditCourse,
        Self::DeleteStudent,
        Self::DeleteCourse,
        Self::ChangeDisplayMode,
        Self::Logout,
    ];

    /// The option for a 1-based menu number.
    #[must_use]
    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// The menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AddStudent => "Add Student",
            Self::AddCourse => "Add Course",
            Self::ViewAllStudents => "View All Students",
            Self::ViewAllCourses => "View All Courses",
            Self::ViewStudentsPerCourse => "View Students per Course",
            Self::EditStudent => "Edit Student",
            Self::EditCourse => "Edit Course",
            Self::DeleteStudent => "Delete Student",
            Self::DeleteCourse => "Delete Course",
            Self::ChangeDisplayMode => "Change Display Mode",
            Self::Logout => "Logout",
        }
    }
}

/// An entry of the student menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum StudentOption {
    ViewProfile,
    Enroll,
    ViewEnrolledCourses,
    EditProfile,
    DropCourse,
    ChangeDisplayMode,
    Logout,
}

impl StudentOption {
    /// Every option, in menu order.
    pub const ALL: [Self; 7] = [
        Self::ViewProfile,
        Self::Enroll,
        Self::ViewEnrolledCourses,
        Self::EditProfile,
        Self::DropCourse,
        Self::ChangeDisplayMode,
        Self::Logout,
    ];

    /// The option for a 1-based menu number.
    #[must_use]
    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// The menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ViewProfile => "View Profile",
            Self::Enroll => "Enroll in Course",
            Self::ViewEnrolledCourses => "View Enrolled Courses",
            Self::EditProfile => "Edit Profile",
            Self::DropCourse => "Drop Course",
            Self::ChangeDisplayMode => "Change Display Mode",
            Self::Logout => "Logout",
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("1", Some(1); "lowest")]
    #[test_case("11", Some(11); "highest")]
    #[test_case("0", None; "zero")]
    #[test_case("12", None; "above range")]
    #[test_case("", None; "empty")]
    #[test_case(" 3", None; "leading space")]
    #[test_case("+3", None; "sign")]
    #[test_case("99999999999999999999999", None; "overflow")]
    fn admin_selection(input: &str, expected: Option<usize>) {
        assert_eq!(parse_selection(input, Role::Admin.option_count()), expected);
    }

    #[test]
    fn option_tables() {
        assert_eq!(Role::Admin.option_count(), 11);
        let student = Role::Student {
            id: RecordKey::new("Student ID", "S1").unwrap(),
        };
        assert_eq!(student.option_count(), 7);
        assert_eq!(student.menu_labels()[1], "Enroll in Course");

        assert_eq!(AdminOption::from_number(10), Some(AdminOption::ChangeDisplayMode));
        assert_eq!(AdminOption::from_number(0), None);
        assert_eq!(StudentOption::from_number(7), Some(StudentOption::Logout));
        assert_eq!(StudentOption::from_number(8), None);
    }
}
