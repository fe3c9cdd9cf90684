use crate::domain::validate::{PersonName, RecordKey, ValidationError, parse_whole_number};

/// A student as stored in the students collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Unique (case-insensitive) student id.
    pub id: RecordKey,
    /// The student's full name.
    pub name: PersonName,
    /// Contact email. Not validated.
    pub email: String,
    /// Age in years.
    pub age: u32,
    /// Degree program.
    pub program: String,
    /// Login password, stored as entered.
    pub password: String,
}

/// A new student exactly as entered, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDraft {
    /// Requested student id.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Age, as typed.
    pub age: String,
    /// Degree program.
    pub program: String,
    /// Login password.
    pub password: String,
}

impl TryFrom<StudentDraft> for Student {
    type Error = ValidationError;

    fn try_from(draft: StudentDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RecordKey::new("Student ID", draft.id)?,
            name: PersonName::new(draft.name)?,
            email: draft.email,
            age: parse_whole_number("Age", &draft.age)?,
            program: draft.program,
            password: draft.password,
        })
    }
}

/// Changes to apply to an existing student. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentUpdate {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement email.
    pub email: Option<String>,
    /// Replacement age, as typed.
    pub age: Option<String>,
    /// Replacement program.
    pub program: Option<String>,
}

impl StudentUpdate {
    /// Returns a copy of `student` with every present field applied.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered; `student` itself is
    /// never modified.
    pub fn apply(&self, student: &Student) -> Result<Student, ValidationError> {
        let mut updated = student.clone();
        if let Some(name) = &self.name {
            updated.name = PersonName::new(name.clone())?;
        }
        if let Some(email) = &self.email {
            updated.email.clone_from(email);
        }
        if let Some(age) = &self.age {
            updated.age = parse_whole_number("Age", age)?;
        }
        if let Some(program) = &self.program {
            updated.program.clone_from(program);
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> Student {
        StudentDraft {
            id: "S1".to_string(),
            name: "Ann Lee".to_string(),
            email: "a@x.com".to_string(),
            age: "20".to_string(),
            program: "CS".to_string(),
            password: "pw1".to_string(),
        }
        .try_into()
        .unwrap()
    }

    #[test]
    fn draft_rejects_bad_age() {
        let draft = StudentDraft {
            id: "S1".to_string(),
            name: "Ann".to_string(),
            age: "twenty".to_string(),
            ..StudentDraft::default()
        };
        let err = Student::try_from(draft).unwrap_err();
        assert_eq!(err.field(), "Age");
    }

    #[test]
    fn empty_update_is_identity() {
        let student = ann();
        assert_eq!(StudentUpdate::default().apply(&student).unwrap(), student);
    }

    #[test]
    fn update_rejected_as_a_whole() {
        let student = ann();
        let update = StudentUpdate {
            email: Some("new@x.com".to_string()),
            age: Some("old".to_string()),
            ..StudentUpdate::default()
        };
        assert!(update.apply(&student).is_err());
        assert_eq!(student.email, "a@x.com");
    }

    #[test]
    fn update_applies_fields() {
        let update = StudentUpdate {
            name: Some("Ann Marie Lee".to_string()),
            age: Some("21".to_string()),
            ..StudentUpdate::default()
        };
        let updated = update.apply(&ann()).unwrap();
        assert_eq!(updated.name.as_str(), "Ann Marie Lee");
        assert_eq!(updated.age, 21);
        assert_eq!(updated.program, "CS");
    }
}
