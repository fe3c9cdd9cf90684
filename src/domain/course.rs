use crate::domain::validate::{RecordKey, ValidationError, parse_whole_number};

/// A course as stored in the courses collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    /// Unique (case-insensitive) course code.
    pub code: RecordKey,
    /// Course title. Not validated.
    pub name: String,
    /// Credit units.
    pub units: u32,
}

/// A new course exactly as entered, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseDraft {
    /// Requested course code.
    pub code: String,
    /// Course title.
    pub name: String,
    /// Credit units, as typed.
    pub units: String,
}

impl TryFrom<CourseDraft> for Course {
    type Error = ValidationError;

    fn try_from(draft: CourseDraft) -> Result<Self, Self::Error> {
        Ok(Self {
            code: RecordKey::new("Course code", draft.code)?,
            name: draft.name,
            units: parse_whole_number("Units", &draft.units)?,
        })
    }
}

/// Changes to apply to an existing course. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseUpdate {
    /// Replacement title.
    pub name: Option<String>,
    /// Replacement units, as typed.
    pub units: Option<String>,
}

impl CourseUpdate {
    /// Returns a copy of `course` with every present field applied.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the new units are not a whole number.
    pub fn apply(&self, course: &Course) -> Result<Course, ValidationError> {
        let mut updated = course.clone();
        if let Some(name) = &self.name {
            updated.name.clone_from(name);
        }
        if let Some(units) = &self.units {
            updated.units = parse_whole_number("Units", units)?;
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_must_be_whole() {
        let draft = CourseDraft {
            code: "CS101".to_string(),
            name: "Intro".to_string(),
            units: "3.5".to_string(),
        };
        assert!(matches!(
            Course::try_from(draft),
            Err(ValidationError::NotWholeNumber { field: "Units", .. })
        ));
    }

    #[test]
    fn code_must_be_alphanumeric() {
        let draft = CourseDraft {
            code: "CS 101".to_string(),
            name: "Intro".to_string(),
            units: "3".to_string(),
        };
        assert!(matches!(
            Course::try_from(draft),
            Err(ValidationError::NotAlphanumeric { .. })
        ));
    }
}
