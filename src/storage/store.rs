//! The record store: students, courses and the enrollments linking them.
//!
//! Keys are compared case-insensitively everywhere: existence checks,
//! lookups, edits, deletes and the enrollment joins. Keys keep the case they
//! were created with.

use std::{fmt, path::Path};

use crate::{
    domain::{
        Config, Course, CourseDraft, CourseUpdate, Enrollment, Student, StudentDraft,
        StudentUpdate, ValidationError, validate::equals_ignore_case,
    },
    storage::{
        audit::AuditLog,
        line_file::{LineFile, StorageError, ensure_dir},
        record::{Record, columns, key_column},
        table::Table,
    },
};

/// Owns the three collection files and the audit log.
#[derive(Debug)]
pub struct RecordStore {
    students: Table<Student>,
    courses: Table<Course>,
    enrollments: Table<Enrollment>,
    audit: AuditLog,
}

impl RecordStore {
    /// Opens the collections under `root`, creating the directory if needed.
    ///
    /// Collection files themselves are created on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: &Path, config: &Config, audit: AuditLog) -> Result<Self, StorageError> {
        ensure_dir(root)?;
        tracing::debug!("Opening record store at {}", root.display());
        Ok(Self {
            students: Table::new(LineFile::new(root.join(config.students_file()))),
            courses: Table::new(LineFile::new(root.join(config.courses_file()))),
            enrollments: Table::new(LineFile::new(root.join(config.enrollments_file()))),
            audit,
        })
    }

    /// Appends an entry to the audit log.
    ///
    /// Failures are reported as warnings and otherwise ignored.
    pub fn log_event(&mut self, event: impl fmt::Display) {
        if let Err(e) = self.audit.record(&event) {
            tracing::warn!("Failed to write audit entry '{event}': {e}");
        }
    }

    /// Whether a student with this id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the students file cannot be read.
    pub fn student_exists(&self, id: &str) -> Result<bool, StorageError> {
        self.students.contains_key(id)
    }

    /// Looks up a student by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the students file cannot be read.
    pub fn find_student(&self, id: &str) -> Result<Option<Student>, StorageError> {
        self.students.find(id)
    }

    /// All students, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the students file cannot be read.
    pub fn students(&self) -> Result<Vec<Student>, StorageError> {
        self.students.all()
    }

    /// Finds the student with this id and this password.
    ///
    /// Surrounding whitespace in the stored password is ignored; the input
    /// must match it exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the students file cannot be read.
    pub fn authenticate_student(
        &self,
        id: &str,
        password: &str,
    ) -> Result<Option<Student>, StorageError> {
        Ok(self
            .students
            .find(id)?
            .filter(|student| student.password.trim() == password))
    }

    /// Validates and appends a new student.
    ///
    /// # Errors
    ///
    /// - [`RecordError::Validation`] if a field has the wrong shape
    /// - [`RecordError::DuplicateKey`] if the id is already taken, ignoring
    ///   case
    /// - [`RecordError::Storage`] if the file cannot be written
    #[tracing::instrument(level = "debug", skip(self, draft), fields(id = %draft.id))]
    pub fn create_student(&mut self, draft: StudentDraft) -> Result<Student, RecordError> {
        let student = Student::try_from(draft)?;
        if self.students.contains_key(&student.id)? {
            return Err(RecordError::duplicate::<Student>(&student.id));
        }
        self.students.insert(&student)?;

        tracing::info!("Added student: {}", student.id);
        self.log_event(format_args!("Added student {}", student.id));
        Ok(student)
    }

    /// Applies `update` to the student with this id.
    ///
    /// Every field is validated before anything is written: an invalid field
    /// rejects the whole update. An update that changes nothing writes
    /// nothing.
    ///
    /// # Errors
    ///
    /// - [`RecordError::NotFound`] if no student has this id
    /// - [`RecordError::Validation`] if a updated field has the wrong shape
    /// - [`RecordError::Storage`] if the file cannot be rewritten
    #[tracing::instrument(level = "debug", skip(self, update))]
    pub fn update_student(
        &mut self,
        id: &str,
        update: &StudentUpdate,
    ) -> Result<Student, RecordError> {
        let (updated, changed) = self.apply_student_update(id, update)?;
        if changed {
            tracing::info!("Edited student: {}", updated.id);
            self.log_event(format_args!("Edited student {}", updated.id));
        }
        Ok(updated)
    }

    /// Applies a student's edit of their own profile.
    ///
    /// Behaves like [`RecordStore::update_student`], but is audited as the
    /// student's own action.
    ///
    /// # Errors
    ///
    /// As for [`RecordStore::update_student`].
    #[tracing::instrument(level = "debug", skip(self, update))]
    pub fn update_profile(
        &mut self,
        id: &str,
        update: &StudentUpdate,
    ) -> Result<Student, RecordError> {
        let (updated, changed) = self.apply_student_update(id, update)?;
        if changed {
            tracing::info!("Student {} edited profile", updated.id);
            self.log_event(format_args!("Student {} edited profile", updated.id));
        }
        Ok(updated)
    }

    fn apply_student_update(
        &self,
        id: &str,
        update: &StudentUpdate,
    ) -> Result<(Student, bool), RecordError> {
        let current = self
            .students
            .find(id)?
            .ok_or_else(|| RecordError::not_found::<Student>(id))?;
        let updated = update.apply(&current)?;
        let changed = updated != current;
        if changed {
            self.students.replace(&updated)?;
        }
        Ok((updated, changed))
    }

    /// Deletes a student along with all of their enrollments.
    ///
    /// Enrollments are purged first, so an interrupted delete never leaves
    /// an enrollment pointing at a missing student. Returns the number of
    /// enrollments removed.
    ///
    /// # Errors
    ///
    /// - [`RecordError::NotFound`] if no student has this id
    /// - [`RecordError::Storage`] if a file cannot be rewritten
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn delete_student(&mut self, id: &str) -> Result<usize, RecordError> {
        let Some(stored) = self.students.stored_key(id)? else {
            return Err(RecordError::not_found::<Student>(id));
        };
        let id = stored.as_str();

        let dropped = self
            .enrollments
            .remove_where(|line| equals_ignore_case(key_column(line), id))?;
        self.students
            .remove_where(|line| equals_ignore_case(key_column(line), id))?;

        tracing::info!("Deleted student: {id} ({dropped} enrollments removed)");
        self.log_event(format_args!("Deleted student {id}"));
        Ok(dropped)
    }

    /// Whether a course with this code exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the courses file cannot be read.
    pub fn course_exists(&self, code: &str) -> Result<bool, StorageError> {
        self.courses.contains_key(code)
    }

    /// Looks up a course by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the courses file cannot be read.
    pub fn find_course(&self, code: &str) -> Result<Option<Course>, StorageError> {
        self.courses.find(code)
    }

    /// All courses, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the courses file cannot be read.
    pub fn courses(&self) -> Result<Vec<Course>, StorageError> {
        self.courses.all()
    }

    /// Validates and appends a new course.
    ///
    /// # Errors
    ///
    /// - [`RecordError::Validation`] if a field has the wrong shape
    /// - [`RecordError::DuplicateKey`] if the code is already taken,
    ///   ignoring case
    /// - [`RecordError::Storage`] if the file cannot be written
    #[tracing::instrument(level = "debug", skip(self, draft), fields(code = %draft.code))]
    pub fn create_course(&mut self, draft: CourseDraft) -> Result<Course, RecordError> {
        let course = Course::try_from(draft)?;
        if self.courses.contains_key(&course.code)? {
            return Err(RecordError::duplicate::<Course>(&course.code));
        }
        self.courses.insert(&course)?;

        tracing::info!("Added course: {}", course.code);
        self.log_event(format_args!("Added course {}", course.code));
        Ok(course)
    }

    /// Applies `update` to the course with this code.
    ///
    /// An update that changes nothing writes nothing.
    ///
    /// # Errors
    ///
    /// - [`RecordError::NotFound`] if no course has this code
    /// - [`RecordError::Validation`] if the new units are not a whole number
    /// - [`RecordError::Storage`] if the file cannot be rewritten
    #[tracing::instrument(level = "debug", skip(self, update))]
    pub fn update_course(
        &mut self,
        code: &str,
        update: &CourseUpdate,
    ) -> Result<Course, RecordError> {
        let current = self
            .courses
            .find(code)?
            .ok_or_else(|| RecordError::not_found::<Course>(code))?;
        let updated = update.apply(&current)?;
        if updated != current {
            self.courses.replace(&updated)?;
            tracing::info!("Edited course: {}", updated.code);
            self.log_event(format_args!("Edited course {}", updated.code));
        }
        Ok(updated)
    }

    /// Deletes a course along with every enrollment in it.
    ///
    /// Returns the number of enrollments removed.
    ///
    /// # Errors
    ///
    /// - [`RecordError::NotFound`] if no course has this code
    /// - [`RecordError::Storage`] if a file cannot be rewritten
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn delete_course(&mut self, code: &str) -> Result<usize, RecordError> {
        let Some(stored) = self.courses.stored_key(code)? else {
            return Err(RecordError::not_found::<Course>(code));
        };
        let code = stored.as_str();

        let dropped = self.enrollments.remove_where(|line| {
            let fields = columns(line, Enrollment::COLUMNS);
            equals_ignore_case(fields[1].trim(), code)
        })?;
        self.courses
            .remove_where(|line| equals_ignore_case(key_column(line), code))?;

        tracing::info!("Deleted course: {code} ({dropped} enrollments removed)");
        self.log_event(format_args!("Deleted course {code}"));
        Ok(dropped)
    }

    /// Whether the student is enrolled in the course, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollments file cannot be read.
    pub fn is_enrolled(&self, student_id: &str, course_code: &str) -> Result<bool, StorageError> {
        Ok(self.stored_pair(student_id, course_code)?.is_some())
    }

    /// The first enrollment line for the pair, as its stored id and code.
    fn stored_pair(
        &self,
        student_id: &str,
        course_code: &str,
    ) -> Result<Option<(String, String)>, StorageError> {
        Ok(self
            .enrollments
            .file()
            .lines()?
            .iter()
            .find(|line| is_pair(line, student_id, course_code))
            .map(|line| {
                let fields = columns(line, Enrollment::COLUMNS);
                (fields[0].trim().to_string(), fields[1].trim().to_string())
            }))
    }

    /// Enrolls a student in a course.
    ///
    /// The enrollment stores the student id and course code as they appear
    /// in their own collections, whatever case the caller used.
    ///
    /// # Errors
    ///
    /// - [`RecordError::NotFound`] if the student or the course does not
    ///   exist
    /// - [`RecordError::DuplicateEnrollment`] if the student is already
    ///   enrolled in the course
    /// - [`RecordError::Storage`] if a file cannot be read or written
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn enroll(&mut self, student_id: &str, course_code: &str) -> Result<Enrollment, RecordError> {
        let student = self
            .students
            .find(student_id)?
            .ok_or_else(|| RecordError::not_found::<Student>(student_id))?;
        let course = self
            .courses
            .find(course_code)?
            .ok_or_else(|| RecordError::not_found::<Course>(course_code))?;

        if self.is_enrolled(&student.id, &course.code)? {
            return Err(RecordError::DuplicateEnrollment {
                student_id: student.id.to_string(),
                course_code: course.code.to_string(),
            });
        }

        let enrollment = Enrollment {
            student_id: student.id,
            course_code: course.code,
        };
        self.enrollments.insert(&enrollment)?;

        tracing::info!(
            "Enrolled {} in {}",
            enrollment.student_id,
            enrollment.course_code
        );
        self.log_event(format_args!(
            "Student {} enrolled in {}",
            enrollment.student_id, enrollment.course_code
        ));
        Ok(enrollment)
    }

    /// Removes a student's enrollment in a course.
    ///
    /// # Errors
    ///
    /// - [`RecordError::NotFound`] if there is no such enrollment
    /// - [`RecordError::Storage`] if the file cannot be rewritten
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn drop_enrollment(&mut self, student_id: &str, course_code: &str) -> Result<(), RecordError> {
        let Some((stored_id, stored_code)) = self.stored_pair(student_id, course_code)? else {
            return Err(RecordError::NotFound {
                kind: Enrollment::KIND,
                key: format!("{}/{}", student_id.trim(), course_code.trim()),
            });
        };
        self.enrollments
            .remove_where(|line| is_pair(line, &stored_id, &stored_code))?;

        tracing::info!("Dropped {stored_id} from {stored_code}");
        self.log_event(format_args!(
            "Student {stored_id} dropped course {stored_code}"
        ));
        Ok(())
    }

    /// The courses a student is enrolled in, in enrollment order.
    ///
    /// Enrollments naming a course that no longer exists are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a collection file cannot be read.
    pub fn courses_for_student(&self, student_id: &str) -> Result<Vec<Course>, StorageError> {
        let courses = self.courses.all()?;
        Ok(self
            .enrollments
            .all()?
            .iter()
            .filter(|enrollment| enrollment.student_id.matches(student_id))
            .filter_map(|enrollment| {
                courses
                    .iter()
                    .find(|course| course.code.matches(&enrollment.course_code))
                    .cloned()
            })
            .collect())
    }

    /// The students enrolled in a course, in enrollment order.
    ///
    /// Each enrollment resolves to the first student with a matching id.
    ///
    /// # Errors
    ///
    /// Returns an error if a collection file cannot be read.
    pub fn students_in_course(&self, course_code: &str) -> Result<Vec<Student>, StorageError> {
        let students = self.students.all()?;
        Ok(self
            .enrollments
            .all()?
            .iter()
            .filter(|enrollment| enrollment.course_code.matches(course_code))
            .filter_map(|enrollment| {
                students
                    .iter()
                    .find(|student| student.id.matches(&enrollment.student_id))
                    .cloned()
            })
            .collect())
    }
}

fn is_pair(line: &str, student_id: &str, course_code: &str) -> bool {
    let fields = columns(line, Enrollment::COLUMNS);
    equals_ignore_case(fields[0].trim(), student_id.trim())
        && equals_ignore_case(fields[1].trim(), course_code.trim())
}

/// Reasons a record store operation can fail.
///
/// Everything except [`RecordError::Storage`] is expected during normal
/// use and can be fixed by asking the user again.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A field does not have the required shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A record with this key already exists.
    #[error("{kind} '{key}' already exists")]
    DuplicateKey {
        /// The kind of record.
        kind: &'static str,
        /// The rejected key.
        key: String,
    },

    /// The referenced record does not exist.
    #[error("{kind} '{key}' not found")]
    NotFound {
        /// The kind of record.
        kind: &'static str,
        /// The key that was looked up.
        key: String,
    },

    /// The student is already enrolled in the course.
    #[error("student '{student_id}' is already enrolled in '{course_code}'")]
    DuplicateEnrollment {
        /// The student's id.
        student_id: String,
        /// The course's code.
        course_code: String,
    },

    /// A collection file could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RecordError {
    fn duplicate<T: Record>(key: &str) -> Self {
        Self::DuplicateKey {
            kind: T::KIND,
            key: key.to_string(),
        }
    }

    fn not_found<T: Record>(key: &str) -> Self {
        Self::NotFound {
            kind: T::KIND,
            key: key.trim().to_string(),
        }
    }
}
