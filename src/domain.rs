//! Domain models for the record manager.
//!
//! This module contains the three record types, the inputs used to create and
//! edit them, the field validators, and configuration.

mod config;
pub use config::{Config, DisplayMode};

mod course;
pub use course::{Course, CourseDraft, CourseUpdate};

mod enrollment;
pub use enrollment::Enrollment;

mod student;
pub use student::{Student, StudentDraft, StudentUpdate};

/// Field validators and validated string types.
pub mod validate;
pub use validate::{PersonName, RecordKey, ValidationError};
