//! Comma-delimited line encoding for the three record types.
//!
//! Fields are written in a fixed order with no header and no escaping. When
//! reading, key and numeric fields are trimmed, text fields are kept as
//! written, and missing trailing fields read as empty.

use std::fmt;

use crate::domain::{
    Course, Enrollment, PersonName, RecordKey, Student, ValidationError,
    validate::parse_whole_number,
};

/// A record that can be stored as one line of a collection file.
pub trait Record: Sized {
    /// Human-readable name of the record type, used in log and error
    /// messages.
    const KIND: &'static str;

    /// The number of columns in a line.
    const COLUMNS: usize;

    /// The record's unique key.
    fn key(&self) -> &RecordKey;

    /// Encodes the record as a line, without the trailing newline.
    fn to_line(&self) -> String;

    /// Decodes a record from its columns.
    ///
    /// `fields` always holds exactly [`Record::COLUMNS`] entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or a numeric column is malformed.
    fn from_fields(fields: &[&str]) -> Result<Self, ValidationError>;

    /// Decodes a record from a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or a numeric column is malformed.
    fn from_line(line: &str) -> Result<Self, ValidationError> {
        Self::from_fields(&columns(line, Self::COLUMNS))
    }
}

/// Splits a line into exactly `count` columns.
///
/// Extra columns are ignored and missing ones read as empty.
pub fn columns(line: &str, count: usize) -> Vec<&str> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields: Vec<&str> = line.split(',').take(count).collect();
    fields.resize(count, "");
    fields
}

/// Returns the trimmed first column of a line.
pub fn key_column(line: &str) -> &str {
    line.split(',').next().unwrap_or_default().trim()
}

struct Line<'a>(&'a [&'a dyn fmt::Display]);

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

impl Record for Student {
    const KIND: &'static str = "student";
    const COLUMNS: usize = 6;

    fn key(&self) -> &RecordKey {
        &self.id
    }

    fn to_line(&self) -> String {
        Line(&[
            &self.id,
            &self.name,
            &self.email,
            &self.age,
            &self.program,
            &self.password,
        ])
        .to_string()
    }

    fn from_fields(fields: &[&str]) -> Result<Self, ValidationError> {
        Ok(Self {
            id: RecordKey::new("Student ID", fields[0].trim())?,
            name: PersonName::new(fields[1])?,
            email: fields[2].to_string(),
            age: parse_whole_number("Age", fields[3].trim())?,
            program: fields[4].to_string(),
            password: fields[5].to_string(),
        })
    }
}

impl Record for Course {
    const KIND: &'static str = "course";
    const COLUMNS: usize = 3;

    fn key(&self) -> &RecordKey {
        &self.code
    }

    fn to_line(&self) -> String {
        Line(&[&self.code, &self.name, &self.units]).to_string()
    }

    fn from_fields(fields: &[&str]) -> Result<Self, ValidationError> {
        Ok(Self {
            code: RecordKey::new("Course code", fields[0].trim())?,
            name: fields[1].to_string(),
            units: parse_whole_number("Units", fields[2].trim())?,
        })
    }
}

impl Record for Enrollment {
    const KIND: &'static str = "enrollment";
    const COLUMNS: usize = 2;

    fn key(&self) -> &RecordKey {
        &self.student_id
    }

    fn to_line(&self) -> String {
        Line(&[&self.student_id, &self.course_code]).to_string()
    }

    fn from_fields(fields: &[&str]) -> Result<Self, ValidationError> {
        Ok(Self {
            student_id: RecordKey::new("Student ID", fields[0].trim())?,
            course_code: RecordKey::new("Course code", fields[1].trim())?,
        })
    }
}
