//! Rendering of student and course listings.

use std::io::{self, Write};

use crate::domain::{Course, DisplayMode, Student};

/// Writes all students in the given mode. Passwords are never shown.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn render_students(
    mode: DisplayMode,
    students: &[Student],
    out: &mut impl Write,
) -> io::Result<()> {
    match mode {
        DisplayMode::Table => {
            writeln!(out)?;
            writeln!(
                out,
                "{:<12}{:<22}{:<28}{:<6}{:<16}",
                "ID", "Name", "Email", "Age", "Program"
            )?;
            writeln!(out, "{}", "-".repeat(84))?;
            for s in students {
                writeln!(
                    out,
                    "{:<12}{:<22}{:<28}{:<6}{:<16}",
                    s.id.as_str(),
                    s.name.as_str(),
                    s.email,
                    s.age,
                    s.program
                )?;
            }
        }
        DisplayMode::Summary => {
            writeln!(out, "\nStudent IDs and Names:")?;
            for s in students {
                writeln!(out, "{} - {}", s.id, s.name)?;
            }
        }
    }
    Ok(())
}

/// Writes all courses in the given mode.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn render_courses(mode: DisplayMode, courses: &[Course], out: &mut impl Write) -> io::Result<()> {
    match mode {
        DisplayMode::Table => {
            writeln!(out)?;
            writeln!(out, "{:<12}{:<32}{:<8}", "Code", "Name", "Units")?;
            writeln!(out, "{}", "-".repeat(52))?;
            for c in courses {
                writeln!(out, "{:<12}{:<32}{:<8}", c.code.as_str(), c.name, c.units)?;
            }
        }
        DisplayMode::Summary => {
            writeln!(out, "\nCourse Codes and Names:")?;
            for c in courses {
                writeln!(out, "{} - {}", c.code, c.name)?;
            }
        }
    }
    Ok(())
}

/// A course as one line: `CODE - Name (N units)`.
pub(crate) fn course_line(course: &Course) -> String {
    format!("{} - {} ({} units)", course.code, course.name, course.units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CourseDraft, StudentDraft};

    fn students() -> Vec<Student> {
        vec![
            StudentDraft {
                id: "S1".to_string(),
                name: "Ann Lee".to_string(),
                email: "a@x.com".to_string(),
                age: "20".to_string(),
                program: "CS".to_string(),
                password: "hunter2".to_string(),
            }
            .try_into()
            .unwrap(),
        ]
    }

    fn render(mode: DisplayMode) -> String {
        let mut out = Vec::new();
        render_students(mode, &students(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn table_columns_line_up() {
        let output = render(DisplayMode::Table);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "");
        assert!(lines[1].starts_with("ID          Name                  Email"));
        assert_eq!(lines[2], "-".repeat(84));
        assert!(lines[3].starts_with("S1          Ann Lee               a@x.com"));
        assert!(!output.contains("hunter2"));
    }

    #[test]
    fn summary_lists_keys_and_names() {
        assert_eq!(
            render(DisplayMode::Summary),
            "\nStudent IDs and Names:\nS1 - Ann Lee\n"
        );
    }

    #[test]
    fn course_listing() {
        let course: Course = CourseDraft {
            code: "CS101".to_string(),
            name: "Intro".to_string(),
            units: "3".to_string(),
        }
        .try_into()
        .unwrap();

        let mut out = Vec::new();
        render_courses(DisplayMode::Summary, &[course.clone()], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\nCourse Codes and Names:\nCS101 - Intro\n"
        );
        assert_eq!(course_line(&course), "CS101 - Intro (3 units)");
    }
}
