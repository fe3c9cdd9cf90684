use std::io::{BufRead, Write};

use crate::{
    domain::{
        CourseDraft, CourseUpdate, StudentDraft, StudentUpdate,
        validate::{is_letters_only, parse_whole_number},
    },
    session::{AdminOption, Flow, Session, SessionError, display},
    storage::RecordStore,
};

fn is_count(s: &str) -> bool {
    parse_whole_number("Number", s).is_ok()
}

impl<R: BufRead, W: Write> Session<'_, R, W> {
    pub(super) fn handle_admin(&mut self, option: AdminOption) -> Result<Flow, SessionError> {
        tracing::debug!("Admin selected {option:?}");
        match option {
            AdminOption::AddStudent => self.add_student()?,
            AdminOption::AddCourse => self.add_course()?,
            AdminOption::ViewAllStudents => self.view_all_students()?,
            AdminOption::ViewAllCourses => self.view_all_courses()?,
            AdminOption::ViewStudentsPerCourse => self.view_students_per_course()?,
            AdminOption::EditStudent => self.edit_student()?,
            AdminOption::EditCourse => self.edit_course()?,
            AdminOption::DeleteStudent => self.delete_student()?,
            AdminOption::DeleteCourse => self.delete_course()?,
            AdminOption::ChangeDisplayMode => {
                self.choose_display()?;
            }
            AdminOption::Logout => {
                tracing::info!("Admin logged out");
                self.store.log_event("Admin logged out");
                return Ok(Flow::Logout);
            }
        }
        Ok(Flow::Continue)
    }

    fn add_student(&mut self) -> Result<(), SessionError> {
        let id = self.prompt_new_key(
            "Enter Student ID: ",
            "Student ID",
            RecordStore::student_exists,
            "Student ID already exists.",
        )?;
        let name = self.prompt_until("Enter Name: ", is_letters_only, "Name should be letters only.")?;
        let email = self.console.prompt("Enter Email: ")?;
        let age = self.prompt_until("Enter Age: ", is_count, "Age should be a whole number.")?;
        let program = self.console.prompt("Enter Program: ")?;
        let password = self.console.prompt("Enter Password: ")?;

        let draft = StudentDraft {
            id,
            name,
            email,
            age,
            program,
            password,
        };
        let created = self.store.create_student(draft);
        if self.settle(created)?.is_some() {
            self.console.success("Student added.")?;
        }
        Ok(())
    }

    fn add_course(&mut self) -> Result<(), SessionError> {
        let code = self.prompt_new_key(
            "Enter Course Code: ",
            "Course code",
            RecordStore::course_exists,
            "Course code already exists (case-insensitive).",
        )?;
        let name = self.console.prompt("Enter Course Name: ")?;
        let units = self.prompt_until("Enter Units: ", is_count, "Units should be a whole number.")?;

        let created = self.store.create_course(CourseDraft { code, name, units });
        if self.settle(created)?.is_some() {
            self.console.success("Course added.")?;
        }
        Ok(())
    }

    fn view_all_students(&mut self) -> Result<(), SessionError> {
        let mode = self.display_mode()?;
        let students = self.store.students()?;
        display::render_students(mode, &students, self.console.output())?;
        Ok(())
    }

    fn view_all_courses(&mut self) -> Result<(), SessionError> {
        let mode = self.display_mode()?;
        let courses = self.store.courses()?;
        display::render_courses(mode, &courses, self.console.output())?;
        Ok(())
    }

    fn view_students_per_course(&mut self) -> Result<(), SessionError> {
        if self.store.courses()?.is_empty() {
            return self.console.say("No courses found.");
        }
        let code = self.prompt_existing_course("Enter Course Code: ")?;
        let Some(course) = self.store.find_course(&code)? else {
            return self.console.warn("Course record is unreadable.");
        };

        let students = self.store.students_in_course(&code)?;
        self.console
            .say(format_args!("Students enrolled in {}:", course.code))?;
        if students.is_empty() {
            return self.console.say("No students enrolled in this course.");
        }
        for student in &students {
            self.console
                .say(format_args!("{} - {}", student.id, student.name))?;
        }
        Ok(())
    }

    fn prompt_existing_student(&mut self, label: &str) -> Result<String, SessionError> {
        loop {
            let id = self.console.prompt(label)?;
            if self.store.student_exists(&id)? {
                return Ok(id);
            }
            self.console
                .warn("Student not found (not case sensitive). Please try again.")?;
        }
    }

    fn edit_student(&mut self) -> Result<(), SessionError> {
        if self.store.students()?.is_empty() {
            return self.console.say("No students found.");
        }
        let id = self.prompt_existing_student("Enter Student ID to edit: ")?;
        let Some(current) = self.store.find_student(&id)? else {
            return self.console.warn("Student record is unreadable.");
        };

        let update = StudentUpdate {
            name: self.prompt_edit(
                "Name",
                current.name.as_str(),
                is_letters_only,
                "Name should be letters only.",
            )?,
            email: self.prompt_edit("Email", &current.email, |_| true, "")?,
            age: self.prompt_edit(
                "Age",
                &current.age.to_string(),
                is_count,
                "Age should be a whole number.",
            )?,
            program: self.prompt_edit("Program", &current.program, |_| true, "")?,
        };

        let updated = self.store.update_student(&id, &update);
        if self.settle(updated)?.is_some() {
            self.console.success("Student updated.")?;
        }
        Ok(())
    }

    fn edit_course(&mut self) -> Result<(), SessionError> {
        if self.store.courses()?.is_empty() {
            return self.console.say("No courses found.");
        }
        let code = self.prompt_existing_course("Enter Course Code to edit: ")?;
        let Some(current) = self.store.find_course(&code)? else {
            return self.console.warn("Course record is unreadable.");
        };

        let update = CourseUpdate {
            name: self.prompt_edit("Name", &current.name, |_| true, "")?,
            units: self.prompt_edit(
                "Units",
                &current.units.to_string(),
                is_count,
                "Units should be a whole number.",
            )?,
        };

        let updated = self.store.update_course(&code, &update);
        if self.settle(updated)?.is_some() {
            self.console.success("Course updated.")?;
        }
        Ok(())
    }

    fn delete_student(&mut self) -> Result<(), SessionError> {
        if self.store.students()?.is_empty() {
            return self.console.say("No students found.");
        }
        let id = self.prompt_existing_student("Enter Student ID to delete: ")?;
        let deleted = self.store.delete_student(&id);
        if self.settle(deleted)?.is_some() {
            self.console.success("Student deleted.")?;
        }
        Ok(())
    }

    fn delete_course(&mut self) -> Result<(), SessionError> {
        if self.store.courses()?.is_empty() {
            return self.console.say("No courses found.");
        }
        let code = self.prompt_existing_course("Enter Course Code to delete: ")?;
        let deleted = self.store.delete_course(&code);
        if self.settle(deleted)?.is_some() {
            self.console.success("Course deleted.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::session::tests::{run_session, seed, store};

    const LOGIN: &str = "admin\nadmin123\n";

    #[test]
    fn add_student_reprompts_until_valid() {
        let (_tmp, mut store) = store();
        seed(&mut store);
        let input = format!(
            "{LOGIN}1\nS 2\nS-2\ns1\nS2\nBo 2\nBo Chen\nb@x.com\ntwenty\n22\nEE\npw2\n11\n"
        );
        let (output, result) = run_session(&mut store, &input);
        result.unwrap();

        assert!(output.contains("Student ID must not contain spaces."));
        assert!(output.contains("Student ID must be strictly alphanumeric."));
        assert!(output.contains("Student ID already exists."));
        assert!(output.contains("Name should be letters only."));
        assert!(output.contains("Age should be a whole number."));
        assert!(output.contains("Student added."));

        let added = store.find_student("S2").unwrap().unwrap();
        assert_eq!(added.name.as_str(), "Bo Chen");
        assert_eq!(added.age, 22);
    }

    #[test]
    fn add_course_rejects_duplicate_code_in_any_case() {
        let (_tmp, mut store) = store();
        seed(&mut store);
        let input = format!("{LOGIN}2\ncs101\nMA201\nLinear Algebra\n4\n11\n");
        let (output, result) = run_session(&mut store, &input);
        result.unwrap();

        assert!(output.contains("Course code already exists (case-insensitive)."));
        assert!(output.contains("Course added."));
        assert_eq!(store.courses().unwrap().len(), 2);
    }

    #[test]
    fn edit_student_keeps_fields_left_blank() {
        let (_tmp, mut store) = store();
        seed(&mut store);
        let input = format!("{LOGIN}6\nS9\ns1\n\nnew@x.com\nold\n21\n\n11\n");
        let (output, result) = run_session(&mut store, &input);
        result.unwrap();

        assert!(output.contains("Student not found (not case sensitive). Please try again."));
        assert!(output.contains("Edit Name (Ann Lee): "));
        assert!(output.contains("Student updated."));

        let student = store.find_student("S1").unwrap().unwrap();
        assert_eq!(student.name.as_str(), "Ann Lee");
        assert_eq!(student.email, "new@x.com");
        assert_eq!(student.age, 21);
        assert_eq!(student.program, "CS");
    }

    #[test]
    fn edit_course_units() {
        let (_tmp, mut store) = store();
        seed(&mut store);
        let input = format!("{LOGIN}7\nCS101\nIntroduction\n4\n11\n");
        let (output, result) = run_session(&mut store, &input);
        result.unwrap();

        assert!(output.contains("Course updated."));
        let course = store.find_course("cs101").unwrap().unwrap();
        assert_eq!(course.name, "Introduction");
        assert_eq!(course.units, 4);
    }

    #[test]
    fn delete_course_drops_enrollments() {
        let (_tmp, mut store) = store();
        seed(&mut store);
        store.enroll("S1", "CS101").unwrap();

        let input = format!("{LOGIN}9\ncs101\n11\n");
        let (output, result) = run_session(&mut store, &input);
        result.unwrap();

        assert!(output.contains("Course deleted."));
        assert!(!store.course_exists("CS101").unwrap());
        assert!(store.courses_for_student("S1").unwrap().is_empty());
    }

    #[test]
    fn students_per_course() {
        let (_tmp, mut store) = store();
        seed(&mut store);

        let input = format!("{LOGIN}5\nCS101\n11\n");
        let (output, _) = run_session(&mut store, &input);
        assert!(output.contains("No students enrolled in this course."));

        store.enroll("S1", "CS101").unwrap();
        let input = format!("{LOGIN}5\ncs101\n11\n");
        let (output, _) = run_session(&mut store, &input);
        assert!(output.contains("Students enrolled in CS101:\nS1 - Ann Lee\n"));
    }

    #[test]
    fn delete_with_nothing_to_delete() {
        let (_tmp, mut store) = store();
        let input = format!("{LOGIN}8\n11\n");
        let (output, result) = run_session(&mut store, &input);
        result.unwrap();
        assert!(output.contains("No students found."));
    }
}
