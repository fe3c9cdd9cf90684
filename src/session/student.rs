use std::io::{BufRead, Write};

use crate::{
    domain::{
        RecordKey, StudentUpdate,
        validate::{is_letters_only, parse_whole_number},
    },
    session::{Flow, Session, SessionError, StudentOption, display},
};

impl<R: BufRead, W: Write> Session<'_, R, W> {
    pub(super) fn handle_student(
        &mut self,
        id: &RecordKey,
        option: StudentOption,
    ) -> Result<Flow, SessionError> {
        tracing::debug!("Student {id} selected {option:?}");
        match option {
            StudentOption::ViewProfile => self.view_profile(id)?,
            StudentOption::Enroll => self.enroll(id)?,
            StudentOption::ViewEnrolledCourses => self.view_enrolled(id)?,
            StudentOption::EditProfile => self.edit_profile(id)?,
            StudentOption::DropCourse => self.drop_course(id)?,
            StudentOption::ChangeDisplayMode => {
                self.choose_display()?;
            }
            StudentOption::Logout => {
                tracing::info!("Student {id} logged out");
                self.store
                    .log_event(format_args!("Student {id} logged out"));
                return Ok(Flow::Logout);
            }
        }
        Ok(Flow::Continue)
    }

    fn view_profile(&mut self, id: &RecordKey) -> Result<(), SessionError> {
        let Some(student) = self.store.find_student(id)? else {
            return self.console.warn("Student not found.");
        };
        self.console.say(format_args!(
            "\nID: {}\nName: {}\nEmail: {}\nAge: {}\nProgram: {}",
            student.id, student.name, student.email, student.age, student.program
        ))
    }

    fn enroll(&mut self, id: &RecordKey) -> Result<(), SessionError> {
        let courses = self.store.courses()?;
        if courses.is_empty() {
            return self.console.say("No courses available.");
        }
        let enrolled = self.store.courses_for_student(id)?;
        if courses
            .iter()
            .all(|course| enrolled.iter().any(|taken| taken.code == course.code))
        {
            return self
                .console
                .say("You are already enrolled in all available courses.");
        }

        self.console.say("Available courses:")?;
        for course in &courses {
            self.console.say(display::course_line(course))?;
        }

        let code = loop {
            let code = self.prompt_existing_course("Enter Course Code to enroll: ")?;
            if !self.store.is_enrolled(id, &code)? {
                break code;
            }
            self.console
                .warn("You are already enrolled in this course. Please choose another course.")?;
        };

        let enrolled = self.store.enroll(id, &code);
        if self.settle(enrolled)?.is_some() {
            self.console.success("Enrolled in course.")?;
        }
        Ok(())
    }

    fn view_enrolled(&mut self, id: &RecordKey) -> Result<(), SessionError> {
        let courses = self.store.courses_for_student(id)?;
        self.console.say("Enrolled courses:")?;
        if courses.is_empty() {
            return self.console.say("None.");
        }
        for course in &courses {
            self.console.say(display::course_line(course))?;
        }
        Ok(())
    }

    fn edit_profile(&mut self, id: &RecordKey) -> Result<(), SessionError> {
        let Some(current) = self.store.find_student(id)? else {
            return self.console.warn("Student not found.");
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
                |s| parse_whole_number("Age", s).is_ok(),
                "Age should be a whole number.",
            )?,
            program: None,
        };

        let updated = self.store.update_profile(id, &update);
        if self.settle(updated)?.is_some() {
            self.console.success("Profile updated.")?;
        }
        Ok(())
    }

    fn drop_course(&mut self, id: &RecordKey) -> Result<(), SessionError> {
        if self.store.courses_for_student(id)?.is_empty() {
            return self.console.say("You are not enrolled in any courses.");
        }

        let code = loop {
            let code = self.prompt_existing_course("Enter Course Code to drop: ")?;
            if self.store.is_enrolled(id, &code)? {
                break code;
            }
            self.console.warn("Not enrolled in this course.")?;
        };

        let dropped = self.store.drop_enrollment(id, &code);
        if self.settle(dropped)?.is_some() {
            self.console.success("Dropped course.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::CourseDraft,
        session::tests::{run_session, seed, store},
    };

    const LOGIN: &str = "s1\npw1\n";

    #[test]
    fn profile_hides_password() {
        let (_tmp, mut store) = store();
        seed(&mut store);
        let (output, result) = run_session(&mut store, &format!("{LOGIN}1\n7\n"));
        result.unwrap();
        assert!(output.contains("\nID: S1\nName: Ann Lee\nEmail: a@x.com\nAge: 20\nProgram: CS\n"));
        assert!(!output.contains("pw1"));
    }

    #[test]
    fn enroll_then_list() {
        let (_tmp, mut store) = store();
        seed(&mut store);
        let (output, result) = run_session(&mut store, &format!("{LOGIN}3\n2\nMA9\ncs101\n3\n7\n"));
        result.unwrap();

        assert!(output.contains("Enrolled courses:\nNone."));
        assert!(output.contains("Available courses:\nCS101 - Intro (3 units)"));
        assert!(output.contains("Course not found (not case sensitive). Please try again."));
        assert!(output.contains("Enrolled in course."));
        assert!(output.contains("Enrolled courses:\nCS101 - Intro (3 units)"));
        assert!(store.is_enrolled("S1", "CS101").unwrap());
    }

    #[test]
    fn enrolling_twice_reprompts() {
        let (_tmp, mut store) = store();
        seed(&mut store);
        store
            .create_course(CourseDraft {
                code: "MA1".to_string(),
                name: "Calculus".to_string(),
                units: "4".to_string(),
            })
            .unwrap();
        store.enroll("S1", "CS101").unwrap();

        let (output, result) = run_session(&mut store, &format!("{LOGIN}2\nCS101\nma1\n7\n"));
        result.unwrap();
        assert!(output.contains(
            "You are already enrolled in this course. Please choose another course."
        ));
        assert!(output.contains("Enrolled in course."));
        assert!(store.is_enrolled("S1", "MA1").unwrap());
    }

    #[test]
    fn enroll_returns_to_menu_when_nothing_is_left() {
        let (_tmp, mut store) = store();
        seed(&mut store);
        store.enroll("S1", "CS101").unwrap();

        let (output, result) = run_session(&mut store, &format!("{LOGIN}2\n3\n7\n"));
        result.unwrap();
        assert!(output.contains("You are already enrolled in all available courses."));
        assert!(!output.contains("Enter Course Code to enroll: "));
        assert!(output.contains("Enrolled courses:\nCS101 - Intro (3 units)"));
    }

    #[test]
    fn drop_requires_enrollment() {
        let (_tmp, mut store) = store();
        seed(&mut store);
        let (output, result) = run_session(&mut store, &format!("{LOGIN}5\n7\n"));
        result.unwrap();
        assert!(output.contains("You are not enrolled in any courses."));

        store.enroll("S1", "CS101").unwrap();
        let (output, result) = run_session(&mut store, &format!("{LOGIN}5\nCS101\n7\n"));
        result.unwrap();
        assert!(output.contains("Dropped course."));
        assert!(!store.is_enrolled("S1", "CS101").unwrap());
    }

    #[test]
    fn edit_profile_leaves_program_alone() {
        let (_tmp, mut store) = store();
        seed(&mut store);
        let (output, result) = run_session(&mut store, &format!("{LOGIN}4\nAnn Smith\n\n21\n7\n"));
        result.unwrap();

        assert!(output.contains("Profile updated."));
        assert!(!output.contains("Edit Program"));
        let student = store.find_student("S1").unwrap().unwrap();
        assert_eq!(student.name.as_str(), "Ann Smith");
        assert_eq!(student.age, 21);
        assert_eq!(student.program, "CS");
    }
}
