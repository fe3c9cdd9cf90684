//! Student and Course Records
//!
//! Students, courses and enrollments are stored as comma-delimited text
//! files, and managed through an interactive admin or student session.

pub mod domain;
pub use domain::{Config, Course, DisplayMode, Enrollment, Student};

pub mod storage;
pub use storage::{AuditLog, RecordError, RecordStore, StorageError};

pub mod session;
pub use session::{Console, Session, SessionError};
