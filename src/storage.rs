//! Flat-file storage for the three record collections.
//!
//! Each collection is a comma-delimited text file with one record per line.
//! The [`RecordStore`] is the only component that reads or writes them.

mod audit;
pub use audit::AuditLog;

mod line_file;
pub use line_file::{Edit, LineFile, StorageError};

/// Line encoding of records.
pub mod record;
pub use record::Record;

mod store;
pub use store::{RecordError, RecordStore};

mod table;
