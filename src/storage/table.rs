use std::marker::PhantomData;

use crate::{
    domain::validate::equals_ignore_case,
    storage::{
        line_file::{Edit, LineFile, StorageError},
        record::{Record, key_column},
    },
};

/// One collection file, read and written as records of type `T`.
///
/// There is no in-memory copy: every call goes back to the file.
#[derive(Debug)]
pub(crate) struct Table<T> {
    file: LineFile,
    record: PhantomData<fn() -> T>,
}

impl<T: Record> Table<T> {
    pub(crate) const fn new(file: LineFile) -> Self {
        Self {
            file,
            record: PhantomData,
        }
    }

    pub(crate) const fn file(&self) -> &LineFile {
        &self.file
    }

    /// All well-formed records, in file order.
    pub(crate) fn all(&self) -> Result<Vec<T>, StorageError> {
        let records = self
            .file
            .lines()?
            .iter()
            .filter_map(|line| match T::from_line(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed {} line in {}: {e}",
                        T::KIND,
                        self.file.path().display()
                    );
                    None
                }
            })
            .collect();
        Ok(records)
    }

    /// Whether any line carries `key` in its first column.
    ///
    /// Malformed lines count, so a damaged record still reserves its key.
    pub(crate) fn contains_key(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.stored_key(key)?.is_some())
    }

    /// The first column of the first line keyed like `key`, as stored.
    pub(crate) fn stored_key(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = key.trim();
        Ok(self
            .file
            .lines()?
            .iter()
            .map(|line| key_column(line))
            .find(|stored| equals_ignore_case(stored, key))
            .map(str::to_string))
    }

    pub(crate) fn find(&self, key: &str) -> Result<Option<T>, StorageError> {
        Ok(self.all()?.into_iter().find(|record| record.key().matches(key)))
    }

    pub(crate) fn insert(&self, record: &T) -> Result<(), StorageError> {
        self.file.append(&record.to_line())
    }

    /// Replaces the first line keyed like `record`.
    pub(crate) fn replace(&self, record: &T) -> Result<usize, StorageError> {
        let mut replaced = false;
        self.file.rewrite(|line| {
            if !replaced && record.key().matches(key_column(line)) {
                replaced = true;
                Edit::Replace(record.to_line())
            } else {
                Edit::Keep
            }
        })
    }

    /// Removes every line for which `predicate` holds.
    pub(crate) fn remove_where<P>(&self, mut predicate: P) -> Result<usize, StorageError>
    where
        P: FnMut(&str) -> bool,
    {
        self.file.rewrite(|line| {
            if predicate(line) {
                Edit::Remove
            } else {
                Edit::Keep
            }
        })
    }
}
