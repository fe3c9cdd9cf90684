//! A line-oriented text file holding one record per line.
//!
//! Rewrites go through a temporary file in the same directory which is then
//! renamed over the original, so readers only ever see the old or the new
//! contents in full.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

/// What to do with a line during [`LineFile::rewrite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Write the line back unchanged.
    Keep,
    /// Write this line in its place.
    Replace(String),
    /// Leave the line out.
    Remove,
}

/// A file of newline-terminated records.
#[derive(Debug, Clone)]
pub struct LineFile {
    path: PathBuf,
}

impl LineFile {
    /// Refers to the file at `path`. Nothing is opened until it is used.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every non-blank line, in file order.
    ///
    /// A file that does not exist yet reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn lines(&self) -> Result<Vec<String>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.error("open", e)),
        };

        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.error("read", e))?;
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
        Ok(lines)
    }

    /// Appends `line` as the last line of the file, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn append(&self, line: &str) -> Result<(), StorageError> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.error("open", e))?;

        let needs_newline = ends_without_newline(&mut file).map_err(|e| self.error("read", e))?;

        let mut contents = String::with_capacity(line.len() + 2);
        if needs_newline {
            contents.push('\n');
        }
        contents.push_str(line);
        contents.push('\n');

        file.write_all(contents.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| self.error("append to", e))
    }

    /// Rebuilds the file, passing every non-blank line through `edit`.
    ///
    /// The new contents are written to a temporary file that is renamed over
    /// the original only once it is complete. If any step fails the original
    /// file is left untouched. Returns the number of lines replaced or
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or if the temporary file
    /// cannot be created, written or renamed into place.
    pub fn rewrite<F>(&self, mut edit: F) -> Result<usize, StorageError>
    where
        F: FnMut(&str) -> Edit,
    {
        let lines = self.lines()?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let tmp = NamedTempFile::new_in(dir)
            .map_err(|e| self.error("create temporary file for", e))?;
        let mut writer = BufWriter::new(tmp);
        let mut changed = 0;

        for line in &lines {
            match edit(line) {
                Edit::Keep => writeln!(writer, "{line}"),
                Edit::Replace(replacement) => {
                    changed += 1;
                    writeln!(writer, "{replacement}")
                }
                Edit::Remove => {
                    changed += 1;
                    Ok(())
                }
            }
            .map_err(|e| self.error("write", e))?;
        }

        let tmp = writer
            .into_inner()
            .map_err(|e| self.error("write", e.into_error()))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| self.error("sync", e))?;
        self.copy_permissions_to(tmp.as_file())?;
        tmp.persist(&self.path)
            .map_err(|e| self.error("replace", e.error))?;

        tracing::debug!("Rewrote {} ({changed} lines changed)", self.path.display());
        Ok(changed)
    }

    /// Gives a replacement file the permissions of the file it replaces.
    fn copy_permissions_to(&self, replacement: &File) -> Result<(), StorageError> {
        match fs::metadata(&self.path) {
            Ok(metadata) => replacement
                .set_permissions(metadata.permissions())
                .map_err(|e| self.error("set permissions for", e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.error("inspect", e)),
        }
    }

    fn error(&self, action: &'static str, source: io::Error) -> StorageError {
        StorageError {
            action,
            path: self.path.clone(),
            source,
        }
    }
}

fn ends_without_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// A collection file could not be read, written or replaced.
#[derive(Debug, thiserror::Error)]
#[error("failed to {action} {}", .path.display())]
pub struct StorageError {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl StorageError {
    /// The file the failed operation was acting on.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Creates the directory holding a records collection.
pub(crate) fn ensure_dir(path: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(path).map_err(|source| StorageError {
        action: "create directory",
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (TempDir, LineFile) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let file = LineFile::new(tmp.path().join("records.txt"));
        (tmp, file)
    }

    #[test]
    fn missing_file_reads_empty() {
        let (_tmp, file) = setup();
        assert!(file.lines().unwrap().is_empty());
    }

    #[test]
    fn appended_lines_keep_insertion_order() {
        let (_tmp, file) = setup();
        for line in ["a,1", "b,2", "c,3"] {
            file.append(line).unwrap();
        }
        assert_eq!(file.lines().unwrap(), vec!["a,1", "b,2", "c,3"]);
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "a,1\nb,2\nc,3\n");
    }

    #[test]
    fn append_repairs_missing_trailing_newline() {
        let (_tmp, file) = setup();
        fs::write(file.path(), "a,1").unwrap();
        file.append("b,2").unwrap();
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "a,1\nb,2\n");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let (_tmp, file) = setup();
        fs::write(file.path(), "a,1\n\n   \nb,2\n").unwrap();
        assert_eq!(file.lines().unwrap(), vec!["a,1", "b,2"]);
    }

    #[test]
    fn rewrite_replaces_and_removes() {
        let (_tmp, file) = setup();
        fs::write(file.path(), "a,1\nb,2\nc,3\n").unwrap();

        let changed = file
            .rewrite(|line| match line {
                "a,1" => Edit::Replace("a,10".to_string()),
                "b,2" => Edit::Remove,
                _ => Edit::Keep,
            })
            .unwrap();

        assert_eq!(changed, 2);
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "a,10\nc,3\n");
    }

    #[test]
    fn rewrite_leaves_no_temporary_files() {
        let (tmp, file) = setup();
        file.append("a,1").unwrap();
        file.rewrite(|_| Edit::Keep).unwrap();

        let entries: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["records.txt"]);
    }

    #[test]
    fn rewrite_in_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let missing_dir = tmp.path().join("gone");
        let file = LineFile::new(missing_dir.join("records.txt"));

        let err = file.rewrite(|_| Edit::Remove).unwrap_err();
        assert_eq!(err.path(), file.path());
        assert!(!missing_dir.exists());
    }

    #[test]
    fn failed_rewrite_leaves_original_untouched() {
        let (tmp, file) = setup();
        let original = b"a,1\nb,\xff\xfe\nc,3\n";
        fs::write(file.path(), original).unwrap();

        let err = file.rewrite(|_| Edit::Remove).unwrap_err();
        assert_eq!(err.path(), file.path());
        assert_eq!(fs::read(file.path()).unwrap(), original);

        let entries: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["records.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (_tmp, file) = setup();
        fs::write(file.path(), "a,1\nb,2\n").unwrap();
        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o644)).unwrap();

        file.rewrite(|line| if line == "a,1" { Edit::Remove } else { Edit::Keep })
            .unwrap();

        let mode = fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "b,2\n");
    }
}
