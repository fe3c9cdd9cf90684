use std::path::{Path, PathBuf};

use serde::Deserialize;

/// How record listings are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Aligned columns with a header row.
    Table,
    /// One `KEY - Name` line per record.
    Summary,
}

/// Configuration for a records directory.
///
/// Collection and log file names are resolved relative to the records root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Versions")]
pub struct Config {
    students_file: PathBuf,
    courses_file: PathBuf,
    enrollments_file: PathBuf,
    audit_log: PathBuf,
    admin_username: String,
    admin_password: String,

    /// Display mode to start sessions with.
    ///
    /// When unset, the user is asked the first time a listing is shown.
    pub display: Option<DisplayMode>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            students_file: default_students_file(),
            courses_file: default_courses_file(),
            enrollments_file: default_enrollments_file(),
            audit_log: default_audit_log(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
            display: None,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads `config.toml` from the records root, falling back to defaults.
    #[must_use]
    pub fn load_or_default(root: &Path) -> Self {
        let path = root.join("config.toml");
        Self::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Self::default()
        })
    }

    /// The students collection file name.
    #[must_use]
    pub fn students_file(&self) -> &Path {
        &self.students_file
    }

    /// The courses collection file name.
    #[must_use]
    pub fn courses_file(&self) -> &Path {
        &self.courses_file
    }

    /// The enrollments collection file name.
    #[must_use]
    pub fn enrollments_file(&self) -> &Path {
        &self.enrollments_file
    }

    /// The audit log file name.
    #[must_use]
    pub fn audit_log(&self) -> &Path {
        &self.audit_log
    }

    /// Checks a login attempt against the administrator credentials.
    ///
    /// Both username and password must match exactly.
    #[must_use]
    pub fn is_admin(&self, username: &str, password: &str) -> bool {
        username == self.admin_username && password == self.admin_password
    }
}

fn default_students_file() -> PathBuf {
    PathBuf::from("students.txt")
}

fn default_courses_file() -> PathBuf {
    PathBuf::from("courses.txt")
}

fn default_enrollments_file() -> PathBuf {
    PathBuf::from("enrollments.txt")
}

fn default_audit_log() -> PathBuf {
    PathBuf::from("log.txt")
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_students_file")]
        students_file: PathBuf,

        #[serde(default = "default_courses_file")]
        courses_file: PathBuf,

        #[serde(default = "default_enrollments_file")]
        enrollments_file: PathBuf,

        #[serde(default = "default_audit_log")]
        audit_log: PathBuf,

        #[serde(default = "default_admin_username")]
        admin_username: String,

        #[serde(default = "default_admin_password")]
        admin_password: String,

        #[serde(default)]
        display: Option<DisplayMode>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                students_file,
                courses_file,
                enrollments_file,
                audit_log,
                admin_username,
                admin_password,
                display,
            } => Self {
                students_file,
                courses_file,
                enrollments_file,
                audit_log,
                admin_username,
                admin_password,
                display,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(tmp.path());
        assert_eq!(config, Config::default());
        assert!(config.is_admin("admin", "admin123"));
        assert_eq!(config.students_file(), Path::new("students.txt"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            "_version = \"1\"\nadmin_password = \"s3cret\"\ndisplay = \"summary\"\n",
        )
        .unwrap();

        let config = Config::load_or_default(tmp.path());
        assert!(config.is_admin("admin", "s3cret"));
        assert!(!config.is_admin("admin", "admin123"));
        assert_eq!(config.display, Some(DisplayMode::Summary));
        assert_eq!(config.courses_file(), Path::new("courses.txt"));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "_version = \"9\"\n").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
