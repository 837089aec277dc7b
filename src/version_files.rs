//! Version markers kept in sync with the released version
//!
//! Each configured `path:variable` entry names a file and an assignment
//! inside it (`variable = "1.2.3"`, `variable: '1.2.3'`, ...). Only the quoted
//! value is rewritten; the rest of the file is left untouched.

use crate::domain::SemanticVersion;
use crate::error::{Result, SemrelError};
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};

/// One `path:variable` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionVariable {
    pub path: PathBuf,
    pub variable: String,
}

impl VersionVariable {
    pub fn parse(entry: &str) -> Result<Self> {
        match entry.split_once(':') {
            Some((path, variable)) if !path.trim().is_empty() && !variable.trim().is_empty() => {
                Ok(VersionVariable {
                    path: PathBuf::from(path.trim()),
                    variable: variable.trim().to_string(),
                })
            }
            _ => Err(SemrelError::config(format!(
                "version_variables entry '{}' must look like 'path:variable'",
                entry
            ))),
        }
    }

    fn assignment(&self) -> Result<Regex> {
        let pattern = format!(
            r#"(?m)^(?P<prefix>[ \t]*{}[ \t]*[:=][ \t]*)(?P<quote>["'])(?P<value>[^"'\r\n]*)["']"#,
            regex::escape(&self.variable)
        );
        Regex::new(&pattern).map_err(|e| SemrelError::pattern(pattern.clone(), e.to_string()))
    }

    /// Rewrite every assignment of the variable in `text`
    ///
    /// Returns `None` when the variable does not occur.
    pub fn apply(&self, text: &str, version: &SemanticVersion) -> Result<Option<String>> {
        let assignment = self.assignment()?;
        if !assignment.is_match(text) {
            return Ok(None);
        }

        let replaced = assignment.replace_all(text, |caps: &Captures| {
            format!("{}{}{}{}", &caps["prefix"], &caps["quote"], version, &caps["quote"])
        });
        Ok(Some(replaced.into_owned()))
    }
}

/// Write `version` into every configured file under `root`
///
/// Every entry is read and rewritten in memory first; files are only written
/// once all entries succeeded. Returns the paths (relative to `root`) whose
/// contents changed.
pub fn patch_version_files(
    root: &Path,
    entries: &[String],
    version: &SemanticVersion,
) -> Result<Vec<PathBuf>> {
    // (relative path, original text, pending text)
    let mut pending: Vec<(PathBuf, String, String)> = Vec::new();

    for entry in entries {
        let variable = VersionVariable::parse(entry)?;
        let index = match pending.iter().position(|(path, _, _)| path == &variable.path) {
            Some(index) => index,
            None => {
                let original = fs::read_to_string(root.join(&variable.path))?;
                pending.push((variable.path.clone(), original.clone(), original));
                pending.len() - 1
            }
        };

        match variable.apply(&pending[index].2, version)? {
            Some(updated) => pending[index].2 = updated,
            None => {
                log::warn!(
                    "No '{}' assignment found in {}",
                    variable.variable,
                    variable.path.display()
                );
            }
        }
    }

    let mut changed = Vec::new();
    for (path, original, updated) in pending {
        if updated == original {
            log::debug!("{} already at {}", path.display(), version);
            continue;
        }
        fs::write(root.join(&path), updated)?;
        log::info!("Set version {} in {}", version, path.display());
        changed.push(path);
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn version() -> SemanticVersion {
        SemanticVersion::new(1, 3, 0)
    }

    #[test]
    fn test_parse_entry() {
        let variable = VersionVariable::parse("pkg/__init__.py:__version__").unwrap();
        assert_eq!(variable.path, PathBuf::from("pkg/__init__.py"));
        assert_eq!(variable.variable, "__version__");

        assert!(VersionVariable::parse("setup.py").is_err());
        assert!(VersionVariable::parse(":version").is_err());
    }

    #[test]
    fn test_apply_keeps_quotes_and_surroundings() {
        let variable = VersionVariable::parse("x:__version__").unwrap();
        let text = "import os\n__version__ = '1.2.0'\nother = \"1.2.0\"\n";
        let updated = variable.apply(text, &version()).unwrap().unwrap();
        assert_eq!(updated, "import os\n__version__ = '1.3.0'\nother = \"1.2.0\"\n");
    }

    #[test]
    fn test_apply_colon_assignment() {
        let variable = VersionVariable::parse("x:version").unwrap();
        let updated = variable.apply("  version: \"0.9.1\"\n", &version()).unwrap().unwrap();
        assert_eq!(updated, "  version: \"1.3.0\"\n");
    }

    #[test]
    fn test_apply_does_not_match_longer_names() {
        let variable = VersionVariable::parse("x:version").unwrap();
        assert_eq!(variable.apply("min_version = \"1.0.0\"\n", &version()).unwrap(), None);
    }

    #[test]
    fn test_patch_version_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("setup.py"), "version = \"1.2.0\"\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "nothing here\n").unwrap();

        let entries = vec!["setup.py:version".to_string(), "notes.txt:version".to_string()];
        let changed = patch_version_files(dir.path(), &entries, &version()).unwrap();

        assert_eq!(changed, vec![PathBuf::from("setup.py")]);
        assert_eq!(
            fs::read_to_string(dir.path().join("setup.py")).unwrap(),
            "version = \"1.3.0\"\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
            "nothing here\n"
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let entries = vec!["absent.py:version".to_string()];
        let result = patch_version_files(dir.path(), &entries, &version());
        assert!(matches!(result, Err(SemrelError::Io(_))));
    }

    #[test]
    fn test_failure_leaves_earlier_files_untouched() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "version = \"1.1.0\"\n").unwrap();

        let entries = vec!["a.py:version".to_string(), "missing.py:version".to_string()];
        let result = patch_version_files(dir.path(), &entries, &version());

        assert!(matches!(result, Err(SemrelError::Io(_))));
        assert_eq!(
            fs::read_to_string(dir.path().join("a.py")).unwrap(),
            "version = \"1.1.0\"\n"
        );
    }

    #[test]
    fn test_several_variables_in_one_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("pkg.py"),
            "__version__ = \"1.2.0\"\nVERSION = '1.2.0'\n",
        )
        .unwrap();

        let entries = vec!["pkg.py:__version__".to_string(), "pkg.py:VERSION".to_string()];
        let changed = patch_version_files(dir.path(), &entries, &version()).unwrap();

        assert_eq!(changed, vec![PathBuf::from("pkg.py")]);
        assert_eq!(
            fs::read_to_string(dir.path().join("pkg.py")).unwrap(),
            "__version__ = \"1.3.0\"\nVERSION = '1.3.0'\n"
        );
    }
}
