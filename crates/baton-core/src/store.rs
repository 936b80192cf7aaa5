//! Filesystem session store.
//!
//! Descriptors live as `<name>.toml` directly under the store root; logs
//! live under `logs/<name>.log`. All operations are plain synchronous
//! filesystem calls; the only cross-process shared resource is the log
//! file, which is appended under an exclusive lock.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::session::{summary_line, SessionEntry, SessionName, SESSION_EXT};
use crate::{Error, Result};

const LOG_DIR: &str = "logs";

/// Descriptor written by `create`; `{name}` is replaced with the session
/// name.
const SESSION_TEMPLATE: &str = r#"# Session {name}.
#
# Describe the experiment here. The first sentence of this comment block
# shows up in `baton show` listings.

[session]
name = "{name}"

[devices]
# Device bindings the runtime brings up, in declaration order.

[parameters]
# Initial parameter values, applied once the devices are up.
"#;

pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    /// Open (creating if necessary) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(LOG_DIR))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn descriptor_path(&self, name: &SessionName) -> PathBuf {
        self.root.join(name.file_name())
    }

    pub fn log_path(&self, name: &SessionName) -> PathBuf {
        self.root.join(LOG_DIR).join(name.log_file_name())
    }

    pub fn exists(&self, name: &SessionName) -> bool {
        self.descriptor_path(name).is_file()
    }

    /// Create a session from the built-in template.
    pub fn create(&self, name: &SessionName, force: bool) -> Result<PathBuf> {
        let path = self.descriptor_path(name);
        if path.exists() && !force {
            return Err(Error::AlreadyExists(name.to_string()));
        }
        fs::write(&path, SESSION_TEMPLATE.replace("{name}", name.as_str()))?;
        Ok(path)
    }

    /// Write a descriptor with the given content.
    pub fn install(&self, name: &SessionName, content: &str, force: bool) -> Result<PathBuf> {
        let path = self.descriptor_path(name);
        if path.exists() && !force {
            return Err(Error::AlreadyExists(name.to_string()));
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn read(&self, name: &SessionName) -> Result<String> {
        fs::read_to_string(self.descriptor_path(name)).map_err(|err| map_missing(name, err))
    }

    pub fn entry(&self, name: &SessionName) -> Result<SessionEntry> {
        let path = self.descriptor_path(name);
        let content = fs::read_to_string(&path).map_err(|err| map_missing(name, err))?;
        let modified = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Local>::from);
        Ok(SessionEntry {
            name: name.clone(),
            summary: summary_line(&content),
            modified,
        })
    }

    /// All sessions, sorted by name. Files that are not well-formed session
    /// descriptors (wrong extension, invalid stem) are ignored.
    pub fn list(&self) -> Result<Vec<SessionEntry>> {
        let mut entries = Vec::new();
        for dirent in fs::read_dir(&self.root)? {
            let path = dirent?.path();
            if !path.is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(SESSION_EXT)
            {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let Ok(name) = SessionName::parse(stem) else {
                continue;
            };
            entries.push(self.entry(&name)?);
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Rename a session; the log moves with it.
    pub fn rename(&self, source: &SessionName, target: &SessionName) -> Result<()> {
        if !self.exists(source) {
            return Err(Error::NotFound(source.to_string()));
        }
        if self.exists(target) {
            return Err(Error::AlreadyExists(target.to_string()));
        }
        fs::rename(self.descriptor_path(source), self.descriptor_path(target))?;
        let log = self.log_path(source);
        if log.is_file() {
            fs::rename(log, self.log_path(target))?;
        }
        Ok(())
    }

    /// Duplicate a descriptor. The log is not copied; the new session
    /// starts with a clean history.
    pub fn copy(&self, source: &SessionName, target: &SessionName) -> Result<()> {
        if !self.exists(source) {
            return Err(Error::NotFound(source.to_string()));
        }
        if self.exists(target) {
            return Err(Error::AlreadyExists(target.to_string()));
        }
        fs::copy(self.descriptor_path(source), self.descriptor_path(target))?;
        Ok(())
    }

    /// Delete a session's descriptor and log.
    pub fn remove(&self, name: &SessionName) -> Result<()> {
        fs::remove_file(self.descriptor_path(name)).map_err(|err| map_missing(name, err))?;
        let log = self.log_path(name);
        if log.is_file() {
            fs::remove_file(log)?;
        }
        Ok(())
    }

    /// Import an external descriptor file under its stem.
    pub fn import_file(&self, path: &Path, force: bool) -> Result<SessionName> {
        if path.extension().and_then(|ext| ext.to_str()) != Some(SESSION_EXT) {
            return Err(Error::Import {
                path: path.display().to_string(),
                reason: format!("descriptor files use the .{SESSION_EXT} extension"),
            });
        }
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| Error::Import {
                path: path.display().to_string(),
                reason: "file name is not valid UTF-8".to_string(),
            })?;
        let name = SessionName::parse(stem)?;
        let content = fs::read_to_string(path)?;
        self.install(&name, &content, force)?;
        Ok(name)
    }

    /// Archive a session (descriptor plus log, when one exists) as a
    /// gzip-compressed tarball at `dest`.
    pub fn export(&self, name: &SessionName, dest: &Path) -> Result<()> {
        if !self.exists(name) {
            return Err(Error::NotFound(name.to_string()));
        }
        let encoder = GzEncoder::new(File::create(dest)?, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        builder.append_path_with_name(self.descriptor_path(name), name.file_name())?;
        let log = self.log_path(name);
        if log.is_file() {
            builder.append_path_with_name(log, name.log_file_name())?;
        }
        builder
            .into_inner()
            .map_err(|err| Error::Archive(err.to_string()))?
            .finish()?;
        Ok(())
    }

    /// Unpack an archive produced by [`SessionStore::export`] into the
    /// store. Entries that are neither descriptors nor logs are skipped.
    pub fn unpack_archive(&self, archive: &Path, force: bool) -> Result<Vec<SessionName>> {
        let mut tarball = tar::Archive::new(GzDecoder::new(File::open(archive)?));
        let mut imported = Vec::new();
        for entry in tarball.entries().map_err(archive_err)? {
            let mut entry = entry.map_err(archive_err)?;
            let path = entry.path().map_err(archive_err)?.into_owned();
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match path.extension().and_then(|ext| ext.to_str()) {
                Some(SESSION_EXT) => {
                    let name = SessionName::parse(stem)?;
                    let mut content = String::new();
                    entry.read_to_string(&mut content).map_err(archive_err)?;
                    self.install(&name, &content, force)?;
                    imported.push(name);
                }
                Some("log") => {
                    let Ok(name) = SessionName::parse(stem) else {
                        continue;
                    };
                    let mut content = Vec::new();
                    entry.read_to_end(&mut content).map_err(archive_err)?;
                    fs::write(self.log_path(&name), content)?;
                }
                _ => continue,
            }
        }
        if imported.is_empty() {
            return Err(Error::Archive(
                "archive contains no session descriptors".to_string(),
            ));
        }
        Ok(imported)
    }

    /// Append one timestamped line to the session log, under an exclusive
    /// file lock.
    pub fn append_log(&self, name: &SessionName, line: &str) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path(name))?;
        fs2::FileExt::lock_exclusive(&file)?;
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let written = writeln!(&file, "[{stamp}] {line}");
        let _ = fs2::FileExt::unlock(&file);
        written?;
        Ok(())
    }

    /// The session log, or its last `tail` lines when `tail` is non-zero.
    /// A session without a log yet yields an empty string.
    pub fn read_log(&self, name: &SessionName, tail: usize) -> Result<String> {
        if !self.exists(name) {
            return Err(Error::NotFound(name.to_string()));
        }
        let path = self.log_path(name);
        if !path.is_file() {
            return Ok(String::new());
        }
        let content = fs::read_to_string(path)?;
        if tail == 0 {
            return Ok(content);
        }
        let lines: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(tail);
        let mut tailed = lines[start..].join("\n");
        if !tailed.is_empty() {
            tailed.push('\n');
        }
        Ok(tailed)
    }
}

fn map_missing(name: &SessionName, err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::NotFound(name.to_string())
    } else {
        Error::Io(err)
    }
}

fn archive_err(err: std::io::Error) -> Error {
    Error::Archive(err.to_string())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store() -> (SessionStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("sessions")).unwrap();
        (store, dir)
    }

    fn name(raw: &str) -> SessionName {
        SessionName::parse(raw).unwrap()
    }

    #[test]
    fn create_then_list_roundtrips_name_and_summary() {
        let (store, _dir) = store();
        store.create(&name("tomo"), false).unwrap();
        let entries = store.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name.as_str(), "tomo");
        assert_eq!(entries[0].summary, "Session tomo.");
    }

    #[test]
    fn create_refuses_existing_session_unless_forced() {
        let (store, _dir) = store();
        store.create(&name("tomo"), false).unwrap();
        assert!(matches!(
            store.create(&name("tomo"), false),
            Err(Error::AlreadyExists(_))
        ));
        store.create(&name("tomo"), true).unwrap();
    }

    #[test]
    fn list_ignores_stray_files() {
        let (store, _dir) = store();
        store.create(&name("tomo"), false).unwrap();
        fs::write(store.root().join("notes.txt"), "x").unwrap();
        fs::write(store.root().join("9bad.toml"), "x").unwrap();
        let entries = store.list().unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn rename_moves_descriptor_and_log() {
        let (store, _dir) = store();
        store.create(&name("old"), false).unwrap();
        store.append_log(&name("old"), "hello").unwrap();
        store.rename(&name("old"), &name("new")).unwrap();
        assert!(!store.exists(&name("old")));
        assert!(store.exists(&name("new")));
        assert!(store.read_log(&name("new"), 0).unwrap().contains("hello"));
    }

    #[test]
    fn rename_refuses_existing_target() {
        let (store, _dir) = store();
        store.create(&name("a"), false).unwrap();
        store.create(&name("b"), false).unwrap();
        assert!(matches!(
            store.rename(&name("a"), &name("b")),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn copy_leaves_the_log_behind() {
        let (store, _dir) = store();
        store.create(&name("a"), false).unwrap();
        store.append_log(&name("a"), "run 1").unwrap();
        store.copy(&name("a"), &name("b")).unwrap();
        assert!(store.exists(&name("a")));
        assert!(store.exists(&name("b")));
        assert_eq!(store.read_log(&name("b"), 0).unwrap(), "");
    }

    #[test]
    fn remove_deletes_descriptor_and_log() {
        let (store, _dir) = store();
        store.create(&name("a"), false).unwrap();
        store.append_log(&name("a"), "run 1").unwrap();
        store.remove(&name("a")).unwrap();
        assert!(!store.exists(&name("a")));
        assert!(!store.log_path(&name("a")).is_file());
        assert!(matches!(
            store.remove(&name("a")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn import_validates_extension_and_stem() {
        let (store, dir) = store();
        let good = dir.path().join("scan.toml");
        fs::write(&good, "# Imported scan.\n[session]\n").unwrap();
        let imported = store.import_file(&good, false).unwrap();
        assert_eq!(imported.as_str(), "scan");

        let bad_ext = dir.path().join("scan.yaml");
        fs::write(&bad_ext, "x").unwrap();
        assert!(matches!(
            store.import_file(&bad_ext, false),
            Err(Error::Import { .. })
        ));

        let bad_stem = dir.path().join("9scan.toml");
        fs::write(&bad_stem, "x").unwrap();
        assert!(matches!(
            store.import_file(&bad_stem, false),
            Err(Error::InvalidName { .. })
        ));
    }

    #[test]
    fn export_then_unpack_restores_descriptor_and_log() {
        let (store, dir) = store();
        store.create(&name("tomo"), false).unwrap();
        store.append_log(&name("tomo"), "aligned").unwrap();
        let archive = dir.path().join("tomo.tar.gz");
        store.export(&name("tomo"), &archive).unwrap();

        let other = SessionStore::open(dir.path().join("other")).unwrap();
        let imported = other.unpack_archive(&archive, false).unwrap();
        assert_eq!(imported, vec![name("tomo")]);
        assert_eq!(other.read(&name("tomo")).unwrap(), store.read(&name("tomo")).unwrap());
        assert!(other.read_log(&name("tomo"), 0).unwrap().contains("aligned"));

        // A second unpack into the same store needs force.
        assert!(matches!(
            other.unpack_archive(&archive, false),
            Err(Error::AlreadyExists(_))
        ));
        other.unpack_archive(&archive, true).unwrap();
    }

    #[test]
    fn read_log_tails_the_requested_number_of_lines() {
        let (store, _dir) = store();
        store.create(&name("a"), false).unwrap();
        for i in 0..5 {
            store.append_log(&name("a"), &format!("line {i}")).unwrap();
        }
        let tail = store.read_log(&name("a"), 2).unwrap();
        assert_eq!(tail.lines().count(), 2);
        assert!(tail.contains("line 3"));
        assert!(tail.contains("line 4"));
        assert!(store.read_log(&name("a"), 0).unwrap().lines().count() == 5);
    }
}
