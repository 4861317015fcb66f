use anyhow::{Context, Result, bail};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::archive::{is_archive_name, read_archive_entry};
use crate::scan::scan_jars;

pub const PATH_LIST_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// One place to look for class files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathEntry {
    Directory(PathBuf),
    Archive(PathBuf),
    /// Searched in order, first hit wins.
    Composite(Vec<ClasspathEntry>),
    /// `dir/*`: the archives found in `dir` when the entry was built.
    Wildcard {
        dir: PathBuf,
        entries: Vec<ClasspathEntry>,
    },
}

impl ClasspathEntry {
    /// Parses a single classpath element. Separator-joined lists become a
    /// composite, a trailing `*` a wildcard, `.jar`/`.zip` names an archive,
    /// anything else a directory.
    pub fn new(path: &str) -> Result<Self> {
        if path.contains(PATH_LIST_SEPARATOR) {
            return Self::composite(path);
        }
        if path.ends_with('*') {
            return Self::wildcard(path);
        }
        let abs = absolute(Path::new(path))?;
        if is_archive_name(path) {
            Ok(ClasspathEntry::Archive(abs))
        } else {
            Ok(ClasspathEntry::Directory(abs))
        }
    }

    /// Empty elements (as in `a::b`) are skipped.
    pub fn composite(path_list: &str) -> Result<Self> {
        let entries = path_list
            .split(PATH_LIST_SEPARATOR)
            .filter(|p| !p.is_empty())
            .map(Self::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(ClasspathEntry::Composite(entries))
    }

    pub fn wildcard(path: &str) -> Result<Self> {
        let base = path.trim_end_matches('*');
        let base = if base.is_empty() { "." } else { base };
        Self::wildcard_in(Path::new(base))
    }

    /// Snapshots the jars directly inside `dir`.
    pub fn wildcard_in(dir: &Path) -> Result<Self> {
        let dir = absolute(dir)?;
        let entries = scan_jars(&dir)
            .into_iter()
            .map(ClasspathEntry::Archive)
            .collect();
        Ok(ClasspathEntry::Wildcard { dir, entries })
    }

    /// Looks up `class_path` (`java/lang/Object.class`) and returns its bytes
    /// together with the directory or archive entry that had them.
    pub fn read_class(&self, class_path: &str) -> Result<(Vec<u8>, &ClasspathEntry)> {
        match self {
            ClasspathEntry::Directory(dir) => {
                let file = dir.join(class_path);
                let data = std::fs::read(&file)
                    .with_context(|| format!("Failed to read class file: {}", file.display()))?;
                Ok((data, self))
            }
            ClasspathEntry::Archive(path) => {
                let data = read_archive_entry(path, class_path)?;
                Ok((data, self))
            }
            ClasspathEntry::Composite(entries) | ClasspathEntry::Wildcard { entries, .. } => {
                for entry in entries {
                    match entry.read_class(class_path) {
                        Ok(found) => return Ok(found),
                        Err(err) => debug!("{class_path} not in {entry}: {err:#}"),
                    }
                }
                bail!("class not found: {class_path}")
            }
        }
    }
}

impl fmt::Display for ClasspathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClasspathEntry::Directory(path) | ClasspathEntry::Archive(path) => {
                write!(f, "{}", path.display())
            }
            ClasspathEntry::Composite(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{PATH_LIST_SEPARATOR}")?;
                    }
                    write!(f, "{entry}")?;
                }
                Ok(())
            }
            ClasspathEntry::Wildcard { dir, .. } => write!(f, "{}", dir.join("*").display()),
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("Failed to resolve absolute path: {}", path.display()))
}
