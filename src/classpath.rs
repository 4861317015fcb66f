use anyhow::{Result, bail};
use log::debug;
use std::fmt;
use std::path::Path;

use crate::config::{boot_classpath_dir, ext_classpath_dir, resolve_jre_dir, resolve_user_classpath};
use crate::entry::ClasspathEntry;

/// Boot, extension and user search locations, searched in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classpath {
    boot: ClasspathEntry,
    ext: ClasspathEntry,
    user: ClasspathEntry,
}

impl Classpath {
    pub fn new(boot: ClasspathEntry, ext: ClasspathEntry, user: ClasspathEntry) -> Self {
        Self { boot, ext, user }
    }

    /// Builds the classpath from an optional JRE override and an optional
    /// user classpath string.
    pub fn parse(jre_option: Option<&Path>, cp_option: Option<&str>) -> Result<Self> {
        let jre_dir = resolve_jre_dir(jre_option)?;
        Self::from_jre(&jre_dir, cp_option)
    }

    pub fn from_jre(jre_dir: &Path, cp_option: Option<&str>) -> Result<Self> {
        let boot = ClasspathEntry::wildcard_in(&boot_classpath_dir(jre_dir))?;
        let ext = ClasspathEntry::wildcard_in(&ext_classpath_dir(jre_dir))?;
        let user = ClasspathEntry::new(resolve_user_classpath(cp_option))?;
        Ok(Self::new(boot, ext, user))
    }

    pub fn boot(&self) -> &ClasspathEntry {
        &self.boot
    }

    pub fn ext(&self) -> &ClasspathEntry {
        &self.ext
    }

    pub fn user(&self) -> &ClasspathEntry {
        &self.user
    }

    /// `class_name` is an internal name such as `java/lang/Object`.
    pub fn read_class(&self, class_name: &str) -> Result<(Vec<u8>, &ClasspathEntry)> {
        let class_path = class_name_to_class_path(class_name);
        for (label, entry) in [("boot", &self.boot), ("ext", &self.ext), ("user", &self.user)] {
            match entry.read_class(&class_path) {
                Ok((data, from)) => {
                    debug!("{class_name} found in {label} classpath at {from}");
                    return Ok((data, from));
                }
                Err(err) => debug!("{class_name} not in {label} classpath: {err:#}"),
            }
        }
        bail!("class not found: {class_name}")
    }
}

impl fmt::Display for Classpath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user)
    }
}

/// `java.lang.Object` -> `java/lang/Object`.
pub fn internal_name(class_name: &str) -> String {
    class_name.replace('.', "/")
}

pub fn class_name_to_class_path(internal_name: &str) -> String {
    format!("{internal_name}.class")
}
