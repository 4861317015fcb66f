use anyhow::{Result, bail};
use log::info;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const JAVA_HOME_ENV: &str = "JAVA_HOME";
pub const LOCAL_JRE_DIR: &str = "jre";
pub const DEFAULT_USER_CLASSPATH: &str = ".";

/// Finds the JRE root: an explicit existing path, then `./jre`, then
/// `$JAVA_HOME/jre`.
pub fn resolve_jre_dir(jre_option: Option<&Path>) -> Result<PathBuf> {
    locate_jre_dir(
        jre_option,
        Path::new(LOCAL_JRE_DIR),
        env::var_os(JAVA_HOME_ENV),
    )
}

pub fn locate_jre_dir(
    jre_option: Option<&Path>,
    local_jre: &Path,
    java_home: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(p) = jre_option
        && p.exists()
    {
        info!("using jre {}", p.display());
        return Ok(p.to_path_buf());
    }

    if local_jre.exists() {
        info!("using local jre {}", local_jre.display());
        return Ok(local_jre.to_path_buf());
    }

    if let Some(home) = java_home.filter(|h| !h.is_empty()) {
        let jre = PathBuf::from(home).join("jre");
        info!("using jre from {JAVA_HOME_ENV}: {}", jre.display());
        return Ok(jre);
    }

    bail!("Cannot find jre folder (use --Xjre or set {JAVA_HOME_ENV})")
}

pub fn boot_classpath_dir(jre_dir: &Path) -> PathBuf {
    jre_dir.join("lib")
}

pub fn ext_classpath_dir(jre_dir: &Path) -> PathBuf {
    jre_dir.join("lib").join("ext")
}

pub fn resolve_user_classpath(cp_option: Option<&str>) -> &str {
    match cp_option {
        Some(cp) if !cp.is_empty() => cp,
        _ => DEFAULT_USER_CLASSPATH,
    }
}
