use ignore::WalkBuilder;
use log::debug;
use std::path::{Path, PathBuf};

fn is_jar(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "jar" || e == "JAR")
}

/// Jars directly inside `dir`, sorted by file name. Subdirectories are not
/// entered and other files are skipped. A missing directory yields nothing.
pub fn scan_jars(dir: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut jars = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("skipping while scanning {}: {err}", dir.display());
                continue;
            }
        };
        if entry.depth() != 1 || entry.file_type().is_none_or(|t| t.is_dir()) {
            continue;
        }
        if is_jar(entry.path()) {
            jars.push(entry.into_path());
        }
    }

    debug!("{} jars in {}", jars.len(), dir.display());
    jars
}
