use anyhow::{Context, Result, bail};
use memmap2::Mmap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// Upper bound on the up-front allocation for an entry. The size in the zip
/// header is not trusted beyond this; larger entries grow while reading.
const MAX_CAPACITY_HINT: usize = 1 << 20;

fn capacity_hint(declared_size: u64) -> usize {
    usize::try_from(declared_size).map_or(MAX_CAPACITY_HINT, |n| n.min(MAX_CAPACITY_HINT))
}

pub fn is_archive_name(path: &str) -> bool {
    [".jar", ".JAR", ".zip", ".ZIP"]
        .iter()
        .any(|ext| path.ends_with(ext))
}

/// Reads one entry out of a jar/zip. The container is opened, scanned front
/// to back for an exact name match and closed again on every call.
pub fn read_archive_entry(archive_path: &Path, entry_name: &str) -> Result<Vec<u8>> {
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;
    // SAFETY: The file is opened read-only and outlives the mapping, which is
    // dropped at the end of this function.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to mmap archive: {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(Cursor::new(&mmap[..]))
        .with_context(|| format!("Failed to read zip structure: {}", archive_path.display()))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.name() != entry_name {
            continue;
        }

        let mut data = Vec::with_capacity(capacity_hint(entry.size()));
        entry.read_to_end(&mut data).with_context(|| {
            format!("Failed to read {entry_name} from {}", archive_path.display())
        })?;
        return Ok(data);
    }

    bail!("{entry_name} not found in {}", archive_path.display())
}
