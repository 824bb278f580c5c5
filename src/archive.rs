use std::io::Cursor;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::{error::Error, Result};

// Unix file-type bits, for classifying archive entries.
const S_IFMT: u32 = 0o170000;
const S_IFREG: u32 = 0o100000;
const S_IFDIR: u32 = 0o040000;
const S_IFLNK: u32 = 0o120000;

/// Extract an untrusted ZIP archive into `dest`.
///
/// Every entry is validated before anything is written: an entry whose
/// stored path is absolute or escapes `dest` via `..` segments rejects the
/// whole archive, as does any symlink or other non-file entry (a symlink
/// planted inside the workspace could point outside it and turn a later
/// write into an escape). On rejection nothing has been materialized;
/// the caller discards the workspace as a unit.
///
/// Size limits are enforced upstream; this guard only ensures extraction
/// can never touch a path outside `dest`.
pub fn extract_archive(bytes: &[u8], dest: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::InvalidArchive(format!("not a readable ZIP archive: {e}")))?;

    // Validation pass: fail fast before any write.
    let mut targets: Vec<(usize, PathBuf)> = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| Error::InvalidArchive(format!("unreadable entry {index}: {e}")))?;
        let name = String::from_utf8_lossy(entry.name_raw()).into_owned();

        let relative = entry.enclosed_name().ok_or_else(|| {
            Error::InvalidArchive(format!("entry escapes the extraction root: {name:?}"))
        })?;

        if let Some(kind) = entry.unix_mode().map(|mode| mode & S_IFMT) {
            if kind == S_IFLNK {
                return Err(Error::InvalidArchive(format!(
                    "symlink entries are not allowed: {name:?}"
                )));
            }
            if kind != 0 && kind != S_IFREG && kind != S_IFDIR {
                return Err(Error::InvalidArchive(format!(
                    "unsupported entry type: {name:?}"
                )));
            }
        }

        targets.push((index, dest.join(relative)));
    }

    for (index, target) in targets {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| Error::InvalidArchive(format!("unreadable entry {index}: {e}")))?;
        if entry.is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut out = std::fs::File::create(&target)?;
            std::io::copy(&mut entry, &mut out)?;
        }
    }

    debug!("Extracted {} archive entries into {}", archive.len(), dest.display());
    Ok(())
}
