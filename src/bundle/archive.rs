//! Opening a diagnostic archive
//!
//! Archives are unpacked once into a private temporary directory which lives
//! only as long as the [`ExtractedBundle`]; the loader reads everything it
//! needs into memory and drops it. A directory is accepted as an already
//! extracted bundle and is never modified.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use tempfile::TempDir;

use crate::error::{Result, bundle_unreadable};
use crate::progress::ExtractProgress;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// An extracted bundle on disk
#[derive(Debug)]
pub struct ExtractedBundle {
    root: PathBuf,
    temp: Option<TempDir>,
}

impl ExtractedBundle {
    /// Directory the bundle contents start at
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the contents live in a temporary extraction directory
    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }
}

/// Open an archive (gzip-compressed or plain tar) or an extracted directory
pub fn open(path: &Path) -> Result<ExtractedBundle> {
    let shown = path.display().to_string();

    let metadata = std::fs::metadata(path).map_err(|e| bundle_unreadable(&shown, e.to_string()))?;
    if metadata.is_dir() {
        tracing::debug!(path = %shown, "using extracted bundle directory");
        return Ok(ExtractedBundle {
            root: path.to_path_buf(),
            temp: None,
        });
    }

    let temp = crate::temp::extraction_dir().map_err(|e| {
        bundle_unreadable(&shown, format!("cannot create extraction directory: {}", e))
    })?;

    let archive_name = path
        .file_name()
        .map_or_else(|| shown.clone(), |n| n.to_string_lossy().into_owned());
    let progress = ExtractProgress::new(&archive_name);

    match unpack(path, temp.path(), &progress) {
        Ok(0) => {
            progress.abandon();
            Err(bundle_unreadable(&shown, "archive contains no members"))
        }
        Ok(count) => {
            progress.finish();
            tracing::info!(path = %shown, entries = count, dest = %temp.path().display(), "extracted archive");
            Ok(ExtractedBundle {
                root: temp.path().to_path_buf(),
                temp: Some(temp),
            })
        }
        Err(e) => {
            progress.abandon();
            Err(bundle_unreadable(&shown, e.to_string()))
        }
    }
}

/// Unpack every member of `archive` below `dest`, returning the member count
///
/// Leading `/` and `.` components are dropped and members escaping `dest`
/// through `..` are skipped. A member that cannot be written is logged and
/// skipped; a corrupt stream fails the whole extraction.
fn unpack(archive: &Path, dest: &Path, progress: &ExtractProgress) -> std::io::Result<usize> {
    let mut reader = BufReader::new(File::open(archive)?);
    let compressed = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    let stream: Box<dyn Read> = if compressed {
        Box::new(MultiGzDecoder::new(reader))
    } else {
        Box::new(reader)
    };

    let mut tar = tar::Archive::new(stream);
    let mut count = 0;
    for entry in tar.entries()? {
        let mut entry = entry?;
        let member = entry.path()?.to_string_lossy().into_owned();
        match entry.unpack_in(dest) {
            Ok(true) => {}
            Ok(false) => tracing::warn!(member = %member, "skipped archive member outside the bundle"),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Err(e),
            Err(e) => tracing::warn!(member = %member, error = %e, "failed to unpack archive member"),
        }
        progress.inc_entry(&member);
        count += 1;
    }
    Ok(count)
}
