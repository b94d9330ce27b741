//! Safe temporary directory base so archives are never unpacked under the current working
//! directory (e.g. when TMPDIR=tmp or TMPDIR=./tmp).

use std::env;
use std::path::PathBuf;

/// Prefix of every extraction directory, so leftovers are easy to spot
pub const EXTRACT_PREFIX: &str = "pxdiag-";

/// Returns a directory path suitable for creating temporary directories.
/// Never returns a relative path, so an extracted bundle never lands inside the directory the
/// operator is working in.
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

/// Create a fresh extraction directory, removed again when dropped
pub fn extraction_dir() -> std::io::Result<tempfile::TempDir> {
    tempfile::Builder::new()
        .prefix(EXTRACT_PREFIX)
        .tempdir_in(temp_dir_base())
}
