//! Test fixtures and utilities for reducing test setup duplication.
//!
//! This module provides helpers to create diagnostic bundles on disk (as an
//! extracted tree or packed into a `.tar.gz`) with a single builder chain.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{BundleFixture, sample_volumes};
//!
//! #[test]
//! fn my_test() {
//!     let bundle = BundleFixture::new()
//!         .volumes(&sample_volumes(&["vol-A", "vol-B"]))
//!         .misc("px-status.out", "Status: PX is operational\n")
//!         .load();
//! }
//! ```

use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::bundle::DiagnosticBundle;

/// Node directory every fixture bundle uses
pub const FIXTURE_NODE_DIR: &str = "var/lib/osd/diagfiles/node-1";

/// Create a temp directory in the system temp location.
///
/// Uses `crate::temp::temp_dir_base()` to ensure temp dirs are never
/// created under the current working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(crate::temp::temp_dir_base()).expect("Failed to create temp directory")
}

/// A diagnostic bundle laid out like an extracted diag archive
pub struct BundleFixture {
    temp: TempDir,
    node_dir: PathBuf,
}

impl BundleFixture {
    /// Create an empty bundle with `misc/` and `etc/pwx/` folders
    ///
    /// # Panics
    ///
    /// Panics if the directories cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let temp = create_temp_dir();
        let node_dir = temp.path().join(FIXTURE_NODE_DIR);
        std::fs::create_dir_all(node_dir.join("misc")).expect("Failed to create misc directory");
        std::fs::create_dir_all(node_dir.join("etc/pwx")).expect("Failed to create etc directory");
        Self { temp, node_dir }
    }

    /// A bundle providing every expected resource
    #[must_use]
    pub fn complete() -> Self {
        Self::new()
            .volumes(&sample_volumes(&["vol-A", "vol-B"]))
            .misc("px-status.out", "Status: PX is operational\n")
            .misc("px-version.out", "Client Version: 3.1.0\n")
            .misc("px-kvdb.out", "Kvdb Cluster Members:\nID  PEER URLs  HEALTHY\n")
            .misc("px-alerts.out", "Type  ID  Resource  Severity\n")
            .misc("px-alerts-show.out", r#"[{"alert_type": 12, "severity": "ALARM"}]"#)
            .misc("px-clouddrive-list.out", "Cloud Drives Summary\n")
            .misc("all-journalctl.out", "-- Logs begin at Mon --\n")
            .misc("lsblk.out", "NAME MAJ:MIN RM SIZE\n")
            .misc("blkid.out", "/dev/sda1: UUID=\"abc\"\n")
            .misc("ip.out", "1: lo: <LOOPBACK,UP>\n")
            .misc("mount.out", "/dev/sda1 on / type ext4\n")
            .misc("uptime.out", " 10:00:00 up 3 days\n")
            .misc("date.out", "Mon Jan  1 00:00:00 UTC 2024\n")
            .etc("config.json", r#"{"clusterid": "px-cluster", "version": "v2"}"#)
            .etc("cluster_uuid", "8f1a2b3c-uuid\n")
    }

    /// Write a file under `misc/`
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[must_use]
    pub fn misc(self, file: &str, content: &str) -> Self {
        std::fs::write(self.node_dir.join("misc").join(file), content)
            .expect("Failed to write misc file");
        self
    }

    /// Write a file under `etc/pwx/`
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[must_use]
    pub fn etc(self, file: &str, content: &str) -> Self {
        std::fs::write(self.node_dir.join("etc/pwx").join(file), content)
            .expect("Failed to write etc file");
        self
    }

    /// Write `px-volumes.out`
    #[must_use]
    pub fn volumes(self, volumes: &Value) -> Self {
        let content = serde_json::to_string_pretty(volumes).expect("Failed to serialize volumes");
        self.misc("px-volumes.out", &content)
    }

    /// Root of the extracted tree
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Load the tree as a bundle
    ///
    /// # Panics
    ///
    /// Panics if the bundle cannot be loaded.
    #[must_use]
    pub fn load(&self) -> DiagnosticBundle {
        DiagnosticBundle::load(self.root()).expect("Failed to load fixture bundle")
    }

    /// Pack the tree into a `.tar.gz` in a separate temp directory
    ///
    /// # Panics
    ///
    /// Panics if the archive cannot be written.
    #[must_use]
    pub fn archive(&self) -> (TempDir, PathBuf) {
        let dir = create_temp_dir();
        let path = dir.path().join("diags.tar.gz");
        let file = std::fs::File::create(&path).expect("Failed to create archive");
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        builder
            .append_dir_all("var", self.root().join("var"))
            .expect("Failed to append bundle tree");
        builder
            .into_inner()
            .and_then(GzEncoder::finish)
            .expect("Failed to finish archive");
        (dir, path)
    }
}

impl Default for BundleFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Volume records shaped like `pxctl volume list -j` output
#[must_use]
pub fn sample_volumes(ids: &[&str]) -> Value {
    Value::Array(
        ids.iter()
            .map(|id| {
                json!({
                    "id": id,
                    "locator": {"name": format!("pvc-{}", id)},
                    "spec": {
                        "size": "1073741824",
                        "ha_level": "2",
                        "format": "ext4",
                        "cos": "low",
                        "sharedv4": false,
                        "encrypted": false,
                        "volume_labels": {"app": "db"}
                    },
                    "status": "up",
                    "attached_on": "",
                    "ctime": "2024-01-01T00:00:00Z",
                    "usage": "1048576",
                    "replica_sets": [
                        {"nodes": ["node-1", "node-2"], "pool_uuids": ["pool-1", "pool-2"]}
                    ]
                })
            })
            .collect(),
    )
}

/// Write a `.tar.gz` whose member names are stored verbatim (e.g. with a leading `/`)
///
/// # Panics
///
/// Panics if the archive cannot be written or a name exceeds 100 bytes.
pub fn write_raw_tar_gz(path: &Path, members: &[(&str, &str)]) {
    let file = std::fs::File::create(path).expect("Failed to create archive");
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for (name, content) in members {
        let mut header = tar::Header::new_old();
        let bytes = name.as_bytes();
        header.as_old_mut().name[..bytes.len()].copy_from_slice(bytes);
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder
            .append(&header, content.as_bytes())
            .expect("Failed to append member");
    }
    builder
        .into_inner()
        .and_then(GzEncoder::finish)
        .expect("Failed to finish archive");
}
