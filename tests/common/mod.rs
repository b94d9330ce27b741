//! Common test utilities for pxdiag integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Where diag collection puts one node's captures
pub const NODE_DIR: &str = "var/lib/osd/diagfiles/node-1";

/// A diagnostic bundle built on disk for a test
pub struct TestBundle {
    /// Temporary directory holding the tree and the archive
    pub temp: TempDir,
    node: PathBuf,
}

impl TestBundle {
    /// Create an empty bundle with `misc/` and `etc/pwx/` folders
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let node = temp.path().join("tree").join(NODE_DIR);
        std::fs::create_dir_all(node.join("misc")).expect("Failed to create misc directory");
        std::fs::create_dir_all(node.join("etc/pwx")).expect("Failed to create etc directory");
        Self { temp, node }
    }

    /// A bundle with volumes `vol-A` and `vol-B` and every other capture
    pub fn complete() -> Self {
        Self::new()
            .volumes(&["vol-A", "vol-B"])
            .misc("px-status.out", "Status: PX is operational\n")
            .misc("px-version.out", "Client Version: 3.1.0\n")
            .misc("px-kvdb.out", "Kvdb Cluster Members:\n")
            .misc("px-alerts.out", "Type  ID  Resource  Severity\n")
            .misc("px-alerts-show.out", r#"[{"alert_type": 12}]"#)
            .misc("px-clouddrive-list.out", "Cloud Drives Summary\n")
            .misc("all-journalctl.out", "-- Logs begin --\n")
            .misc("lsblk.out", "NAME MAJ:MIN RM SIZE\n")
            .misc("blkid.out", "/dev/sda1: UUID=\"abc\"\n")
            .misc("ip.out", "1: lo: <LOOPBACK,UP>\n")
            .misc("mount.out", "/dev/sda1 on / type ext4\n")
            .misc("uptime.out", " 10:00:00 up 3 days\n")
            .misc("date.out", "Mon Jan  1 00:00:00 UTC 2024\n")
            .etc("config.json", r#"{"clusterid": "px-cluster"}"#)
            .etc("cluster_uuid", "8f1a2b3c-uuid\n")
    }

    /// Write a file under `misc/`
    pub fn misc(self, file: &str, content: &str) -> Self {
        std::fs::write(self.node.join("misc").join(file), content)
            .expect("Failed to write misc file");
        self
    }

    /// Write a file under `etc/pwx/`
    pub fn etc(self, file: &str, content: &str) -> Self {
        std::fs::write(self.node.join("etc/pwx").join(file), content)
            .expect("Failed to write etc file");
        self
    }

    /// Write `px-volumes.out` with one record per ID
    pub fn volumes(self, ids: &[&str]) -> Self {
        let content =
            serde_json::to_string_pretty(&volume_records(ids)).expect("Failed to serialize");
        self.misc("px-volumes.out", &content)
    }

    /// The extracted tree
    pub fn dir(&self) -> PathBuf {
        self.temp.path().join("tree")
    }

    /// Pack the tree into `diags.tar.gz` and return its path
    pub fn archive(&self) -> PathBuf {
        let path = self.temp.path().join("diags.tar.gz");
        let file = std::fs::File::create(&path).expect("Failed to create archive");
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        builder
            .append_dir_all("var", self.dir().join("var"))
            .expect("Failed to append bundle tree");
        builder
            .into_inner()
            .and_then(GzEncoder::finish)
            .expect("Failed to finish archive");
        path
    }
}

impl Default for TestBundle {
    fn default() -> Self {
        Self::new()
    }
}

/// Volume records shaped like `pxctl volume list -j` output
pub fn volume_records(ids: &[&str]) -> Value {
    Value::Array(
        ids.iter()
            .map(|id| {
                json!({
                    "id": id,
                    "locator": {"name": format!("pvc-{}", id)},
                    "spec": {"size": "1073741824", "ha_level": "2", "cos": "high"},
                    "status": "up",
                    "attached_on": "",
                    "usage": "0",
                    "replica_sets": [{"nodes": ["node-1"], "pool_uuids": ["pool-1"]}]
                })
            })
            .collect(),
    )
}

/// The pxdiag binary, isolated from the developer's environment
pub fn pxdiag_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pxdiag"));
    cmd.env_remove("PXDIAG_BUNDLE");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run `pxdiag <archive> -c <line>` for each line
#[allow(dead_code)]
pub fn run_commands(archive: &Path, lines: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = pxdiag_cmd();
    cmd.arg(archive);
    for line in lines {
        cmd.arg("-c").arg(line);
    }
    cmd.assert()
}
