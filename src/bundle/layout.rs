//! Where each resource lives inside an extracted diagnostic bundle
//!
//! A diag archive unpacks to `var/lib/osd/diagfiles/<node>/` with command
//! captures under `misc/` and the node's Portworx configuration under
//! `etc/pwx/`. Bundles repacked by hand do not always keep that prefix, so
//! [`BundleRoots::locate`] falls back to searching the tree.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Prefix every node directory lives under
const DIAGFILES_DIR: &str = "var/lib/osd/diagfiles";

/// How deep the fallback search descends looking for `misc/` and `etc/pwx/`
const SEARCH_DEPTH: usize = 8;

pub const VOLUMES: &str = "volumes";
pub const STATUS: &str = "status";
pub const VERSION: &str = "version";
pub const KVDB_MEMBERS: &str = "kvdb members";
pub const ALERTS: &str = "alerts";
pub const ALERTS_JSON: &str = "alerts json";
pub const CLOUDDRIVE_LIST: &str = "clouddrive list";
pub const CLUSTER_CONFIG: &str = "cluster config";
pub const CLUSTER_UUID: &str = "cluster uuid";
pub const JOURNALCTL: &str = "journalctl";
pub const LSBLK: &str = "lsblk";
pub const BLKID: &str = "blkid";
pub const IP_ADDR: &str = "ip addr";
pub const MOUNT: &str = "mount";
pub const UPTIME: &str = "uptime";
pub const DATE: &str = "date";

/// Directory of the bundle a resource file is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// `misc/`: captured command output
    Misc,
    /// `etc/pwx/`: node configuration
    Etc,
}

/// How a resource file is interpreted when loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Text,
}

/// A resource the loader looks for in every bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedResource {
    /// Logical name used by lookups
    pub name: &'static str,
    pub location: Location,
    /// File name relative to the location directory
    pub file: &'static str,
    pub format: Format,
    /// Build a per-record sub-index (records keyed by their `id`)
    pub keyed: bool,
}

impl ExpectedResource {
    const fn text(name: &'static str, location: Location, file: &'static str) -> Self {
        Self {
            name,
            location,
            file,
            format: Format::Text,
            keyed: false,
        }
    }

    const fn json(name: &'static str, location: Location, file: &'static str) -> Self {
        Self {
            name,
            location,
            file,
            format: Format::Json,
            keyed: false,
        }
    }

    const fn keyed(mut self) -> Self {
        self.keyed = true;
        self
    }
}

/// Every resource a complete bundle provides
pub const EXPECTED_RESOURCES: &[ExpectedResource] = &[
    ExpectedResource::json(VOLUMES, Location::Misc, "px-volumes.out").keyed(),
    ExpectedResource::text(STATUS, Location::Misc, "px-status.out"),
    ExpectedResource::text(VERSION, Location::Misc, "px-version.out"),
    ExpectedResource::text(KVDB_MEMBERS, Location::Misc, "px-kvdb.out"),
    ExpectedResource::text(ALERTS, Location::Misc, "px-alerts.out"),
    ExpectedResource::json(ALERTS_JSON, Location::Misc, "px-alerts-show.out"),
    ExpectedResource::text(CLOUDDRIVE_LIST, Location::Misc, "px-clouddrive-list.out"),
    ExpectedResource::json(CLUSTER_CONFIG, Location::Etc, "config.json"),
    ExpectedResource::text(CLUSTER_UUID, Location::Etc, "cluster_uuid"),
    ExpectedResource::text(JOURNALCTL, Location::Misc, "all-journalctl.out"),
    ExpectedResource::text(LSBLK, Location::Misc, "lsblk.out"),
    ExpectedResource::text(BLKID, Location::Misc, "blkid.out"),
    ExpectedResource::text(IP_ADDR, Location::Misc, "ip.out"),
    ExpectedResource::text(MOUNT, Location::Misc, "mount.out"),
    ExpectedResource::text(UPTIME, Location::Misc, "uptime.out"),
    ExpectedResource::text(DATE, Location::Misc, "date.out"),
];

/// Look up the loader's description of a resource by logical name
pub fn expected(name: &str) -> Option<&'static ExpectedResource> {
    EXPECTED_RESOURCES.iter().find(|r| r.name == name)
}

/// The directories resources are read from, as found in one extracted bundle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleRoots {
    pub misc: Option<PathBuf>,
    pub etc: Option<PathBuf>,
    /// Name of the node directory under `diagfiles/`, when known
    pub node: Option<String>,
}

impl BundleRoots {
    /// Find `misc/` and `etc/pwx/` below an extracted bundle
    ///
    /// Node directories are visited in name order and the first one holding
    /// the folder wins. Either root may be absent; resources under it are
    /// then reported missing rather than failing the load.
    pub fn locate(base: &Path) -> Self {
        let nodes = node_dirs(&base.join(DIAGFILES_DIR));

        let mut roots = BundleRoots::default();
        if let Some(node) = nodes.iter().find(|n| n.join("misc").is_dir()) {
            roots.misc = Some(node.join("misc"));
            roots.node = dir_name(node);
        }
        roots.etc = nodes
            .iter()
            .map(|n| n.join("etc").join("pwx"))
            .find(|p| p.is_dir());

        if roots.misc.is_none() {
            roots.misc = find_dir(base, |p| p.file_name().is_some_and(|n| n == "misc"));
            roots.node = roots
                .misc
                .as_deref()
                .and_then(Path::parent)
                .filter(|p| *p != base)
                .and_then(dir_name);
        }
        if roots.etc.is_none() {
            roots.etc = find_dir(base, |p| {
                p.file_name().is_some_and(|n| n == "pwx")
                    && p.parent()
                        .and_then(Path::file_name)
                        .is_some_and(|n| n == "etc")
            });
        }

        roots
    }

    /// Full path of a resource file, if its location directory was found
    pub fn path_for(&self, resource: &ExpectedResource) -> Option<PathBuf> {
        let dir = match resource.location {
            Location::Misc => self.misc.as_ref(),
            Location::Etc => self.etc.as_ref(),
        };
        dir.map(|d| d.join(resource.file))
    }
}

fn node_dirs(diagfiles: &Path) -> Vec<PathBuf> {
    if !diagfiles.is_dir() {
        return Vec::new();
    }
    WalkDir::new(diagfiles)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn find_dir(base: &Path, matches: impl Fn(&Path) -> bool) -> Option<PathBuf> {
    WalkDir::new(base)
        .min_depth(1)
        .max_depth(SEARCH_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_dir())
        .find(|e| matches(e.path()))
        .map(walkdir::DirEntry::into_path)
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
