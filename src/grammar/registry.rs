//! Builtin command definitions
//!
//! Mirrors the subset of `pxctl` and host commands whose output a diag
//! bundle captures. Abbreviations follow the live tool (`v l`, `sv k m`, ...).

use super::{CommandGroup, CommandSpec, Flag, View};
use crate::bundle::layout;

/// Get the builtin command table, in help-screen order
pub fn builtin_commands() -> Vec<CommandSpec> {
    vec![
        // Volumes
        CommandSpec::new("volume list", layout::VOLUMES)
            .with_abbrev("volume", "v")
            .with_abbrev("list", "l")
            .with_flag(Flag::Json)
            .with_args(0, 1, "<volume-id>")
            .with_view(View::VolumeTable)
            .in_group(CommandGroup::Volume)
            .describe("List volumes, or one volume by ID or name"),
        CommandSpec::new("volume inspect", layout::VOLUMES)
            .with_abbrev("volume", "v")
            .with_abbrev("inspect", "i")
            .with_flag(Flag::Json)
            .with_args(1, 1, "<volume-id>")
            .with_view(View::VolumeDetail)
            .in_group(CommandGroup::Volume)
            .describe("Show every detail of one volume"),
        // Cluster / system
        CommandSpec::new("status", layout::STATUS).describe("Node and cluster status"),
        CommandSpec::new("version", layout::VERSION).describe("Portworx version"),
        CommandSpec::new("service kvdb members", layout::KVDB_MEMBERS)
            .with_abbrev("service", "sv")
            .with_abbrev("kvdb", "k")
            .with_abbrev("members", "m")
            .describe("Internal kvdb members"),
        CommandSpec::new("alerts show", layout::ALERTS)
            .with_abbrev("alerts", "a")
            .with_abbrev("show", "s")
            .with_flag(Flag::Json)
            .with_json_resource(layout::ALERTS_JSON)
            .describe("Active alerts"),
        CommandSpec::new("clouddrive list", layout::CLOUDDRIVE_LIST)
            .with_abbrev("clouddrive", "cd")
            .with_abbrev("list", "l")
            .describe("Cloud drives per node"),
        CommandSpec::new("config show", layout::CLUSTER_CONFIG)
            .with_abbrev("show", "s")
            .with_flag(Flag::Json)
            .describe("Node configuration (config.json)"),
        CommandSpec::new("clusteruuid show", layout::CLUSTER_UUID)
            .with_abbrev("show", "s")
            .describe("Cluster UUID"),
        // Host
        CommandSpec::new("journalctl", layout::JOURNALCTL)
            .host()
            .describe("System journal"),
        CommandSpec::new("lsblk", layout::LSBLK)
            .host()
            .describe("Block devices"),
        CommandSpec::new("blkid", layout::BLKID)
            .host()
            .describe("Block device attributes"),
        CommandSpec::new("ip addr show", layout::IP_ADDR)
            .host()
            .describe("Network interfaces"),
        CommandSpec::new("mount", layout::MOUNT)
            .host()
            .describe("Mounted filesystems"),
        CommandSpec::new("uptime", layout::UPTIME)
            .host()
            .describe("Uptime and load"),
        CommandSpec::new("date", layout::DATE)
            .host()
            .describe("Date the bundle was taken"),
    ]
}
