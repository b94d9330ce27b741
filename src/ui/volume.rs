//! Text views of volume records
//!
//! Layouts follow `pxctl volume list` and `pxctl volume inspect` so output
//! pasted from a support case lines up with what the live tool prints.

use crate::bundle::Volume;

const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];

/// Format a byte count in binary units, rounding down (`1536` gives `1 KiB`)
pub fn human_size(bytes: u64) -> String {
    let mut value = bytes;
    for (idx, unit) in UNITS.iter().enumerate() {
        if value < 1024 || idx == UNITS.len() - 1 {
            return format!("{} {}", value, unit);
        }
        value /= 1024;
    }
    format!("{} B", bytes)
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn shared(volume: &Volume) -> &'static str {
    if volume.spec.sharedv4 {
        "v4"
    } else {
        yes_no(volume.spec.shared)
    }
}

fn attach_state(volume: &Volume, attached_prefix: &str) -> String {
    if volume.attached_on.is_empty() {
        "detached".to_string()
    } else {
        format!("{}{}", attached_prefix, volume.attached_on)
    }
}

/// One row per volume under a header line
pub fn table(volumes: &[Volume]) -> String {
    let mut lines = Vec::with_capacity(volumes.len() + 1);
    lines.push(row(
        "ID",
        "NAME",
        "SIZE",
        "HA",
        "SHARED",
        "ENCRYPTED",
        "PROXY-VOLUME",
        "IO_PRIORITY",
        "STATUS",
    ));

    for volume in volumes {
        lines.push(row(
            &volume.id,
            &volume.locator.name,
            &human_size(volume.spec.size),
            &volume.spec.ha_level.to_string(),
            shared(volume),
            yes_no(volume.spec.encrypted),
            yes_no(volume.spec.proxy_volume),
            &volume.spec.cos.to_uppercase(),
            &format!("{} - {}", volume.status, attach_state(volume, "attached on ")),
        ));
    }

    lines.join("\n")
}

#[allow(clippy::too_many_arguments)]
fn row(
    id: &str,
    name: &str,
    size: &str,
    ha: &str,
    shared: &str,
    encrypted: &str,
    proxy: &str,
    priority: &str,
    status: &str,
) -> String {
    format!(
        "{:<23} {:<40} {:<8} {:<3} {:<7} {:<9} {:<12} {:<11} {}",
        id, name, size, ha, shared, encrypted, proxy, priority, status
    )
    .trim_end()
    .to_string()
}

fn field(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:<25}:  {}", label, value)
}

/// Every detail of one volume, one field per line
pub fn detail(volume: &Volume) -> String {
    let mut lines = vec![
        field("Volume", &volume.id),
        field("Name", &volume.locator.name),
        field("Size", human_size(volume.spec.size)),
        field("Format", &volume.spec.format),
        field("HA", volume.spec.ha_level),
        field("IO Priority", &volume.spec.cos),
        field("Creation time", &volume.ctime),
        field("Shared", shared(volume)),
        field("Status", &volume.status),
        field("State", attach_state(volume, "attached: ")),
        field("Last Attached", &volume.detach_time),
        field("Device Path", &volume.device_path),
        field("Bytes used", human_size(volume.usage)),
    ];

    if !volume.spec.volume_labels.is_empty() {
        let labels: Vec<String> = volume
            .spec
            .volume_labels
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        lines.push(field("Labels", labels.join(",")));
    }

    let options = &volume.spec.mount_options.options;
    if !options.is_empty() {
        let keys: Vec<&str> = options.keys().map(String::as_str).collect();
        lines.push(field("Mount Options", keys.join(",")));
    }

    lines.push("Replica sets on nodes:".to_string());
    for (idx, set) in volume.replica_sets.iter().enumerate() {
        lines.push(format!("    Set {}", idx));
        for (node, pool) in set.nodes.iter().zip(&set.pool_uuids) {
            lines.push(format!("      Node           : {}", node));
            lines.push(format!("       Pool UUID     : {}", pool));
        }
    }

    lines.join("\n")
}
