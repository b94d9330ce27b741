//! Per-volume indexing of `px-volumes.out`
//!
//! The capture is the JSON array `pxctl volume list -j` prints. Each record
//! becomes a sub-entry keyed by its volume ID; volume names are kept as
//! aliases so `inspect` accepts either, as the live tool does.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{Content, ResourceEntry, SubIndex};

/// Build the sub-index for a volumes capture
///
/// Records without an `id` are skipped. A name that collides with an ID or
/// with another volume's name is not aliased.
pub fn index_volumes(resource: &str, value: &Value) -> Option<SubIndex> {
    let records = value.as_array()?;

    let mut entries = BTreeMap::new();
    let mut names: BTreeMap<String, Option<String>> = BTreeMap::new();

    for record in records {
        let Some(id) = record.get("id").and_then(scalar_string) else {
            tracing::debug!(resource, "skipping volume record without an id");
            continue;
        };

        if let Some(name) = record
            .pointer("/locator/name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
        {
            names
                .entry(name.to_string())
                .and_modify(|owner| *owner = None)
                .or_insert_with(|| Some(id.clone()));
        }

        let entry = ResourceEntry::new(
            format!("{resource}/{id}"),
            Content::structured(record.clone()),
        );
        entries.insert(id, entry);
    }

    let aliases = names
        .into_iter()
        .filter_map(|(name, owner)| owner.map(|id| (name, id)))
        .filter(|(name, _)| !entries.contains_key(name))
        .collect();

    Some(SubIndex { entries, aliases })
}

/// Render a JSON scalar as the string it names (`"12"` and `12` both give `12`)
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Typed view of one volume record, for the text renderers
///
/// Every field is optional in practice: captures come from many releases
/// and 64-bit counters may be encoded as JSON strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Volume {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub locator: Locator,
    #[serde(deserialize_with = "null_as_default")]
    pub spec: VolumeSpec,
    #[serde(deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(deserialize_with = "lenient_string")]
    pub attached_on: String,
    #[serde(deserialize_with = "lenient_string")]
    pub ctime: String,
    #[serde(deserialize_with = "lenient_string")]
    pub detach_time: String,
    #[serde(deserialize_with = "lenient_string")]
    pub device_path: String,
    #[serde(deserialize_with = "lenient_u64")]
    pub usage: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub replica_sets: Vec<ReplicaSet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Locator {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VolumeSpec {
    #[serde(deserialize_with = "lenient_u64")]
    pub size: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub ha_level: u64,
    #[serde(deserialize_with = "lenient_string")]
    pub format: String,
    #[serde(deserialize_with = "lenient_string")]
    pub cos: String,
    #[serde(deserialize_with = "lenient_bool")]
    pub shared: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub sharedv4: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub encrypted: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub proxy_volume: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub volume_labels: BTreeMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub mount_options: MountOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MountOptions {
    #[serde(deserialize_with = "null_as_default")]
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReplicaSet {
    #[serde(deserialize_with = "null_as_default")]
    pub nodes: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub pool_uuids: Vec<String>,
}

impl Volume {
    /// Interpret a record; `None` when it is not shaped like a volume at all
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Parse every record of a volumes capture, skipping the unreadable ones
    pub fn all_from_value(value: &Value) -> Option<Vec<Self>> {
        value
            .as_array()
            .map(|records| records.iter().filter_map(Self::from_value).collect())
    }
}

/// `null` reads as the field's default, as a missing field does
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}
