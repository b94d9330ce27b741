//! Command dispatch
//!
//! Maps a [`ResolvedCommand`] onto a bundle lookup and decides how the entry
//! is shown. Dispatch never touches the filesystem; everything it reads was
//! loaded into the [`DiagnosticBundle`] at startup.

use serde_json::Value;

use crate::bundle::{DiagnosticBundle, ResourceEntry, Volume};
use crate::error::{Result, missing_argument, no_data};
use crate::grammar::{CommandGrammar, CommandSpec, Flag, View};
use crate::resolver::{Canonical, ResolvedCommand};
use crate::ui::{help, volume};

/// Whether a result is printed as JSON or as text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Json,
    Text,
    Empty,
}

/// What one command produced
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayResult {
    Json(Value),
    Text(String),
    /// Nothing to print
    Empty,
}

impl DisplayResult {
    pub fn kind(&self) -> DisplayKind {
        match self {
            DisplayResult::Json(_) => DisplayKind::Json,
            DisplayResult::Text(_) => DisplayKind::Text,
            DisplayResult::Empty => DisplayKind::Empty,
        }
    }
}

/// Run one resolved command against the bundle
pub fn dispatch(
    bundle: &DiagnosticBundle,
    grammar: &CommandGrammar,
    resolved: &ResolvedCommand<'_>,
) -> Result<DisplayResult> {
    match resolved.canonical {
        Canonical::Noop | Canonical::Exit => Ok(DisplayResult::Empty),
        Canonical::Help => Ok(DisplayResult::Text(help::render(grammar))),
        Canonical::Command(spec) => run(bundle, spec, resolved),
    }
}

fn run(
    bundle: &DiagnosticBundle,
    spec: &CommandSpec,
    resolved: &ResolvedCommand<'_>,
) -> Result<DisplayResult> {
    if !resolved.args.complete {
        return Err(missing_argument(
            spec.canonical(),
            spec.arity(),
            resolved.args.values.len(),
        ));
    }

    let json = resolved.has_flag(Flag::Json);
    let resource = match (&spec.json_resource, json) {
        (Some(alternate), true) => alternate.as_str(),
        _ => spec.resource.as_str(),
    };
    let key = resolved.args.first();

    tracing::debug!(command = %spec.canonical(), resource, key, json, "dispatching");

    let entry = bundle
        .lookup(resource, key)
        .ok_or_else(|| no_data(resource, key))?;
    tracing::debug!(entry = entry.name(), kind = ?entry.kind(), "found entry");

    if json {
        if let Some(value) = entry.content().value() {
            return Ok(DisplayResult::Json(value.clone()));
        }
    }
    Ok(DisplayResult::Text(render_text(spec.view, entry)))
}

/// Text for an entry, falling back to the captured text when the data does
/// not fit the view
fn render_text(view: View, entry: &ResourceEntry) -> String {
    let raw = || entry.content().raw().to_string();
    let Some(value) = entry.content().value() else {
        return raw();
    };

    match view {
        View::Raw => raw(),
        View::VolumeTable => {
            let volumes = match value {
                Value::Array(_) => Volume::all_from_value(value),
                _ => Volume::from_value(value).map(|v| vec![v]),
            };
            volumes.map_or_else(raw, |v| volume::table(&v))
        }
        View::VolumeDetail => Volume::from_value(value).map_or_else(raw, |v| volume::detail(&v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PxDiagError;
    use crate::resolver::resolve;
    use crate::test_fixtures::{BundleFixture, sample_volumes};
    use serde_json::json;

    fn run_line(bundle: &DiagnosticBundle, line: &str) -> Result<DisplayResult> {
        let grammar = CommandGrammar::builtin().unwrap();
        let resolved = resolve(&grammar, line).unwrap();
        dispatch(bundle, &grammar, &resolved)
    }

    fn text(result: DisplayResult) -> String {
        match result {
            DisplayResult::Text(text) => text,
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_volume_list_summarizes_every_volume() {
        let bundle = BundleFixture::complete().load();
        let result = run_line(&bundle, "pxctl v l").unwrap();
        assert_eq!(result.kind(), DisplayKind::Text);

        let text = text(result);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("vol-A"));
        assert!(text.contains("vol-B"));
    }

    #[test]
    fn test_volume_list_keeps_records_with_null_sections() {
        let bundle = BundleFixture::new()
            .volumes(&json!([
                {"id": "vol-A", "locator": {"name": "pvc-a"}, "replica_sets": null},
                {"id": "vol-B", "locator": null, "spec": {"size": 1024}},
            ]))
            .load();

        let listed = text(run_line(&bundle, "v l").unwrap());
        assert_eq!(listed.lines().count(), 3);
        assert!(listed.contains("vol-A"));
        assert!(listed.contains("vol-B"));

        let inspected = text(run_line(&bundle, "v i vol-A").unwrap());
        assert!(inspected.starts_with("Volume                   :  vol-A"));
    }

    #[test]
    fn test_inspect_unknown_volume_is_no_data() {
        let bundle = BundleFixture::complete().load();
        let err = run_line(&bundle, "pxctl v i vol-C").unwrap_err();
        match err {
            PxDiagError::NoData { resource, key } => {
                assert_eq!(resource, "volumes");
                assert_eq!(key.as_deref(), Some("vol-C"));
            }
            other => panic!("expected NoData, got {:?}", other),
        }
    }

    #[test]
    fn test_inspect_on_bundle_without_volumes() {
        let bundle = BundleFixture::new().volumes(&json!([])).load();
        assert!(matches!(
            run_line(&bundle, "v i vol-A").unwrap_err(),
            PxDiagError::NoData { .. }
        ));
        assert_eq!(text(run_line(&bundle, "v l").unwrap()).lines().count(), 1);
    }

    #[test]
    fn test_list_and_inspect_agree_on_json() {
        let bundle = BundleFixture::complete().load();
        let listed = run_line(&bundle, "volume list -j vol-B").unwrap();
        let inspected = run_line(&bundle, "volume inspect vol-B -j").unwrap();

        assert_eq!(listed.kind(), DisplayKind::Json);
        assert_eq!(listed, inspected);
        match listed {
            DisplayResult::Json(value) => assert_eq!(value["id"], "vol-B"),
            other => panic!("expected JSON, got {:?}", other),
        }
    }

    #[test]
    fn test_volume_list_json_is_whole_capture() {
        let bundle = BundleFixture::complete().load();
        let result = run_line(&bundle, "v l -j").unwrap();
        assert_eq!(result, DisplayResult::Json(sample_volumes(&["vol-A", "vol-B"])));
    }

    #[test]
    fn test_inspect_by_name() {
        let bundle = BundleFixture::complete().load();
        let text = text(run_line(&bundle, "v i pvc-vol-A").unwrap());
        assert!(text.starts_with("Volume                   :  vol-A"));
    }

    #[test]
    fn test_list_one_volume_as_table() {
        let bundle = BundleFixture::complete().load();
        let text = text(run_line(&bundle, "v l vol-A").unwrap());
        assert_eq!(text.lines().count(), 2);
        assert!(!text.contains("vol-B"));
    }

    #[test]
    fn test_missing_argument() {
        let bundle = BundleFixture::complete().load();
        match run_line(&bundle, "volume inspect").unwrap_err() {
            PxDiagError::MissingArgument {
                command,
                expected,
                got,
            } => {
                assert_eq!(command, "volume inspect");
                assert_eq!(expected, "exactly 1");
                assert_eq!(got, 0);
            }
            other => panic!("expected MissingArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_excess_arguments() {
        let bundle = BundleFixture::complete().load();
        assert!(matches!(
            run_line(&bundle, "v i vol-A vol-B").unwrap_err(),
            PxDiagError::MissingArgument { got: 2, .. }
        ));
        assert!(matches!(
            run_line(&bundle, "status now").unwrap_err(),
            PxDiagError::MissingArgument { got: 1, .. }
        ));
    }

    #[test]
    fn test_alerts_json_reads_alternate_capture() {
        let bundle = BundleFixture::complete().load();
        let plain = text(run_line(&bundle, "alerts show").unwrap());
        assert!(plain.starts_with("Type  ID"));

        let json = run_line(&bundle, "a s -j").unwrap();
        assert_eq!(
            json,
            DisplayResult::Json(json!([{"alert_type": 12, "severity": "ALARM"}]))
        );
    }

    #[test]
    fn test_json_flag_on_text_capture_falls_back_to_text() {
        let bundle = BundleFixture::complete()
            .etc("config.json", "not json at all")
            .load();
        let result = run_line(&bundle, "config show -j").unwrap();
        assert_eq!(result, DisplayResult::Text("not json at all".to_string()));
    }

    #[test]
    fn test_raw_resources() {
        let bundle = BundleFixture::complete().load();
        assert_eq!(
            text(run_line(&bundle, "lsblk").unwrap()),
            "NAME MAJ:MIN RM SIZE\n"
        );
        assert_eq!(
            text(run_line(&bundle, "pxctl clusteruuid s").unwrap()),
            "8f1a2b3c-uuid\n"
        );
    }

    #[test]
    fn test_config_show_without_json_prints_captured_text() {
        let bundle = BundleFixture::complete().load();
        let text = text(run_line(&bundle, "config show").unwrap());
        assert_eq!(text, r#"{"clusterid": "px-cluster", "version": "v2"}"#);
    }

    #[test]
    fn test_missing_resource_is_no_data() {
        let bundle = BundleFixture::new().load();
        match run_line(&bundle, "status").unwrap_err() {
            PxDiagError::NoData { resource, key } => {
                assert_eq!(resource, "status");
                assert!(key.is_none());
            }
            other => panic!("expected NoData, got {:?}", other),
        }
    }

    #[test]
    fn test_special_commands() {
        let bundle = BundleFixture::new().load();
        assert_eq!(run_line(&bundle, "").unwrap(), DisplayResult::Empty);
        assert_eq!(run_line(&bundle, "exit").unwrap(), DisplayResult::Empty);
        let help = text(run_line(&bundle, "help").unwrap());
        assert!(help.contains("Volume commands:"));
    }

    #[test]
    fn test_unparsable_volume_capture_shown_raw() {
        let bundle = BundleFixture::new()
            .misc("px-volumes.out", r#""no volumes captured""#)
            .load();
        let text = text(run_line(&bundle, "v l").unwrap());
        assert_eq!(text, r#""no volumes captured""#);
    }
}
