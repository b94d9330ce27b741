//! Help screen, rendered from the command grammar

use crate::grammar::{CommandGrammar, CommandGroup, CommandSpec, Flag};

const GROUPS: &[CommandGroup] = &[CommandGroup::Volume, CommandGroup::Cluster, CommandGroup::Host];

fn usage(spec: &CommandSpec) -> String {
    let prefix = if spec.pxctl { "pxctl " } else { "" };
    let mut forms = vec![format!("{}{}", prefix, spec.canonical())];
    if let Some(short) = spec.abbreviated() {
        forms.push(format!("{}{}", prefix, short));
    }
    let mut line = forms.join(" | ");

    for flag in &spec.flags {
        line.push_str(&format!(" [{}]", flag.spellings()[0]));
    }
    if let Some(arg) = &spec.arg_name {
        if spec.min_args == 0 {
            line.push_str(&format!(" [{}]", arg));
        } else {
            line.push_str(&format!(" {}", arg));
        }
    }
    line
}

/// Every command grouped by section, with the usage notes
pub fn render(grammar: &CommandGrammar) -> String {
    let mut lines = vec!["Portworx pxctl (offline diag shell)".to_string()];

    for group in GROUPS {
        let specs: Vec<&CommandSpec> = grammar
            .all_specs()
            .iter()
            .filter(|s| s.group == *group)
            .collect();
        if specs.is_empty() {
            continue;
        }

        let usages: Vec<String> = specs.iter().map(|s| usage(s)).collect();
        let width = usages.iter().map(String::len).max().unwrap_or(0);

        lines.push(String::new());
        lines.push(format!("{}:", group.title()));
        for (spec, usage) in specs.iter().zip(&usages) {
            if spec.summary.is_empty() {
                lines.push(format!("  {}", usage));
            } else {
                lines.push(format!("  {:<width$}  {}", usage, spec.summary, width = width));
            }
        }
    }

    let json = Flag::Json.spellings().join("/");
    lines.push(String::new());
    lines.push("Notes:".to_string());
    lines.push(format!("  - '{}' may appear anywhere in the command", json));
    lines.push("  - The 'pxctl' prefix is optional".to_string());
    lines.push("  - Type 'exit' or 'quit' to leave".to_string());
    lines.join("\n")
}
