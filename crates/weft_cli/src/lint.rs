//! `weft lint`: design-rule checks on the configured components.

use weft_common::Interner;
use weft_config::{LintConfig, ProjectConfig};
use weft_lint::LintEngine;

use crate::pipeline::{
    elaborate, lint_modules, load_project, project_label, report_diagnostics,
};
use crate::{GlobalArgs, LintArgs, ReportFormat};

/// Runs the `weft lint` command.
///
/// Returns exit code 0 if no errors, 1 if there are errors.
pub fn run(args: &LintArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (_, config) = load_project(global)?;
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Checking {}", project_label(&config));
    }

    let interner = Interner::new();
    let elaborated = elaborate(&config, &interner)?;
    let merged = merge_lint_config(&config, args);
    let sink = lint_modules(&elaborated.modules, &interner, &merged)?;

    match args.format {
        ReportFormat::Text => {
            report_diagnostics(&sink, global);
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&sink.diagnostics())?);
        }
    }

    Ok(if sink.has_errors() { 1 } else { 0 })
}

/// Merges CLI `--allow`/`--deny` flags with the config file's lint section.
///
/// A rule named on the command line is removed from the opposite config list,
/// whether the two lists spell it by name or by code.
fn merge_lint_config(config: &ProjectConfig, args: &LintArgs) -> LintConfig {
    let engine = LintEngine::with_defaults();
    let same_rule = |a: &str, b: &str| {
        a == b
            || matches!(
                (engine.find_rule(a), engine.find_rule(b)),
                (Some(x), Some(y)) if x.name() == y.name()
            )
    };
    let mut deny: Vec<String> = config.lint.deny.clone();
    let mut allow: Vec<String> = config.lint.allow.clone();

    for rule in &args.deny {
        allow.retain(|r| !same_rule(r.as_str(), rule.as_str()));
        if !deny.contains(rule) {
            deny.push(rule.clone());
        }
    }
    for rule in &args.allow {
        deny.retain(|r| !same_rule(r.as_str(), rule.as_str()));
        if !allow.contains(rule) {
            allow.push(rule.clone());
        }
    }

    LintConfig {
        deny,
        allow,
        warn: config.lint.warn.clone(),
    }
}
