//! Shared pipeline helpers for CLI commands.
//!
//! Project discovery, configuration loading, component elaboration and
//! lint execution used by every subcommand.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use weft_common::Interner;
use weft_config::{LintConfig, ProjectConfig, CONFIG_FILE};
use weft_cores::{Clocking, CpuCore, Mc68040, Mc68040Pads, Platform};
use weft_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use weft_lint::LintEngine;
use weft_netlist::Module;

use crate::GlobalArgs;

/// Component name of the 68040 bus bridge.
pub const MC68040: &str = "mc68040";
/// Component name of the DVI sampler clocking block.
pub const CLOCKING: &str = "clocking";

/// Walks up from `start` looking for the nearest directory containing `weft.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project directory and loads its configuration.
///
/// `--config` may name the file itself or the directory holding it;
/// otherwise the current directory and its parents are searched.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, ProjectConfig), Box<dyn std::error::Error>> {
    let (root, config) = match &global.config {
        Some(path) => {
            let p = PathBuf::from(path);
            if p.is_file() {
                let content = std::fs::read_to_string(&p)?;
                let root = p
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                (root, weft_config::load_config_from_str(&content)?)
            } else {
                let config = weft_config::load_config(&p)?;
                (p, config)
            }
        }
        None => {
            let root = find_project_root(&std::env::current_dir()?)?;
            let config = weft_config::load_config(&root)?;
            (root, config)
        }
    };
    debug!(root = %root.display(), project = %config.project.name, "configuration loaded");
    Ok((root, config))
}

/// Returns `name vVERSION` for banners, or just the name when no version is set.
pub fn project_label(config: &ProjectConfig) -> String {
    let meta = &config.project;
    if meta.version.is_empty() {
        meta.name.clone()
    } else {
        format!("{} v{}", meta.name, meta.version)
    }
}

/// The modules of every configured component, in configuration order.
pub struct Elaborated {
    /// Finished modules.
    pub modules: Vec<Module>,
    /// External sources registered by the components.
    pub platform: Platform,
}

/// Builds every component listed in `project.components`.
pub fn elaborate(
    config: &ProjectConfig,
    interner: &Interner,
) -> Result<Elaborated, Box<dyn std::error::Error>> {
    let mut platform = Platform::new(config.project.name.clone());
    let mut modules = Vec::new();
    for component in &config.project.components {
        let module = match component.as_str() {
            MC68040 => {
                let mut cpu = Mc68040::new(interner, &mut platform, &config.cpu.variant)?;
                cpu.set_reset_address(config.cpu.reset_address)?;
                if config.cpu.pads {
                    cpu.add_pads(&Mc68040Pads {
                        ad_width: config.cpu.ad_width,
                        ..Mc68040Pads::default()
                    })?;
                }
                cpu.finalize()?
            }
            CLOCKING => Clocking::new(interner, &config.clocking)?.into_module(),
            other => {
                return Err(format!(
                    "unknown component '{other}' (expected '{MC68040}' or '{CLOCKING}')"
                )
                .into())
            }
        };
        info!(component = %component, "component elaborated");
        modules.push(module);
    }
    Ok(Elaborated { modules, platform })
}

/// Runs the lint engine over every module.
///
/// Fails before linting if a rule is both denied and allowed, even when
/// one list names it by code and the other by name.
pub fn lint_modules(
    modules: &[Module],
    interner: &Interner,
    config: &LintConfig,
) -> Result<DiagnosticSink, Box<dyn std::error::Error>> {
    let engine = LintEngine::new(config);
    let conflicts = engine.conflicting_rules();
    if !conflicts.is_empty() {
        return Err(format!(
            "lint rule(s) both denied and allowed: {}",
            conflicts.join(", ")
        )
        .into());
    }
    let sink = DiagnosticSink::new();
    for module in modules {
        engine.run(module, interner, &sink);
    }
    Ok(sink)
}

/// Renders diagnostics to stderr and prints a one-line summary.
///
/// Returns the number of errors.
pub fn report_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) -> usize {
    let renderer = TerminalRenderer::new(global.color);
    for diag in &sink.diagnostics() {
        eprintln!("{}", renderer.render(diag));
    }
    let errors = sink.error_count();
    let warnings = sink.warning_count();
    if !global.quiet {
        eprintln!("   Result: {errors} error(s), {warnings} warning(s)");
    }
    errors
}
