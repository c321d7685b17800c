//! `weft build`: elaborate, check, and emit Verilog.
//!
//! 1. Load `weft.toml`
//! 2. Elaborate every configured component
//! 3. Run the lint engine (errors stop the build unless `--no-lint`)
//! 4. Write one `.v` file per module and `manifest.json`

use std::path::{Path, PathBuf};

use tracing::debug;
use weft_common::{ContentHash, Interner};
use weft_verilog::Manifest;

use crate::pipeline::{
    elaborate, lint_modules, load_project, project_label, report_diagnostics,
};
use crate::{BuildArgs, GlobalArgs};

/// Name of the manifest written next to the emitted modules.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Runs the `weft build` command.
///
/// Returns exit code 0 on success, 1 if lint reported errors.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (root, config) = load_project(global)?;
    if !global.quiet {
        eprintln!("   Building {}", project_label(&config));
    }

    let interner = Interner::new();
    let elaborated = elaborate(&config, &interner)?;

    if !args.no_lint {
        let sink = lint_modules(&elaborated.modules, &interner, &config.lint)?;
        if report_diagnostics(&sink, global) > 0 {
            return Ok(1);
        }
    }

    let out_dir = output_dir(&root, args.out.as_deref().unwrap_or(&config.output.dir));
    std::fs::create_dir_all(&out_dir)?;

    let mut manifest = Manifest::new(config.project.name.clone());
    for module in &elaborated.modules {
        let file = weft_verilog::file_name(module, &interner);
        let text = weft_verilog::emit_module(module, &interner);
        let path = out_dir.join(&file);
        let verb = if is_current(&path, &text) {
            "Unchanged"
        } else {
            std::fs::write(&path, &text)?;
            "Emitting"
        };
        manifest.add(module, &interner, &file, &text);
        if !global.quiet {
            eprintln!("{verb:>12} {}", path.display());
        }
    }
    if config.output.manifest {
        std::fs::write(out_dir.join(MANIFEST_FILE), manifest.to_json()?)?;
    }
    debug!(
        modules = elaborated.modules.len(),
        sources = ?elaborated.platform.sources(),
        "build complete"
    );

    if !global.quiet {
        let sources = elaborated.platform.sources();
        if !sources.is_empty() {
            eprintln!("    External sources: {}", sources.join(", "));
        }
        eprintln!("    Finished {} module(s)", elaborated.modules.len());
    }
    Ok(0)
}

/// Returns `true` if `path` already holds exactly `text`.
fn is_current(path: &Path, text: &str) -> bool {
    std::fs::read(path)
        .map(|old| ContentHash::from_bytes(text.as_bytes()).matches(&old))
        .unwrap_or(false)
}

/// Resolves `dir` against the project root unless it is absolute.
fn output_dir(root: &Path, dir: &str) -> PathBuf {
    let p = Path::new(dir);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}
