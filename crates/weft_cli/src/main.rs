//! weft CLI: the command-line front end of the weft gateware generator.
//!
//! Provides `weft build` to emit Verilog and a manifest, `weft lint` to run
//! the design-rule checks, `weft csr` to print register maps, and
//! `weft info` to report CPU metadata and derived clock frequencies.

#![warn(missing_docs)]

mod build;
mod csr;
mod info;
mod lint;
mod pipeline;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// weft: structural gateware generator.
#[derive(Parser, Debug)]
#[command(name = "weft", version, about = "weft gateware generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `weft.toml` file or the directory containing it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Elaborate the configured components and emit Verilog.
    Build(BuildArgs),
    /// Run design-rule checks on the configured components.
    Lint(LintArgs),
    /// Print the CSR map of every component.
    Csr(ReportArgs),
    /// Print CPU metadata and derived clock frequencies.
    Info(ReportArgs),
}

/// Arguments for `weft build`.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Output directory (overrides `output.dir`).
    #[arg(short, long)]
    pub out: Option<String>,

    /// Emit even when lint reports errors.
    #[arg(long)]
    pub no_lint: bool,
}

/// Arguments for `weft lint`.
#[derive(Parser, Debug)]
pub struct LintArgs {
    /// Rule names or codes to suppress (e.g., `--allow unused-signal`).
    #[arg(long, num_args = 1..)]
    pub allow: Vec<String>,

    /// Rule names or codes to promote to errors (e.g., `--deny W102`).
    #[arg(long, num_args = 1..)]
    pub deny: Vec<String>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the reporting subcommands.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from the environment.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && std::env::var_os("TERM").is_some(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Lint(ref args) => lint::run(args, &global),
        Command::Csr(ref args) => csr::run(args, &global),
        Command::Info(ref args) => info::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Returns the default log filter for the verbosity flags.
fn default_filter(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_tracing(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(global)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_build_default() {
        let cli = Cli::parse_from(["weft", "build"]);
        match cli.command {
            Command::Build(ref args) => {
                assert!(args.out.is_none());
                assert!(!args.no_lint);
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_lint_with_args() {
        let cli = Cli::parse_from([
            "weft",
            "lint",
            "--allow",
            "unused-signal",
            "--deny",
            "W102",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Lint(ref args) => {
                assert_eq!(args.allow, vec!["unused-signal"]);
                assert_eq!(args.deny, vec!["W102"]);
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Lint command"),
        }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["weft", "csr", "--quiet", "--color", "never", "--config", "hw"]);
        assert!(cli.quiet);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.config.as_deref(), Some("hw"));
        assert!(matches!(cli.command, Command::Csr(_)));
    }

    #[test]
    fn parse_info_json() {
        let cli = Cli::parse_from(["weft", "info", "-f", "json"]);
        match cli.command {
            Command::Info(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Info command"),
        }
    }

    #[test]
    fn verbosity_selects_filter() {
        let mut g = GlobalArgs {
            quiet: false,
            verbose: false,
            color: false,
            config: None,
        };
        assert_eq!(default_filter(&g), "warn");
        g.verbose = true;
        assert_eq!(default_filter(&g), "debug");
        g.quiet = true;
        assert_eq!(default_filter(&g), "error");
    }
}
