//! `weft csr`: print the register map of every component.

use serde::Serialize;
use weft_common::Interner;
use weft_netlist::{CsrAccess, Module};

use crate::pipeline::{elaborate, load_project};
use crate::{GlobalArgs, ReportArgs, ReportFormat};

/// One register field, as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsrRow {
    /// Owning module.
    pub module: String,
    /// Field name.
    pub name: String,
    /// Word address on the module's CSR bus.
    pub address: u32,
    /// Field width in bits.
    pub width: u32,
    /// Host access mode.
    pub access: CsrAccess,
}

/// Collects the register fields of `modules` in address order.
pub fn csr_rows(modules: &[Module], interner: &Interner) -> Vec<CsrRow> {
    modules
        .iter()
        .flat_map(|m| {
            let module = interner.resolve(m.name);
            m.csr.iter().map(move |f| CsrRow {
                module: module.to_string(),
                name: interner.resolve(f.name).to_string(),
                address: f.address,
                width: f.width,
                access: f.access,
            })
        })
        .collect()
}

/// Formats rows as an aligned text table.
pub fn format_table(rows: &[CsrRow]) -> String {
    let module_w = rows.iter().map(|r| r.module.len()).max().unwrap_or(0).max(6);
    let name_w = rows.iter().map(|r| r.name.len()).max().unwrap_or(0).max(5);
    let mut out = format!(
        "{:<module_w$}  {:<name_w$}  {:>4}  {:>5}  access\n",
        "module", "field", "addr", "width"
    );
    for r in rows {
        out.push_str(&format!(
            "{:<module_w$}  {:<name_w$}  {:>4}  {:>5}  {}\n",
            r.module, r.name, r.address, r.width, r.access
        ));
    }
    out
}

/// Runs the `weft csr` command.
pub fn run(args: &ReportArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (_, config) = load_project(global)?;
    let interner = Interner::new();
    let elaborated = elaborate(&config, &interner)?;
    let rows = csr_rows(&elaborated.modules, &interner);

    match args.format {
        ReportFormat::Text => {
            if rows.is_empty() {
                if !global.quiet {
                    eprintln!("   No register fields");
                }
            } else {
                print!("{}", format_table(&rows));
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(0)
}
