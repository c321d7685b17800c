//! End-to-end checks of the DVI sampler clocking block.

use weft_common::Interner;
use weft_config::ClockingConfig;
use weft_cores::Clocking;
use weft_diagnostics::DiagnosticSink;
use weft_lint::{analyze_usage, LintEngine};
use weft_netlist::{Cell, DomainOrigin, Module, PortDirection};
use weft_sim::Simulator;

fn build(interner: &Interner, config: &ClockingConfig) -> Module {
    Clocking::new(interner, config).unwrap().into_module()
}

fn cell<'m>(m: &'m Module, interner: &Interner, name: &str) -> &'m Cell {
    m.find_cell(interner.get_or_intern(name)).unwrap()
}

fn bound_to(m: &Module, interner: &Interner, cell: &Cell, port: &str) -> String {
    let conn = cell.connection(interner.get_or_intern(port)).unwrap();
    let id = conn.signal.signal().unwrap();
    interner.resolve(m.signals[id].name).to_string()
}

/// Starts a simulation with `sys` out of reset and the PLL unlocked.
fn start<'m>(m: &'m Module, interner: &'m Interner) -> Simulator<'m> {
    let mut sim = Simulator::new(m, interner).unwrap();
    sim.poke("sys_rst", 0).unwrap();
    sim.poke("locked_async", 0).unwrap();
    sim
}

#[test]
fn lint_clean() {
    let interner = Interner::new();
    let m = build(&interner, &ClockingConfig::default());
    let sink = DiagnosticSink::new();
    LintEngine::with_defaults().run(&m, &interner, &sink);
    let diags = sink.take_all();
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:#?}");
}

#[test]
fn every_input_port_is_read() {
    let interner = Interner::new();
    let m = build(&interner, &ClockingConfig::default());
    let usage = analyze_usage(&m);
    let unread: Vec<&str> = m
        .ports
        .values()
        .filter(|p| p.direction == PortDirection::Input && !usage[p.signal.index()].consumed)
        .map(|p| interner.resolve(p.name))
        .collect();
    assert!(unread.is_empty(), "unread inputs: {unread:?}");
}

#[test]
fn three_local_domains_and_one_strobe() {
    let interner = Interner::new();
    let m = build(&interner, &ClockingConfig::default());

    let local = m
        .clock_domains
        .values()
        .filter(|d| d.origin == DomainOrigin::Local)
        .count();
    assert_eq!(local, 3);

    let strobes: Vec<_> = m
        .ports
        .values()
        .filter(|p| interner.resolve(p.name).contains("strobe"))
        .collect();
    assert_eq!(strobes.len(), 1);
    assert_eq!(strobes[0].direction, PortDirection::Output);
}

#[test]
fn bufpll_gated_by_pix5x_clock_and_pll_lock() {
    let interner = Interner::new();
    let m = build(&interner, &ClockingConfig::default());
    let pll = cell(&m, &interner, "pll");
    let bufpll = cell(&m, &interner, "bufpll");

    assert_eq!(bound_to(&m, &interner, bufpll, "GCLK"), "pix5x_clk");
    assert_eq!(
        bound_to(&m, &interner, bufpll, "LOCKED"),
        bound_to(&m, &interner, pll, "LOCKED")
    );
    assert_eq!(
        bound_to(&m, &interner, bufpll, "PLLIN"),
        bound_to(&m, &interner, pll, "CLKOUT0")
    );
    assert_eq!(bound_to(&m, &interner, bufpll, "IOCLK"), "pix20x_clk");
    assert_eq!(bound_to(&m, &interner, bufpll, "LOCK"), "locked_async");
}

#[test]
fn pll_feedback_loop_and_reset() {
    let interner = Interner::new();
    let m = build(&interner, &ClockingConfig::default());
    let pll = cell(&m, &interner, "pll");
    assert_eq!(
        bound_to(&m, &interner, pll, "CLKFBOUT"),
        bound_to(&m, &interner, pll, "CLKFBIN")
    );
    assert_eq!(bound_to(&m, &interner, pll, "CLKIN"), "clkin");
    assert_eq!(bound_to(&m, &interner, pll, "RST"), "pll_reset_storage");
}

#[test]
fn global_buffers_drive_pixel_clocks() {
    let interner = Interner::new();
    let m = build(&interner, &ClockingConfig::default());
    let pll = cell(&m, &interner, "pll");
    for (buf, clkout, clk) in [("bufg_pix5x", "CLKOUT1", "pix5x_clk"), ("bufg_pix", "CLKOUT2", "pix_clk")] {
        let bufg = cell(&m, &interner, buf);
        assert_eq!(bound_to(&m, &interner, bufg, "I"), bound_to(&m, &interner, pll, clkout));
        assert_eq!(bound_to(&m, &interner, bufg, "O"), clk);
    }
}

#[test]
fn locked_csr_lags_by_synchronizer_depth() {
    for stages in [2, 3, 4] {
        let interner = Interner::new();
        let config = ClockingConfig {
            sync_stages: stages,
            ..ClockingConfig::default()
        };
        let m = build(&interner, &config);
        let mut sim = start(&m, &interner);
        assert_eq!(sim.csr_read("locked").unwrap(), 0);

        sim.poke("locked_async", 1).unwrap();
        for cycle in 1..stages {
            sim.tick("sys").unwrap();
            assert_eq!(sim.csr_read("locked").unwrap(), 0, "stages {stages}, cycle {cycle}");
        }
        sim.tick("sys").unwrap();
        assert_eq!(sim.csr_read("locked").unwrap(), 1, "stages {stages}");
        assert_eq!(sim.peek_u64("locked").unwrap(), 1);

        sim.poke("locked_async", 0).unwrap();
        for _ in 0..stages {
            sim.tick("sys").unwrap();
        }
        assert_eq!(sim.csr_read("locked").unwrap(), 0);
    }
}

#[test]
fn locked_ignores_other_domains() {
    let interner = Interner::new();
    let m = build(&interner, &ClockingConfig::default());
    let mut sim = start(&m, &interner);
    sim.poke("locked_async", 1).unwrap();
    for _ in 0..8 {
        sim.tick("pix5x").unwrap();
    }
    assert_eq!(sim.peek_u64("locked").unwrap(), 0);
}

#[test]
fn pix5x_reset_tracks_inverse_lock() {
    let interner = Interner::new();
    let m = build(&interner, &ClockingConfig::default());
    let mut sim = start(&m, &interner);

    // Unlocked: the reset asserts once the inverse lock has crossed.
    sim.tick("pix5x").unwrap();
    assert_eq!(sim.peek_u64("pix5x_rst").unwrap(), 0);
    sim.tick("pix5x").unwrap();
    assert_eq!(sim.peek_u64("pix5x_rst").unwrap(), 1);

    sim.poke("locked_async", 1).unwrap();
    sim.tick("pix5x").unwrap();
    assert_eq!(sim.peek_u64("pix5x_rst").unwrap(), 1);
    sim.tick("pix5x").unwrap();
    assert_eq!(sim.peek_u64("pix5x_rst").unwrap(), 0);
}

#[test]
fn other_domain_resets_tied_low() {
    let interner = Interner::new();
    let m = build(&interner, &ClockingConfig::default());
    let sim = start(&m, &interner);
    assert_eq!(sim.peek_u64("pix_rst").unwrap(), 0);
    assert_eq!(sim.peek_u64("pix20x_rst").unwrap(), 0);
}

#[test]
fn pll_reset_register_drives_pll() {
    let interner = Interner::new();
    let m = build(&interner, &ClockingConfig::default());
    let mut sim = start(&m, &interner);

    assert_eq!(sim.peek_u64("pll_reset_storage").unwrap(), 0);
    sim.csr_write("pll_reset", 1).unwrap();
    assert_eq!(sim.peek_u64("pll_reset_storage").unwrap(), 1);
    // Write-only fields read back as zero.
    assert_eq!(sim.csr_read("pll_reset").unwrap(), 0);
    sim.csr_write("pll_reset", 0).unwrap();
    assert_eq!(sim.peek_u64("pll_reset_storage").unwrap(), 0);
}

#[test]
fn emitted_verilog_structure() {
    let interner = Interner::new();
    let m = build(&interner, &ClockingConfig::default());
    let text = weft_verilog::emit_module(&m, &interner);

    assert!(text.contains("module clocking ("));
    assert!(text.contains("PLL_BASE #("));
    assert!(text.contains("\t.CLKIN_PERIOD(22.0),"));
    assert!(text.contains("\t.COMPENSATION(\"INTERNAL\")"));
    assert!(text.contains("BUFPLL #("));
    assert!(text.contains("\t.DIVIDE(4)"));
    assert!(text.contains("(* ASYNC_REG = \"TRUE\" *) reg locked_sync_reg1 = 1'd0;"));
    assert!(text.contains("assign locked = locked_sync_reg1;"));
    assert!(text.contains("always @(posedge pix5x_clk) begin"));
    assert!(text.contains("assign unlocked_async = ~locked_async;"));
    assert!(text.contains("1'd0: pll_reset_storage <= csr_dat_w[0];"));
    assert!(text.contains("assign csr_dat_r = (csr_adr == 1'd1) ? {7'd0, locked_status} : 8'd0;"));
}
