//! Wishbone bus interfaces.

use weft_netlist::{BuildError, ModuleBuilder, SignalId};

/// Width of the word address.
pub const ADR_WIDTH: u32 = 30;
/// Width of the data buses.
pub const DATA_WIDTH: u32 = 32;
/// Width of the byte-select lane mask.
pub const SEL_WIDTH: u32 = DATA_WIDTH / 8;

/// The signals of one classic Wishbone interface.
///
/// Signal names follow the master's point of view: `dat_w` carries write
/// data out, `dat_r` carries read data back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wishbone {
    /// Word address.
    pub adr: SignalId,
    /// Write data.
    pub dat_w: SignalId,
    /// Read data.
    pub dat_r: SignalId,
    /// Byte lane select.
    pub sel: SignalId,
    /// Cycle in progress.
    pub cyc: SignalId,
    /// Strobe.
    pub stb: SignalId,
    /// Acknowledge.
    pub ack: SignalId,
    /// Write enable.
    pub we: SignalId,
}

impl Wishbone {
    /// Declares a master interface on the module boundary.
    ///
    /// Ports are named `<prefix>_<signal>`. Everything is an output except
    /// `dat_r` and `ack`.
    pub fn master(builder: &mut ModuleBuilder<'_>, prefix: &str) -> Result<Self, BuildError> {
        Ok(Self {
            adr: builder.output(&format!("{prefix}_adr"), ADR_WIDTH)?,
            dat_w: builder.output(&format!("{prefix}_dat_w"), DATA_WIDTH)?,
            dat_r: builder.input(&format!("{prefix}_dat_r"), DATA_WIDTH)?,
            sel: builder.output(&format!("{prefix}_sel"), SEL_WIDTH)?,
            cyc: builder.output(&format!("{prefix}_cyc"), 1)?,
            stb: builder.output(&format!("{prefix}_stb"), 1)?,
            ack: builder.input(&format!("{prefix}_ack"), 1)?,
            we: builder.output(&format!("{prefix}_we"), 1)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_common::Interner;
    use weft_netlist::PortDirection;

    #[test]
    fn master_port_directions() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let bus = Wishbone::master(&mut b, "ibus").unwrap();
        let m = b.finish().unwrap();

        let dir = |name: &str| {
            m.find_port(interner.get_or_intern(name))
                .map(|p| p.direction)
                .unwrap()
        };
        assert_eq!(dir("ibus_adr"), PortDirection::Output);
        assert_eq!(dir("ibus_dat_r"), PortDirection::Input);
        assert_eq!(dir("ibus_ack"), PortDirection::Input);
        assert_eq!(dir("ibus_we"), PortDirection::Output);
        assert_eq!(m.signals[bus.adr].width, ADR_WIDTH);
        assert_eq!(m.signals[bus.sel].width, 4);
    }

    #[test]
    fn prefix_collision_rejected() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        Wishbone::master(&mut b, "ibus").unwrap();
        assert!(matches!(
            Wishbone::master(&mut b, "ibus"),
            Err(BuildError::DuplicateName(_))
        ));
    }
}
