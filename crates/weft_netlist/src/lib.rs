//! Structural netlist IR and the builder used to construct it.
//!
//! A [`Module`] is a frozen object graph of [`Signal`]s, [`Port`]s,
//! [`Cell`]s (external instances, tristate pads and synchronizers),
//! combinational [`Assignment`]s, [`ClockDomain`]s and [`CsrField`]
//! descriptors. Modules are only ever produced by [`ModuleBuilder::finish`]
//! and are never mutated afterwards.

#![warn(missing_docs)]

pub mod arena;
pub mod builder;
pub mod cell;
pub mod clock;
pub mod const_value;
pub mod csr;
pub mod error;
pub mod expr;
pub mod ids;
pub mod module;
pub mod port;
pub mod signal;

pub use arena::{Arena, ArenaId};
pub use builder::{InstanceBuilder, ModuleBuilder, CSR_DOMAIN};
pub use cell::{Cell, CellKind, Connection};
pub use clock::{ClockDomain, DomainOrigin};
pub use const_value::ConstValue;
pub use csr::{CsrAccess, CsrBus, CsrField, CSR_DATA_WIDTH};
pub use error::BuildError;
pub use expr::Expr;
pub use ids::{CellId, ClockDomainId, PortId, SignalId};
pub use module::{Assignment, Module};
pub use port::{Port, PortDirection};
pub use signal::{Signal, SignalKind, SignalRef};
