//! All built-in lint rule implementations.

mod c101;
mod e101;
mod e102;
mod e103;
mod e104;
mod w101;
mod w102;

pub use c101::InvalidDomain;
pub use e101::UndrivenSignal;
pub use e102::MultipleDrivers;
pub use e103::BadConnection;
pub use e104::CsrMapConflict;
pub use w101::UnusedSignal;
pub use w102::WidthMismatch;

use crate::LintEngine;

/// Registers all built-in lint rules with the engine.
pub fn register_builtin_rules(engine: &mut LintEngine) {
    engine.register(Box::new(UnusedSignal));
    engine.register(Box::new(WidthMismatch));
    engine.register(Box::new(UndrivenSignal));
    engine.register(Box::new(MultipleDrivers));
    engine.register(Box::new(BadConnection));
    engine.register(Box::new(CsrMapConflict));
    engine.register(Box::new(InvalidDomain));
}
