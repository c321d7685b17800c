//! 4-state expression evaluation and net resolution.
//!
//! Nets are resolved bitwise the way a wired net is: `z` yields to any other
//! value, equal values agree, and conflicting values become `x`.

use weft_common::{Logic, LogicVec};
use weft_netlist::{Expr, Module, SignalRef};

/// Resolves two contributions to the same bit.
pub fn resolve_bit(a: Logic, b: Logic) -> Logic {
    match (a, b) {
        (Logic::Z, v) | (v, Logic::Z) => v,
        (a, b) if a == b => a,
        _ => Logic::X,
    }
}

/// Zero-extends or truncates `v` to `width` bits.
pub fn fit(v: &LogicVec, width: u32) -> LogicVec {
    LogicVec::from_bits(
        (0..width)
            .map(|i| if i < v.width() { v.get(i) } else { Logic::Zero })
            .collect(),
    )
}

/// Reads a signal reference from the current net values.
pub fn read_ref(values: &[LogicVec], r: &SignalRef) -> LogicVec {
    match r {
        SignalRef::Signal(id) => values[id.index()].clone(),
        SignalRef::Bit { signal, index } => {
            LogicVec::from_bits(vec![values[signal.index()].get(*index)])
        }
        SignalRef::Slice { signal, high, low } => {
            let v = &values[signal.index()];
            LogicVec::from_bits((*low..=*high).map(|i| v.get(i)).collect())
        }
        SignalRef::Const(v) => v.clone(),
    }
}

/// Resolves `value` into the bits of `next` covered by `r`.
///
/// The value is zero-extended or truncated to the width of the reference.
/// Constants are not writable and are ignored.
pub fn drive_ref(module: &Module, next: &mut [LogicVec], r: &SignalRef, value: &LogicVec) {
    let Some(id) = r.signal() else { return };
    let width = module.signals[id].width;
    let target = &mut next[id.index()];
    for (k, bit) in r.bits(width).enumerate() {
        let k = k as u32;
        let v = if k < value.width() { value.get(k) } else { Logic::Zero };
        target.set(bit, resolve_bit(target.get(bit), v));
    }
}

/// Evaluates a bitwise expression.
///
/// Operands of different widths are zero-extended to the wider one.
pub fn eval_expr(values: &[LogicVec], expr: &Expr) -> LogicVec {
    match expr {
        Expr::Ref(r) => read_ref(values, r),
        Expr::Not(inner) => eval_expr(values, inner).map(|b| !b),
        Expr::And(a, b) => binary(values, a, b, |x, y| x & y),
        Expr::Or(a, b) => binary(values, a, b, |x, y| x | y),
    }
}

fn binary(values: &[LogicVec], a: &Expr, b: &Expr, f: impl Fn(Logic, Logic) -> Logic) -> LogicVec {
    let (a, b) = (eval_expr(values, a), eval_expr(values, b));
    let width = a.width().max(b.width());
    fit(&a, width).zip_with(&fit(&b, width), f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_common::Interner;
    use weft_netlist::{ModuleBuilder, SignalId};

    #[test]
    fn resolution_table() {
        assert_eq!(resolve_bit(Logic::Z, Logic::One), Logic::One);
        assert_eq!(resolve_bit(Logic::Zero, Logic::Z), Logic::Zero);
        assert_eq!(resolve_bit(Logic::One, Logic::One), Logic::One);
        assert_eq!(resolve_bit(Logic::One, Logic::Zero), Logic::X);
        assert_eq!(resolve_bit(Logic::Z, Logic::Z), Logic::Z);
    }

    #[test]
    fn fit_extends_and_truncates() {
        let v = LogicVec::from_u64(0b101, 3);
        assert_eq!(fit(&v, 5).to_u64(), Some(0b101));
        assert_eq!(fit(&v, 2).to_u64(), Some(0b01));
    }

    #[test]
    fn eval_or_of_not() {
        let values = vec![LogicVec::from_u64(0b01, 2), LogicVec::from_u64(0b10, 2)];
        let e = Expr::signal(SignalId::from_raw(0))
            .not()
            .or(Expr::signal(SignalId::from_raw(1)));
        assert_eq!(eval_expr(&values, &e).to_u64(), Some(0b10));
    }

    #[test]
    fn unknown_propagates_through_not() {
        let values = vec![LogicVec::from_bits(vec![Logic::Z])];
        let e = Expr::signal(SignalId::from_raw(0)).not();
        assert_eq!(eval_expr(&values, &e).get(0), Logic::X);
    }

    #[test]
    fn read_slices_and_bits() {
        let values = vec![LogicVec::from_u64(0xA5, 8)];
        let id = SignalId::from_raw(0);
        let slice = SignalRef::Slice {
            signal: id,
            high: 7,
            low: 4,
        };
        assert_eq!(read_ref(&values, &slice).to_u64(), Some(0xA));
        let bit = SignalRef::Bit { signal: id, index: 0 };
        assert_eq!(read_ref(&values, &bit).get(0), Logic::One);
    }

    #[test]
    fn drive_ref_resolves_conflicts() {
        let interner = Interner::new();
        let mut b = ModuleBuilder::new(&interner, "top");
        let w = b.wire("w", 2).unwrap();
        let m = b.finish().unwrap();

        let mut next = vec![LogicVec::filled(2, Logic::Z)];
        drive_ref(&m, &mut next, &SignalRef::Signal(w), &LogicVec::from_u64(0b01, 2));
        assert_eq!(next[0].to_u64(), Some(0b01));
        drive_ref(
            &m,
            &mut next,
            &SignalRef::Bit { signal: w, index: 0 },
            &LogicVec::from_u64(0, 1),
        );
        assert_eq!(next[0].get(0), Logic::X);
        assert_eq!(next[0].get(1), Logic::Zero);
    }
}
