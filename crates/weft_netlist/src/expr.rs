//! Combinational expressions used on the right-hand side of assignments.

use crate::signal::SignalRef;
use serde::{Deserialize, Serialize};

/// A bitwise combinational expression.
///
/// Structural modules only ever need glue such as `rst | reset` or
/// `~locked`, so the operator set is kept to bitwise logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A signal, part of a signal, or a constant.
    Ref(SignalRef),
    /// Bitwise NOT.
    Not(Box<Expr>),
    /// Bitwise AND.
    And(Box<Expr>, Box<Expr>),
    /// Bitwise OR.
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Wraps a signal reference.
    pub fn signal(r: impl Into<SignalRef>) -> Self {
        Expr::Ref(r.into())
    }

    /// Returns `!self`.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    /// Returns `self & rhs`.
    pub fn and(self, rhs: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(rhs))
    }

    /// Returns `self | rhs`.
    pub fn or(self, rhs: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(rhs))
    }

    /// Calls `f` for every signal reference in the expression, left to right.
    pub fn for_each_ref(&self, f: &mut impl FnMut(&SignalRef)) {
        match self {
            Expr::Ref(r) => f(r),
            Expr::Not(e) => e.for_each_ref(f),
            Expr::And(a, b) | Expr::Or(a, b) => {
                a.for_each_ref(f);
                b.for_each_ref(f);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SignalId;

    #[test]
    fn builder_shapes() {
        let a = Expr::signal(SignalId::from_raw(0));
        let b = Expr::signal(SignalId::from_raw(1));
        let e = a.clone().or(b.clone()).not();
        match e {
            Expr::Not(inner) => assert_eq!(*inner, Expr::Or(Box::new(a), Box::new(b))),
            other => panic!("expected Not, got {other:?}"),
        }
    }

    #[test]
    fn for_each_ref_visits_all() {
        let e = Expr::signal(SignalId::from_raw(0))
            .and(Expr::signal(SignalId::from_raw(1)).not());
        let mut seen = Vec::new();
        e.for_each_ref(&mut |r| seen.push(r.signal()));
        assert_eq!(
            seen,
            vec![Some(SignalId::from_raw(0)), Some(SignalId::from_raw(1))]
        );
    }
}
