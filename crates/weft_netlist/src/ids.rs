//! Typed indices into a module's arenas.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_ids {
    ($($(#[$meta:meta])* $name:ident => $tag:literal;)*) => {$(
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a raw index. Only meaningful for the arena that issued it.
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// The raw index.
            pub const fn as_raw(self) -> u32 {
                self.0
            }

            /// The index as a `usize`, for side tables parallel to the arena.
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl ArenaId for $name {
            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "{}"), self.0)
            }
        }
    )*};
}

entity_ids! {
    /// A signal in one module.
    SignalId => "sig";
    /// A port on a module boundary.
    PortId => "port";
    /// An instance, tristate pad or synchronizer.
    CellId => "cell";
    /// A clock domain known to a module.
    ClockDomainId => "cd";
}
