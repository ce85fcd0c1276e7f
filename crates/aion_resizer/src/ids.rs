//! Opaque ID newtypes for netlist and timing-graph entities owned by the
//! external NETLIST/TIMER services.
//!
//! The CORE never holds a long-lived reference into service state, only these
//! thin `u32` handles. See [`crate::ports`] for the service traits that accept
//! and return them.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a library cell (master).
    CellId
);

define_id!(
    /// Opaque, copyable ID for a placed instance of a cell.
    InstanceId
);

define_id!(
    /// Opaque, copyable ID for a net.
    NetId
);

define_id!(
    /// Opaque, copyable ID for a pin: either an instance port or a top-level port.
    PinId
);

define_id!(
    /// Opaque, copyable ID for a driver vertex in the timing graph.
    VertexId
);

define_id!(
    /// Opaque, copyable ID for a point in a Steiner tree (pin or added Steiner point).
    SteinerPtId
);
