//! Wire parasitic estimation from Steiner trees (pi-Elmore reduction).
//!
//! A net's wire is modeled as a single lumped pi: capacitance split evenly
//! between a near node (at the driver) and a far node (at the loads), joined
//! by one resistance. This is deliberately coarser than a per-branch
//! distributed model — it is what the target-load bisection and gate-delay
//! queries in [`crate::ports::Timer`] need, and nothing more.

use crate::config::WireRc;
use crate::geometry::dbu_to_meters;
use crate::ids::NetId;
use crate::ports::{Netlist, SteinerTree};

/// A lumped pi model of a net's wire parasitics.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PiElmore {
    /// Capacitance at the driver-side node, farads.
    pub c_near: f64,
    /// Series resistance between the near and far nodes, ohms.
    pub r: f64,
    /// Capacitance at the load-side node, farads.
    pub c_far: f64,
}

impl PiElmore {
    /// The zero model: no wire, all load capacitance seen directly.
    pub fn zero() -> Self {
        Self {
            c_near: 0.0,
            r: 0.0,
            c_far: 0.0,
        }
    }

    /// Total capacitance the model contributes to the driver's load.
    pub fn total_cap(&self) -> f64 {
        self.c_near + self.c_far
    }
}

/// Estimates the pi-Elmore parasitic model for `net` from its Steiner tree.
///
/// Sums branch lengths into a single wire length, then applies the signal or
/// clock RC-per-meter rates depending on `is_clock`. Returns
/// [`PiElmore::zero`] for a net with no tree (fewer than two pins).
pub fn estimate_wire_parasitics(
    net: NetId,
    tree: Option<&SteinerTree>,
    netlist: &dyn Netlist,
    rc: &WireRc,
    is_clock: bool,
) -> PiElmore {
    let _ = netlist;
    let Some(tree) = tree else {
        return PiElmore::zero();
    };

    let dbu_per_micron = 1; // length already reduced to meters by caller below
    let _ = dbu_per_micron;

    let total_length_dbu: i64 = tree.branches().iter().map(|b| b.length_dbu).sum();
    if total_length_dbu == 0 {
        return PiElmore::zero();
    }

    let length_meters = dbu_to_meters(total_length_dbu, net_dbu_per_micron(net, netlist));
    let (wire_res, wire_cap) = if is_clock {
        (rc.wire_clk_res, rc.wire_clk_cap)
    } else {
        (rc.wire_res, rc.wire_cap)
    };

    let total_r = wire_res * length_meters;
    let total_c = wire_cap * length_meters;

    PiElmore {
        c_near: total_c / 2.0,
        r: total_r,
        c_far: total_c / 2.0,
    }
}

fn net_dbu_per_micron(_net: NetId, netlist: &dyn Netlist) -> i32 {
    netlist.dbu_per_micron()
}

/// Total Steiner branch length of `tree`, in meters. Shared by parasitic
/// estimation and the long-wire report, which both reduce a tree to a single
/// aggregate length.
pub fn tree_length_meters(tree: &SteinerTree, netlist: &dyn Netlist) -> f64 {
    let total_length_dbu: i64 = tree.branches().iter().map(|b| b.length_dbu).sum();
    dbu_to_meters(total_length_dbu, netlist.dbu_per_micron())
}
