//! Read-only pre-flight and reporting queries: no edits, no invalidation.

use crate::ids::NetId;
use crate::parasitics::tree_length_meters;
use crate::ports::{Netlist, Steiner};

/// Non-special nets with no driver pin. Useful as a pre-flight check before
/// running any repair pass, since an undriven net can't be sized or repaired.
pub fn find_floating_nets(netlist: &dyn Netlist) -> Vec<NetId> {
    netlist
        .all_nets()
        .into_iter()
        .filter(|&net| !netlist.is_special(net) && netlist.drivers(net).is_empty())
        .collect()
}

/// The `n` longest nets by estimated Steiner wire length, longest first,
/// lengths rounded to `digits` decimal places (meters). Nets with no
/// buildable tree (fewer than two pins) are omitted.
pub fn report_long_wires(n: usize, digits: u32, netlist: &dyn Netlist, steiner: &dyn Steiner) -> Vec<(NetId, f64)> {
    let scale = 10f64.powi(digits as i32);
    let mut lengths: Vec<(NetId, f64)> = netlist
        .all_nets()
        .into_iter()
        .filter(|&net| !netlist.is_special(net))
        .filter_map(|net| {
            let tree = steiner.make_tree(net, netlist)?;
            let length = tree_length_meters(&tree, netlist);
            Some((net, (length * scale).round() / scale))
        })
        .collect();
    lengths.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    lengths.truncate(n);
    lengths
}
