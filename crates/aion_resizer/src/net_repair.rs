//! Net repair: inserts repeaters along a Steiner tree to fix long wires,
//! excess downstream capacitance, slow slew, and fanout overload.
//!
//! The tree is walked iteratively with an explicit work stack rather than by
//! recursion — a Steiner tree can have as many points as a net has loads,
//! and an unbounded design shouldn't risk blowing the call stack to repair
//! one net.

use std::collections::HashMap;

use aion_common::AionResult;

use crate::geometry::Point;
use crate::ids::{CellId, SteinerPtId};
use crate::names::UniqueIndex;
use crate::ports::{Netlist, SteinerTree, Timer};
use crate::repeater::insert_repeater;

/// Margin subtracted from the limit-driven buffer placement fraction so a
/// repeater lands slightly before the point where the limit would be
/// exceeded, rather than exactly on it.
const PLACEMENT_MARGIN: f64 = 0.05;

/// The limits a net repair pass is driving towards.
///
/// `max_slew` is enforced only at the top of the walk (whether a net needs
/// repair at all) — once a repeater has been inserted to fix length, cap, or
/// fanout, the new driver's own slew is whatever its resize pass makes it.
/// Length, cap, and fanout are enforced per edge as the tree is walked, so
/// that on return every contiguous segment satisfies all three at once.
#[derive(Clone, Copy, Debug)]
pub struct NetRepairLimits {
    /// Longest a wire segment between repeaters may be, in DBU.
    pub max_length_dbu: i64,
    /// Largest downstream capacitance a driver may see, farads.
    pub max_cap: f64,
    /// Largest number of load pins a driver may see downstream before the
    /// tree must be split by a repeater, or `u32::MAX` for no limit.
    pub max_fanout: u32,
    /// Slew limit used only to decide whether a net needs repair at all
    /// (checked by the caller against TIMER before calling [`repair_net`]),
    /// farads. Not itself enforced inside the per-edge walk.
    pub max_slew: f64,
    /// Wire capacitance per DBU of length, farads (signal or clock rate,
    /// chosen by the caller before calling [`repair_net`]).
    pub wire_cap_per_dbu: f64,
}

#[derive(Clone, Copy, Default)]
struct Accum {
    length_dbu: i64,
    cap: f64,
    fanout: u32,
}

/// Computes the fraction along a parent-to-child edge (measured from the
/// child end) at which a repeater should land to keep the parent-side
/// segment within `limits`, given the accumulated length/cap already beyond
/// the child.
///
/// `margin` shrinks the fraction so the repeater lands a little early rather
/// than exactly at the limit.
fn buf_dist(edge_length_dbu: i64, child_accum: Accum, limits: &NetRepairLimits) -> f64 {
    if edge_length_dbu == 0 {
        return 0.0;
    }
    let length_budget = (limits.max_length_dbu - child_accum.length_dbu).max(0) as f64;
    let cap_budget_dbu = if limits.wire_cap_per_dbu > 0.0 {
        ((limits.max_cap - child_accum.cap) / limits.wire_cap_per_dbu).max(0.0)
    } else {
        f64::INFINITY
    };
    let budget_dbu = length_budget.min(cap_budget_dbu);
    let fraction = (budget_dbu / edge_length_dbu as f64) * (1.0 - PLACEMENT_MARGIN);
    fraction.clamp(0.0, 1.0)
}

/// Post-orders a tree's points (children before parents) using an explicit
/// two-stack traversal, never recursing.
fn postorder(tree: &SteinerTree, root: SteinerPtId) -> Vec<SteinerPtId> {
    let mut to_visit = vec![root];
    let mut visited_order = Vec::new();
    while let Some(pt) = to_visit.pop() {
        visited_order.push(pt);
        for &(child, _) in tree.children(pt) {
            to_visit.push(child);
        }
    }
    visited_order.into_iter().rev().collect()
}

/// Walks `tree`'s points from leaves to the driver, inserting `buffer_cell`
/// instances wherever the accumulated wire length, capacitance, or fanout
/// since the last repeater (or leaf) would exceed `limits` on the edge
/// toward the parent. A single edge far longer than the budget gets as many
/// repeaters chained in series as it takes to bring every contiguous segment
/// back within `limits`. Returns the number of repeaters inserted.
pub fn repair_net(
    tree: &SteinerTree,
    limits: &NetRepairLimits,
    buffer_cell: CellId,
    names: &mut UniqueIndex,
    netlist: &mut dyn Netlist,
    timer: &mut dyn Timer,
) -> AionResult<u32> {
    let Some(root) = tree.root() else {
        return Ok(0);
    };
    let order = postorder(tree, root);
    let mut accum: HashMap<SteinerPtId, Accum> = HashMap::new();
    let mut inserted = 0u32;

    for pt in order {
        let mut here = Accum::default();
        if let Some(pin) = tree.pin(pt) {
            if netlist.is_load_pin(pin) {
                here.cap += netlist.input_pin_capacitance(pin);
                here.fanout += 1;
            }
        }

        for &(child, edge_len) in tree.children(pt) {
            let child_accum = *accum.get(&child).unwrap_or(&Accum::default());
            let pt_loc = tree.location(pt);
            let child_pin = tree.pin(child);
            let is_driver_side = child_pin.map(|p| netlist.is_driver_pin(p)).unwrap_or(false);

            let mut cursor_loc = tree.location(child);
            let mut cursor_accum = child_accum;
            let mut remaining_edge = edge_len;
            let mut feed_net = child_pin.and_then(|p| netlist.net_of(p));
            let mut disconnected = false;
            let mut repeaters_here = 0u32;

            loop {
                let edge_cap = limits.wire_cap_per_dbu * remaining_edge as f64;
                let would_be = Accum {
                    length_dbu: cursor_accum.length_dbu + remaining_edge,
                    cap: cursor_accum.cap + edge_cap,
                    fanout: cursor_accum.fanout,
                };
                let exceeds_length = would_be.length_dbu > limits.max_length_dbu;
                let exceeds_cap = limits.max_cap.is_finite() && would_be.cap > limits.max_cap;
                let exceeds_fanout = would_be.fanout > limits.max_fanout;
                if !(exceeds_length || exceeds_cap || exceeds_fanout) {
                    here.length_dbu = here.length_dbu.max(would_be.length_dbu);
                    here.cap += would_be.cap;
                    here.fanout += would_be.fanout;
                    break;
                }

                // A pure fanout violation has no wire-length component to
                // place against, so the split lands right at the child —
                // everything below is now fed by the new repeater instead.
                let fraction = if exceeds_fanout && !exceeds_length && !exceeds_cap {
                    0.0
                } else {
                    buf_dist(remaining_edge, cursor_accum, limits)
                };
                let buf_loc = cursor_loc.lerp(pt_loc, fraction);
                let rep = insert_repeater(buffer_cell, buf_loc, "repeater", names, netlist);

                if let Some(net) = feed_net {
                    if !is_driver_side && !disconnected {
                        netlist.disconnect_pin(child_pin.unwrap());
                        disconnected = true;
                    }
                    connect(rep.input, net, netlist);
                    let new_net_name = names.make_unique_net_name("net", netlist);
                    let new_net = netlist.make_net(&new_net_name);
                    connect(rep.output, new_net, netlist);
                    feed_net = Some(new_net);
                }

                inserted += 1;
                repeaters_here += 1;
                timer.delays_invalid();
                timer.arrivals_invalid();

                // Past this point the repeater just inserted is the only
                // thing the parent side of the edge can see — its own input
                // pin is one load, not however many real sinks sit behind it.
                let dist_to_buf = Point::manhattan(cursor_loc, buf_loc);
                if dist_to_buf <= 0 {
                    // A degenerate budget (e.g. max_length_dbu <= 0, or a
                    // max_fanout a single repeater can't satisfy) would
                    // otherwise place every further repeater at the same
                    // point forever; stop chaining and let the remainder
                    // stand as-is rather than loop without bound.
                    here.length_dbu = here.length_dbu.max(remaining_edge);
                    here.cap += limits.wire_cap_per_dbu * remaining_edge as f64;
                    here.fanout += 1;
                    break;
                }
                remaining_edge -= dist_to_buf;
                cursor_loc = buf_loc;
                cursor_accum = Accum {
                    length_dbu: 0,
                    cap: 0.0,
                    fanout: 1,
                };
            }

            if repeaters_here > 0 && !is_driver_side {
                if let (Some(p), Some(net)) = (child_pin, feed_net) {
                    let inst = netlist
                        .instance_of_pin(p)
                        .ok_or_else(|| crate::error::internal_error("net_repair::reconnect_load", "load pin has no owning instance"))?;
                    let port = netlist.port_name(p);
                    netlist.connect_pin(inst, &port, net);
                }
            }
        }

        accum.insert(pt, here);
    }

    Ok(inserted)
}

fn connect(pin: crate::ids::PinId, net: crate::ids::NetId, netlist: &mut dyn Netlist) {
    let inst = netlist.instance_of_pin(pin).expect("repeater pins always belong to an instance");
    let port = netlist.port_name(pin);
    netlist.connect_pin(inst, &port, net);
}
