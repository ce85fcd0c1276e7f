//! Hold-violation repair: inserts delay-buffer chains on the fanin side of
//! failing loads until every hold check is met (or no further progress is
//! possible without trading away setup slack the caller didn't authorize).

use aion_common::AionResult;

use crate::geometry::Point;
use crate::ids::{CellId, VertexId};
use crate::names::UniqueIndex;
use crate::ports::{MinMax, Netlist, Timer};
use crate::repeater::insert_repeater;

const MIN_BATCH: usize = 10;
const BATCH_FRACTION: f64 = 0.2;
const MAX_PASSES: u32 = 64;

/// One failing hold check, ranked for repair ordering.
#[derive(Clone, Copy, Debug)]
struct HoldFailure {
    vertex: VertexId,
    slack: f64,
    setup_gap: f64,
    level: u32,
}

fn find_hold_failures(vertices: &[VertexId], timer: &dyn Timer) -> Vec<HoldFailure> {
    vertices
        .iter()
        .filter_map(|&v| {
            let slack = timer.vertex_slack(v, MinMax::Min);
            if slack < 0.0 {
                Some(HoldFailure {
                    vertex: v,
                    slack,
                    setup_gap: timer.vertex_slack(v, MinMax::Max),
                    level: timer.level(v),
                })
            } else {
                None
            }
        })
        .collect()
}

/// Worst slack first, then most setup headroom first (safest to add delay
/// to), then lowest level first (closest to the primary inputs).
fn sort_failures(failures: &mut [HoldFailure]) {
    failures.sort_by(|a, b| {
        a.slack
            .partial_cmp(&b.slack)
            .unwrap()
            .then_with(|| b.setup_gap.partial_cmp(&a.setup_gap).unwrap())
            .then(a.level.cmp(&b.level))
    });
}

fn batch_size(failure_count: usize) -> usize {
    (failure_count as f64 * BATCH_FRACTION).ceil().max(MIN_BATCH as f64) as usize
}

/// Number of `chosen_cell` instances to chain in series to add at least
/// `needed_delay` seconds of hold margin.
///
/// Divides by `chosen_cell`'s own self-delay at `load_cap` — the delay of
/// the cell actually being inserted — never by another candidate's delay,
/// so switching which buffer is chosen can't silently change how many land
/// short of the target.
fn hold_buffer_count(needed_delay: f64, chosen_cell: CellId, load_cap: f64, timer: &dyn Timer) -> u32 {
    let self_delay = timer.buffer_delay(chosen_cell, load_cap);
    if self_delay <= 0.0 {
        return 0;
    }
    (needed_delay / self_delay).ceil().max(1.0) as u32
}

/// Picks the strongest-delay buffer among `candidates` whose chain still
/// fits within `setup_room` when `allow_setup_violations` is `false`.
fn choose_buffer(
    candidates: &[CellId],
    needed_delay: f64,
    setup_room: f64,
    allow_setup_violations: bool,
    load_cap: f64,
    timer: &dyn Timer,
) -> Option<(CellId, u32)> {
    let mut best: Option<(CellId, u32, f64)> = None;
    for &cell in candidates {
        let self_delay = timer.buffer_delay(cell, load_cap);
        if self_delay <= 0.0 {
            continue;
        }
        let count = hold_buffer_count(needed_delay, cell, load_cap, timer);
        let total_delay = self_delay * count as f64;
        if !allow_setup_violations && total_delay > setup_room {
            continue;
        }
        if best.map(|(_, _, d)| self_delay > d).unwrap_or(true) {
            best = Some((cell, count, self_delay));
        }
    }
    best.map(|(cell, count, _)| (cell, count))
}

/// Inserts a chain of `count` buffer instances between `load_pin`'s current
/// driver net and the pin itself, each buffer placed partway toward the load.
fn insert_delay_chain(
    load_pin: crate::ids::PinId,
    count: u32,
    buffer_cell: CellId,
    names: &mut UniqueIndex,
    netlist: &mut dyn Netlist,
) -> AionResult<()> {
    let Some(driver_net) = netlist.net_of(load_pin) else {
        return Ok(());
    };
    let load_loc = netlist.pin_location(load_pin);
    let driver_loc = netlist
        .drivers(driver_net)
        .first()
        .map(|&p| netlist.pin_location(p))
        .unwrap_or(load_loc);

    netlist.disconnect_pin(load_pin);

    let mut feed_net = driver_net;
    for i in 0..count {
        let fraction = (i + 1) as f64 / (count + 1) as f64;
        let loc = driver_loc.lerp(load_loc, fraction);
        let rep = insert_repeater(buffer_cell, loc, "hold", names, netlist);
        connect(rep.input, feed_net, netlist);
        let next_net_name = names.make_unique_net_name("net", netlist);
        feed_net = netlist.make_net(&next_net_name);
        connect(rep.output, feed_net, netlist);
    }

    let inst = netlist
        .instance_of_pin(load_pin)
        .ok_or_else(|| crate::error::internal_error("hold_repair::insert_delay_chain", "load pin has no owning instance"))?;
    let port = netlist.port_name(load_pin);
    netlist.connect_pin(inst, &port, feed_net);
    Ok(())
}

fn connect(pin: crate::ids::PinId, net: crate::ids::NetId, netlist: &mut dyn Netlist) {
    let inst = netlist.instance_of_pin(pin).expect("repeater pins always belong to an instance");
    let port = netlist.port_name(pin);
    netlist.connect_pin(inst, &port, net);
}

/// Repairs hold violations at `vertices` in priority batches until none
/// remain or no batch makes further progress. Returns the number of delay
/// buffers inserted.
pub fn repair_hold_violations(
    vertices: &[VertexId],
    candidate_buffers: &[CellId],
    allow_setup_violations: bool,
    names: &mut UniqueIndex,
    netlist: &mut dyn Netlist,
    timer: &mut dyn Timer,
) -> AionResult<u32> {
    let mut total_inserted = 0u32;
    let mut prev_failure_count = usize::MAX;

    for _ in 0..MAX_PASSES {
        let mut failures = find_hold_failures(vertices, timer);
        if failures.is_empty() {
            break;
        }
        if failures.len() >= prev_failure_count {
            break;
        }
        prev_failure_count = failures.len();

        sort_failures(&mut failures);
        let batch = &failures[..batch_size(failures.len()).min(failures.len())];

        for failure in batch {
            let load_pin = timer.pin_of_vertex(failure.vertex);
            let needed_delay = -failure.slack;
            let load_cap = timer.load_cap(load_pin, crate::ports::Corner(0));
            let Some((cell, count)) = choose_buffer(
                candidate_buffers,
                needed_delay,
                failure.setup_gap,
                allow_setup_violations,
                load_cap,
                timer,
            ) else {
                continue;
            };
            if count == 0 {
                continue;
            }
            insert_delay_chain(load_pin, count, cell, names, netlist)?;
            total_inserted += count;
            timer.delays_invalid();
            timer.arrivals_invalid();
        }
        timer.find_delays();
        timer.find_requireds();
    }

    Ok(total_inserted)
}
