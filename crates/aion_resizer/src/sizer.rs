//! Gate sizing: equivalent-cell substitution driven by the target-load model.
//!
//! Drivers are resized in reverse level order (primary-output-side first) so
//! that by the time a gate is sized, every gate it drives already reflects
//! its final input capacitance.

use std::collections::HashSet;

use crate::ids::{CellId, InstanceId, PinId};
use crate::ports::{Corner, Netlist, Timer};
use crate::target_load::TargetLoads;

/// Tracks which instances have already been resized during the current pass,
/// so a multi-output cell isn't swapped twice when two of its outputs are
/// visited on different nets.
#[derive(Default, Debug)]
pub struct ResizedMultiOutputSet {
    resized: HashSet<InstanceId>,
}

impl ResizedMultiOutputSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if `inst` has already been resized this pass.
    pub fn contains(&self, inst: InstanceId) -> bool {
        self.resized.contains(&inst)
    }

    /// Records that `inst` has been resized.
    pub fn mark(&mut self, inst: InstanceId) {
        self.resized.insert(inst);
    }
}

/// Excludes `dont_use` library cells from a candidate list, by name.
pub fn filter_dont_use(candidates: Vec<CellId>, dont_use: &[String], netlist: &dyn Netlist) -> Vec<CellId> {
    candidates
        .into_iter()
        .filter(|&c| !dont_use.iter().any(|name| name == &netlist.cell_name(c)))
        .collect()
}

/// `min(target, load_cap) / max(target, load_cap)`, the closeness of a
/// cell's target load to the load it actually sees. `1.0` is a perfect match.
fn load_match_ratio(target: f64, load_cap: f64) -> f64 {
    if target <= 0.0 && load_cap <= 0.0 {
        return 1.0;
    }
    let (lo, hi) = if target < load_cap { (target, load_cap) } else { (load_cap, target) };
    if hi <= 0.0 {
        0.0
    } else {
        lo / hi
    }
}

/// Picks the best equivalent cell for `current` given the actual load it
/// must drive.
///
/// Scans every candidate, tracking the best ratio/delay pair seen so far.
/// For buffers and inverters, a candidate wins either by beating the best
/// delay while staying within 90% of the best ratio, or by beating the best
/// ratio while staying within 110% of the best delay — tolerating a slightly
/// worse load match to avoid picking a "delay buffer" (a footprint-equivalent
/// cell with extra intrinsic delay). Other cells are chosen by ratio alone,
/// since they have no meaningful self-delay at a bare load. When
/// `allow_downsize` is `false`, only candidates whose target load exceeds
/// the current best's are considered at all.
pub fn choose_cell(
    current: CellId,
    candidates: &[CellId],
    load_cap: f64,
    target_loads: &TargetLoads,
    allow_downsize: bool,
    netlist: &dyn Netlist,
    timer: &dyn Timer,
) -> CellId {
    let Some(current_t) = target_loads.get(current) else {
        return current;
    };
    let is_buffer_like = netlist.is_buffer(current) || netlist.is_inverter(current);
    let cell_delay = |c: CellId| -> f64 {
        if is_buffer_like {
            timer.buffer_delay(c, load_cap)
        } else {
            0.0
        }
    };

    let mut best = current;
    let mut best_t = current_t;
    let mut best_ratio = load_match_ratio(current_t, load_cap);
    let mut best_delay = cell_delay(current);

    for &cand in candidates {
        if cand == current {
            continue;
        }
        let Some(t_e) = target_loads.get(cand) else {
            continue;
        };
        if !allow_downsize && t_e <= best_t {
            continue;
        }
        let ratio_e = load_match_ratio(t_e, load_cap);
        let delay_e = cell_delay(cand);

        let prefer = if is_buffer_like {
            (delay_e < best_delay && ratio_e > 0.9 * best_ratio) || (ratio_e > best_ratio && delay_e < 1.1 * best_delay)
        } else {
            ratio_e > best_ratio
        };
        if prefer {
            best = cand;
            best_t = t_e;
            best_ratio = ratio_e;
            best_delay = delay_e;
        }
    }
    best
}

/// Resizes the instance driving `driver_pin`, if a strictly better
/// equivalent cell is found.
///
/// The first time an instance is visited this pass, any equivalent cell may
/// be chosen, including a smaller one. On a later visit through another
/// output pin of the same (multi-output) instance, downsizing is disabled —
/// only a cell with a strictly larger target load than the one already
/// chosen may replace it — so two outputs disagreeing on the ideal size
/// can't oscillate the instance back and forth.
///
/// Returns `true` if the instance's cell changed.
pub fn resize_driver(
    driver_pin: PinId,
    dont_use: &[String],
    target_loads: &TargetLoads,
    corner: Corner,
    netlist: &mut dyn Netlist,
    timer: &mut dyn Timer,
    resized: &mut ResizedMultiOutputSet,
) -> bool {
    let Some(inst) = netlist.instance_of_pin(driver_pin) else {
        return false;
    };
    let allow_downsize = !resized.contains(inst);
    resized.mark(inst);

    let current = netlist.cell_of_instance(inst);
    let mut candidates = timer.equiv_cells(current);
    if !candidates.contains(&current) {
        candidates.push(current);
    }
    candidates = filter_dont_use(candidates, dont_use, netlist);
    if candidates.is_empty() {
        return false;
    }

    let load_cap = timer.load_cap(driver_pin, corner);
    let best = choose_cell(current, &candidates, load_cap, target_loads, allow_downsize, netlist, timer);

    if best == current {
        return false;
    }
    netlist.replace_cell(inst, best);
    timer.delays_invalid();
    true
}
