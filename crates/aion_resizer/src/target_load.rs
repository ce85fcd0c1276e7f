//! Target-load model: per-cell target load capacitance derived from a
//! design-wide target output slew.
//!
//! Every buffer/inverter/gate in the library has one target load capacitance:
//! the load at which the cell's output slew equals the design's target slew.
//! The gate sizer ([`crate::sizer`]) picks the smallest equivalent cell whose
//! target load still covers a pin's actual load.

use std::collections::HashMap;

use crate::ids::CellId;
use crate::ports::{Netlist, Timer};

const INITIAL_LOAD_GUESS: f64 = 1.0e-12; // 1 pF
const MIN_BRACKET: f64 = 1.0e-16; // 0.1 fF
const MAX_ITERATIONS: u32 = 64;

/// The design-wide target rise/fall output slew every cell is sized against.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TargetSlews {
    /// Target rise slew, seconds.
    pub rise: f64,
    /// Target fall slew, seconds.
    pub fall: f64,
}

impl TargetSlews {
    /// The worse (larger) of the two target slews.
    pub fn worst(&self) -> f64 {
        self.rise.max(self.fall)
    }
}

/// Computes the design's target slew from a representative set of buffer
/// cells, averaging the rise/fall slew each produces at its own input
/// capacitance as a stand-in load (the conventional zero-load/self-load
/// proxy used before any real net has been sized).
pub fn compute_target_slews(buffer_cells: &[CellId], netlist: &dyn Netlist, timer: &dyn Timer) -> TargetSlews {
    if buffer_cells.is_empty() {
        return TargetSlews { rise: 0.0, fall: 0.0 };
    }
    let mut rise_sum = 0.0;
    let mut fall_sum = 0.0;
    for &cell in buffer_cells {
        let self_load = netlist
            .timing_arcs(cell)
            .iter()
            .map(|arc| arc.input_pin_cap)
            .fold(0.0_f64, f64::max);
        let (_, rise, fall) = timer.gate_delay(cell, 0.0, self_load);
        rise_sum += rise;
        fall_sum += fall;
    }
    TargetSlews {
        rise: rise_sum / buffer_cells.len() as f64,
        fall: fall_sum / buffer_cells.len() as f64,
    }
}

/// Per-cell target load capacitance table, indexed by library cell.
#[derive(Default, Debug)]
pub struct TargetLoads {
    loads: HashMap<CellId, f64>,
}

impl TargetLoads {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The target load capacitance for `cell`, or `None` if it has not been
    /// computed (e.g. a check-only or tristate-only cell).
    pub fn get(&self, cell: CellId) -> Option<f64> {
        self.loads.get(&cell).copied()
    }

    /// Computes and stores the target load for every cell in `cells` against
    /// `target_slew`, skipping cells whose only arcs are checks or tristates.
    pub fn build(&mut self, cells: &[CellId], target_slew: f64, netlist: &dyn Netlist, timer: &dyn Timer) {
        for &cell in cells {
            if let Some(load) = find_target_load(cell, target_slew, netlist, timer) {
                self.loads.insert(cell, load);
            }
        }
    }
}

/// Bisection search for the load capacitance at which `cell`'s output slew
/// equals `target_slew`. Starts the bracket at 1pF, expanding or halving it
/// until the bracket narrows below 0.1fF or the slew estimate stabilizes.
fn find_target_load(cell: CellId, target_slew: f64, netlist: &dyn Netlist, timer: &dyn Timer) -> Option<f64> {
    let arcs = netlist.timing_arcs(cell);
    if arcs.iter().all(|a| a.is_check || a.is_tristate) {
        return None;
    }
    if target_slew <= 0.0 {
        return Some(0.0);
    }

    let slew_at = |load_cap: f64| -> f64 {
        let (_, rise, fall) = timer.gate_delay(cell, 0.0, load_cap);
        rise.max(fall)
    };

    let mut high = INITIAL_LOAD_GUESS;
    while slew_at(high) < target_slew && high < 1.0 {
        high *= 2.0;
    }
    while slew_at(high) > target_slew {
        high /= 2.0;
        if high < MIN_BRACKET {
            return Some(0.0);
        }
    }
    let mut low = high;
    high *= 2.0;

    let mut prev_mid = f64::NAN;
    for _ in 0..MAX_ITERATIONS {
        if high - low < MIN_BRACKET {
            break;
        }
        let mid = (low + high) / 2.0;
        if (mid - prev_mid).abs() < MIN_BRACKET {
            break;
        }
        prev_mid = mid;
        if slew_at(mid) < target_slew {
            low = mid;
        } else {
            high = mid;
        }
    }
    Some(low)
}

#[cfg(test)]
impl TargetLoads {
    /// Installs an exact target load for `cell`, bypassing bisection.
    /// Lets tests of downstream consumers (the gate sizer) exercise the
    /// tie-break rule against known values instead of a bisection result.
    pub(crate) fn set_for_test(&mut self, cell: CellId, load: f64) {
        self.loads.insert(cell, load);
    }
}
