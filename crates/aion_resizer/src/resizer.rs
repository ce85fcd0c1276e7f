//! The orchestrator: owns CORE state that spans a whole resizing run and
//! exposes one entry point per repair phase.
//!
//! Each entry point takes the services it needs as trait objects and returns
//! a typed summary; callers compose phases in whatever order their flow
//! requires (the usual order is parasitics, then port buffering, tie
//! fanout, sizing, net repair, hold repair, clock inverter cloning).

use aion_common::AionResult;
use aion_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use aion_source::Span;

use crate::config::ResizerConfig;
use crate::ids::{CellId, NetId, PinId, VertexId};
use crate::names::UniqueIndex;
use crate::parasitics::{estimate_wire_parasitics, tree_length_meters};
use crate::ports::{Corner, Netlist, Steiner, Timer};
use crate::{clock_clone, hold_repair, net_repair, port_buffer, queries, sizer, target_load, tie_fanout};

/// Running counters the orchestrator accumulates across a resizing run,
/// the typed equivalent of the textual summary a human-facing report would
/// print.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Counters {
    /// Buffers inserted by port buffering, net repair, and hold repair combined.
    pub inserted_buffer_count: u32,
    /// Instances whose library cell was swapped by the gate sizer.
    pub resize_count: u32,
    /// Tie cells inserted by tie fanout repair.
    pub inserted_tie_count: u32,
    /// Clock inverters inserted by clock inverter cloning.
    pub cloned_inverter_count: u32,
    /// Total design area, in library area units, as of the last phase that
    /// refreshed it.
    pub design_area: f64,
    /// Maximum design area the configured utilization allows, or
    /// `f64::INFINITY` if the design has no floorplan.
    pub max_area: f64,
}

/// The gate sizing, buffer insertion, and timing repair CORE.
///
/// Holds no long-lived reference to a netlist, timer, or Steiner service —
/// every entry point takes them as parameters for the duration of one call.
pub struct Resizer {
    config: ResizerConfig,
    names: UniqueIndex,
    target_slews: target_load::TargetSlews,
    target_loads: target_load::TargetLoads,
    counters: Counters,
    have_estimated_parasitics: bool,
    diagnostics: DiagnosticSink,
}

const DIAG_MAX_UTILIZATION: DiagnosticCode = DiagnosticCode::new(Category::Timing, 1);
const DIAG_PARASITICS_STALE: DiagnosticCode = DiagnosticCode::new(Category::Timing, 2);

/// Converts a length in meters to DBU, saturating at `i64::MAX` for an
/// unbounded (`f64::INFINITY`) input rather than overflowing.
fn meters_to_dbu(meters: f64, dbu_per_micron: f64) -> i64 {
    if !meters.is_finite() {
        return i64::MAX;
    }
    (meters * 1.0e6 * dbu_per_micron).round() as i64
}

/// Converts a `LimitCheck::limit` fanout count to the `u32` net repair wants,
/// treating an unbounded or nonsensical limit as no limit at all.
fn fanout_limit_to_u32(limit: f64) -> u32 {
    if !limit.is_finite() || limit < 0.0 {
        u32::MAX
    } else {
        limit.round() as u32
    }
}

impl Resizer {
    /// Creates a CORE instance with the given configuration. `max_area` is
    /// left unset until the first call that can see the netlist's core area.
    pub fn new(config: ResizerConfig) -> Self {
        Self {
            config,
            names: UniqueIndex::new(),
            target_slews: target_load::TargetSlews { rise: 0.0, fall: 0.0 },
            target_loads: target_load::TargetLoads::new(),
            counters: Counters::default(),
            have_estimated_parasitics: false,
            diagnostics: DiagnosticSink::new(),
        }
    }

    /// The counters accumulated so far.
    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Diagnostics emitted so far (e.g. "max utilization reached" warnings).
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.diagnostics()
    }

    /// `true` once [`Resizer::estimate_parasitics`] has run at least once.
    /// Gate sizing and net repair still function without it, but their load
    /// capacitance queries then omit wire loading entirely.
    pub fn parasitics_estimated(&self) -> bool {
        self.have_estimated_parasitics
    }

    /// Library cell area is conventionally expressed in square microns, so
    /// the core area is converted to the same unit (not square meters) to
    /// stay comparable to `Netlist::design_area()`.
    fn refresh_area(&mut self, netlist: &dyn Netlist) {
        self.counters.design_area = netlist.design_area();
        self.counters.max_area = match netlist.core_area() {
            Some(rect) => {
                let dbu_per_micron = netlist.dbu_per_micron() as f64;
                let width_um = (rect.x_max - rect.x_min) as f64 / dbu_per_micron;
                let height_um = (rect.y_max - rect.y_min) as f64 / dbu_per_micron;
                width_um * height_um * self.config.max_utilization
            }
            None => f64::INFINITY,
        };
    }

    /// `true` if the design still has area budget left to place new
    /// instances in. Emits a one-time-per-call warning when the budget has
    /// just been exhausted.
    fn has_area_budget(&mut self, netlist: &dyn Netlist) -> bool {
        self.refresh_area(netlist);
        if self.counters.design_area < self.counters.max_area {
            true
        } else {
            self.diagnostics.emit(Diagnostic::warning(
                DIAG_MAX_UTILIZATION,
                "Max utilization reached.",
                Span::DUMMY,
            ));
            false
        }
    }

    /// Computes and installs an estimated wire parasitic model on every net
    /// with a driver, via the Steiner service. Returns the number of nets
    /// updated. Safe to call repeatedly; re-estimates every eligible net
    /// each time.
    pub fn estimate_parasitics(
        &mut self,
        netlist: &dyn Netlist,
        timer: &mut dyn Timer,
        steiner: &dyn Steiner,
    ) -> u32 {
        let mut updated = 0;
        for net in netlist.all_nets() {
            if netlist.is_special(net) {
                continue;
            }
            let tree = steiner.make_tree(net, netlist);
            let is_clock = timer.is_clock(net);
            let model = estimate_wire_parasitics(net, tree.as_ref(), netlist, &self.config.wire_rc, is_clock);
            timer.set_parasitics(net, model);
            updated += 1;
        }
        timer.delays_invalid();
        self.have_estimated_parasitics = true;
        updated
    }

    /// Computes the design's target slew and per-cell target load table from
    /// the given candidate cell library. Must be called before
    /// [`Resizer::resize_gates`].
    ///
    /// Fails with a configuration error if either `buffer_cells` or `library`
    /// is empty — there is nothing to size against.
    pub fn compute_target_loads(
        &mut self,
        buffer_cells: &[CellId],
        library: &[CellId],
        netlist: &dyn Netlist,
        timer: &dyn Timer,
    ) -> AionResult<()> {
        if buffer_cells.is_empty() {
            return Err(crate::error::configuration_error("no buffer cells given to compute target slews from"));
        }
        if library.is_empty() {
            return Err(crate::error::configuration_error("no resize library given to compute target loads from"));
        }
        self.target_slews = target_load::compute_target_slews(buffer_cells, netlist, timer);
        self.target_loads = target_load::TargetLoads::new();
        self.target_loads.build(library, self.target_slews.worst(), netlist, timer);
        Ok(())
    }

    /// Inserts a buffer behind every unbuffered top-level input port. Returns
    /// the number of buffers inserted.
    pub fn buffer_inputs(&mut self, buffer_cell: CellId, netlist: &mut dyn Netlist, timer: &mut dyn Timer) -> u32 {
        if !self.has_area_budget(netlist) {
            return 0;
        }
        let inserted = port_buffer::buffer_inputs(buffer_cell, &mut self.names, netlist, timer);
        self.counters.inserted_buffer_count += inserted;
        inserted
    }

    /// Inserts a buffer ahead of every unbuffered top-level output port.
    /// Returns the number of buffers inserted.
    pub fn buffer_outputs(&mut self, buffer_cell: CellId, netlist: &mut dyn Netlist, timer: &mut dyn Timer) -> u32 {
        if !self.has_area_budget(netlist) {
            return 0;
        }
        let inserted = port_buffer::buffer_outputs(buffer_cell, &mut self.names, netlist, timer);
        self.counters.inserted_buffer_count += inserted;
        inserted
    }

    /// Inserts a buffer behind every unbuffered top-level input and output
    /// port. Returns the number of buffers inserted.
    pub fn buffer_ports(&mut self, buffer_cell: CellId, netlist: &mut dyn Netlist, timer: &mut dyn Timer) -> u32 {
        self.buffer_inputs(buffer_cell, netlist, timer) + self.buffer_outputs(buffer_cell, netlist, timer)
    }

    /// Duplicates every tie cell of `tie_cell` that fans out to more than
    /// one load. Returns the number of tie instances inserted.
    pub fn repair_tie_fanout(&mut self, tie_cell: CellId, netlist: &mut dyn Netlist) -> u32 {
        if !self.has_area_budget(netlist) {
            return 0;
        }
        let inserted = tie_fanout::repair_tie_fanout(tie_cell, &mut self.names, netlist);
        self.counters.inserted_tie_count += inserted;
        inserted
    }

    /// Resizes every driver pin in `drivers`, which the caller must already
    /// have sorted into reverse level order (closest to the primary outputs
    /// first), so that a gate's fanout is always sized before the gate
    /// itself. Returns the number of instances resized.
    pub fn resize_gates(&mut self, drivers: &[PinId], corner: Corner, netlist: &mut dyn Netlist, timer: &mut dyn Timer) -> u32 {
        if !self.have_estimated_parasitics {
            self.diagnostics.emit(Diagnostic::warning(
                DIAG_PARASITICS_STALE,
                "Resizing gates before wire parasitics were estimated; load capacitances omit wire loading.",
                Span::DUMMY,
            ));
        }
        let mut resized_set = sizer::ResizedMultiOutputSet::new();
        let mut count = 0;
        for &driver in drivers {
            let changed = sizer::resize_driver(
                driver,
                &self.config.dont_use,
                &self.target_loads,
                corner,
                netlist,
                timer,
                &mut resized_set,
            );
            if changed {
                count += 1;
            }
        }
        self.counters.resize_count += count;
        count
    }

    /// Repairs every net in `nets` by inserting `buffer_cell` repeaters along
    /// each net's Steiner tree wherever TIMER reports a capacitance, fanout,
    /// or wire-length violation at the driver — or wherever TIMER reports a
    /// slew violation, which only gates whether a net needs repair at all and
    /// is not itself enforced per edge. Returns the number of repeaters
    /// inserted.
    pub fn repair_nets(
        &mut self,
        nets: &[NetId],
        buffer_cell: CellId,
        netlist: &mut dyn Netlist,
        timer: &mut dyn Timer,
        steiner: &dyn Steiner,
    ) -> AionResult<u32> {
        let dbu_per_micron = netlist.dbu_per_micron() as f64;
        let max_length_dbu = meters_to_dbu(self.config.max_wire_length, dbu_per_micron);
        let wire_cap_per_dbu = self.config.wire_rc.wire_cap / (dbu_per_micron * 1.0e6);

        let mut inserted = 0;
        for &net in nets {
            if !self.has_area_budget(netlist) {
                break;
            }
            let Some(driver) = netlist.drivers(net).first().copied() else {
                continue;
            };
            let Some(tree) = steiner.make_tree(net, netlist) else {
                continue;
            };

            let cap_check = timer.check_capacitance(driver);
            let fanout_check = timer.check_fanout(driver);
            let slew_check = timer.check_slew(driver);
            let length_violation = tree_length_meters(&tree, netlist) > self.config.max_wire_length;
            let needs_repair =
                cap_check.is_violated() || fanout_check.is_violated() || slew_check.is_violated() || length_violation;
            if !needs_repair {
                continue;
            }

            let limits = net_repair::NetRepairLimits {
                max_length_dbu,
                max_cap: cap_check.limit,
                max_fanout: fanout_limit_to_u32(fanout_check.limit),
                max_slew: slew_check.limit,
                wire_cap_per_dbu,
            };
            inserted += net_repair::repair_net(&tree, &limits, buffer_cell, &mut self.names, netlist, timer)?;
        }
        self.counters.inserted_buffer_count += inserted;
        Ok(inserted)
    }

    /// Repairs hold violations at `vertices` using the given candidate
    /// buffer cells. Returns the number of delay buffers inserted.
    pub fn repair_hold(
        &mut self,
        vertices: &[VertexId],
        candidate_buffers: &[CellId],
        netlist: &mut dyn Netlist,
        timer: &mut dyn Timer,
    ) -> AionResult<u32> {
        if !self.has_area_budget(netlist) {
            return Ok(0);
        }
        let inserted = hold_repair::repair_hold_violations(
            vertices,
            candidate_buffers,
            self.config.allow_setup_violations,
            &mut self.names,
            netlist,
            timer,
        )?;
        self.counters.inserted_buffer_count += inserted;
        Ok(inserted)
    }

    /// Clones clock-tree inverters reachable from `clock_roots` that fan out
    /// to more than one load. Returns the number of inverters inserted.
    pub fn clone_clock_inverters(&mut self, clock_roots: &[PinId], netlist: &mut dyn Netlist, timer: &mut dyn Timer) -> u32 {
        let mut inserted = 0;
        for &root in clock_roots {
            if !self.has_area_budget(netlist) {
                break;
            }
            inserted += clock_clone::clone_clock_inverters(root, &mut self.names, netlist, timer);
        }
        self.counters.cloned_inverter_count += inserted;
        inserted
    }

    /// Non-special nets with no driver pin. A read-only pre-flight check;
    /// never mutates the netlist or invalidates any cached timing state.
    pub fn find_floating_nets(&self, netlist: &dyn Netlist) -> Vec<NetId> {
        queries::find_floating_nets(netlist)
    }

    /// The `n` longest nets by estimated Steiner wire length, longest first,
    /// rounded to `digits` decimal places. Read-only.
    pub fn report_long_wires(&self, n: usize, digits: u32, netlist: &dyn Netlist, steiner: &dyn Steiner) -> Vec<(NetId, f64)> {
        queries::report_long_wires(n, digits, netlist, steiner)
    }
}
