//! Service traits the CORE consumes: TIMER, NETLIST, and STEINER.
//!
//! These are capability interfaces, not base classes — the CORE takes them as
//! constructor parameters (`&dyn Netlist`, `&dyn Timer`, `&dyn Steiner`) so a
//! fake implementation can drive tests without a real STA engine or physical
//! database. See [`crate::testing`] for the fakes used by this crate's own
//! test suite.

use crate::geometry::{Point, Rect};
use crate::ids::{CellId, InstanceId, NetId, PinId, SteinerPtId, VertexId};
use serde::{Deserialize, Serialize};

/// Pin / port direction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Direction {
    /// Signal flows into the instance or design.
    Input,
    /// Signal flows out of the instance or design.
    Output,
}

/// Selects which corner bound (best-case/fastest or worst-case/slowest) a
/// query should report.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum MinMax {
    /// The fastest (min-delay) corner — relevant for hold analysis.
    Min,
    /// The slowest (max-delay) corner — relevant for setup analysis.
    Max,
}

/// Opaque operating-corner selector. The CORE holds exactly one active corner.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Corner(pub u32);

/// The result of a slew/capacitance/fanout limit check on a pin.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LimitCheck {
    /// The measured value at the pin.
    pub value: f64,
    /// The library/SDC limit, or `f64::INFINITY` if none is set.
    pub limit: f64,
    /// `limit - value`; negative means violated.
    pub slack: f64,
}

impl LimitCheck {
    /// Returns `true` if the measured value exceeds the limit.
    pub fn is_violated(&self) -> bool {
        self.limit.is_finite() && self.value > self.limit
    }
}

/// One input→output timing arc of a cell, as seen by the target-load model.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TimingArc {
    /// Input pin capacitance of the arc's input pin.
    pub input_pin_cap: f64,
    /// `true` for setup/hold check arcs, which target-load bisection skips.
    pub is_check: bool,
    /// `true` for tristate-enable arcs, which target-load bisection skips.
    pub is_tristate: bool,
}

/// The 2x2 [rise/fall] x [min/max] slack matrix returned by `vertex_slacks`.
pub type SlackMatrix = [[f64; 2]; 2];

/// The physical-database / netlist-editing service (NETLIST in the design).
///
/// Owns cells, instances, nets, and pins. All edit methods mutate the
/// underlying design in place; the CORE is the exclusive writer during a
/// single entry-point call.
pub trait Netlist {
    // -- cell / library queries --

    /// Human-readable name of a library cell.
    fn cell_name(&self, cell: CellId) -> String;
    /// `true` if the cell is a single-input, single-output non-inverting buffer.
    fn is_buffer(&self, cell: CellId) -> bool;
    /// `true` if the cell is a single-input, single-output inverter.
    fn is_inverter(&self, cell: CellId) -> bool;
    /// `true` if the cell drives a constant 0 or 1 (a tie cell).
    fn is_func_one_zero(&self, cell: CellId) -> bool;
    /// Silicon area of one instance of this cell, in library area units.
    fn cell_area(&self, cell: CellId) -> f64;
    /// The non-check, non-tristate timing arcs of this cell (for target-load bisection).
    fn timing_arcs(&self, cell: CellId) -> Vec<TimingArc>;
    /// Input capacitance of a single load pin, as seen by the net repair
    /// walker when accumulating downstream capacitance.
    fn input_pin_capacitance(&self, pin: PinId) -> f64;

    // -- instance / pin / net graph --

    /// Creates a placed instance of `cell` named `name` at `loc`. Returns its ID.
    fn make_instance(&mut self, name: &str, cell: CellId, loc: Point) -> InstanceId;
    /// Creates an empty net named `name`. Returns its ID.
    fn make_net(&mut self, name: &str) -> NetId;
    /// Connects `inst`'s port named `port` to `net`, returning the pin.
    fn connect_pin(&mut self, inst: InstanceId, port: &str, net: NetId) -> PinId;
    /// Disconnects `pin` from whatever net it is on.
    fn disconnect_pin(&mut self, pin: PinId);
    /// Removes an instance and all its pins.
    fn delete_instance(&mut self, inst: InstanceId);
    /// Removes a net. The net must have no connected pins.
    fn delete_net(&mut self, net: NetId);
    /// Swaps an instance's master cell, preserving pin connections by port name.
    fn replace_cell(&mut self, inst: InstanceId, cell: CellId);
    /// Moves a placed instance to a new location.
    fn set_location(&mut self, inst: InstanceId, loc: Point);

    /// Current location of an instance.
    fn instance_location(&self, inst: InstanceId) -> Point;
    /// Current location of a pin (instance pin or top-level port).
    fn pin_location(&self, pin: PinId) -> Point;
    /// Direction of a pin.
    fn direction(&self, pin: PinId) -> Direction;
    /// The net a pin is connected to, if any.
    fn net_of(&self, pin: PinId) -> Option<NetId>;
    /// All pins connected to a net.
    fn pins_of_net(&self, net: NetId) -> Vec<PinId>;
    /// All pins owned by an instance.
    fn pins_of_instance(&self, inst: InstanceId) -> Vec<PinId>;
    /// The owning instance of a pin, or `None` if it is a top-level port.
    fn instance_of_pin(&self, pin: PinId) -> Option<InstanceId>;
    /// The master cell of an instance.
    fn cell_of_instance(&self, inst: InstanceId) -> CellId;
    /// The port name of a pin (used for replace-cell LEF matching and naming).
    fn port_name(&self, pin: PinId) -> String;

    /// Finds an instance by name in the top scope.
    fn find_instance(&self, name: &str) -> Option<InstanceId>;
    /// Finds a net by name in the top scope.
    fn find_net(&self, name: &str) -> Option<NetId>;
    /// The driver pins of a net (normally zero or one for a legal design).
    fn drivers(&self, net: NetId) -> Vec<PinId>;

    /// `true` if `pin` is a top-level design port rather than an instance pin.
    fn is_top_level_port(&self, pin: PinId) -> bool;
    /// `true` if `pin` is an output / driver terminal.
    fn is_driver_pin(&self, pin: PinId) -> bool;
    /// `true` if `pin` is an input / load terminal.
    fn is_load_pin(&self, pin: PinId) -> bool;
    /// `true` if `net` is a reserved power net.
    fn is_power(&self, net: NetId) -> bool;
    /// `true` if `net` is a reserved ground net.
    fn is_ground(&self, net: NetId) -> bool;
    /// `true` if `net` is power, ground, or otherwise reserved (never edited).
    fn is_special(&self, net: NetId) -> bool;

    /// All instances in the design.
    fn all_instances(&self) -> Vec<InstanceId>;
    /// All nets in the design.
    fn all_nets(&self) -> Vec<NetId>;
    /// All top-level ports of the given direction.
    fn top_ports(&self, direction: Direction) -> Vec<PinId>;

    /// The placeable core rectangle, or `None` for a design with no floorplan.
    fn core_area(&self) -> Option<Rect>;
    /// Database units per micron for this technology.
    fn dbu_per_micron(&self) -> i32;
    /// The design area snapshot accumulated so far (sum of all instance areas).
    fn design_area(&self) -> f64;
}

/// The static-timing-analysis service (TIMER in the design).
///
/// Provides delay/slew/slack queries over an opaque timing graph and the
/// invalidation hooks the CORE must call before every edit-dependent query.
pub trait Timer {
    /// Rebuilds level numbers after a graph-shape change.
    fn levelize(&mut self);
    /// Ensures the timing graph reflects the current netlist.
    fn ensure_graph(&mut self);
    /// Ensures the clock network has been traced.
    fn ensure_clk_network(&mut self);

    /// Total downstream capacitance seen by a driver pin, including estimated
    /// wire parasitics, at the given corner.
    fn load_cap(&self, pin: PinId, corner: Corner) -> f64;
    /// Drives a cell's output given an input transition and load; returns
    /// `(delay_ns, rise_slew_ns, fall_slew_ns)` at the output.
    fn gate_delay(&self, cell: CellId, in_slew: f64, load_cap: f64) -> (f64, f64, f64);
    /// The intrinsic self-delay of a buffer/inverter cell at its target load.
    fn buffer_delay(&self, cell: CellId, load_cap: f64) -> f64;

    /// The timing vertex corresponding to a driver pin.
    fn vertex_of_pin(&self, pin: PinId) -> VertexId;
    /// Topological level of a vertex (driver-to-driver depth).
    fn level(&self, vertex: VertexId) -> u32;
    /// Worst slack at a vertex for the given min/max corner bound.
    fn vertex_slack(&self, vertex: VertexId, mm: MinMax) -> f64;
    /// The full `[rise/fall][min/max]` slack matrix at a vertex.
    fn vertex_slacks(&self, vertex: VertexId) -> SlackMatrix;

    /// Slew limit check at a pin.
    fn check_slew(&self, pin: PinId) -> LimitCheck;
    /// Capacitance limit check at a pin.
    fn check_capacitance(&self, pin: PinId) -> LimitCheck;
    /// Fanout limit check at a pin.
    fn check_fanout(&self, pin: PinId) -> LimitCheck;

    /// Recomputes required times from the current constraints.
    fn find_requireds(&mut self);
    /// Recomputes arrival/delay times from the current netlist and parasitics.
    fn find_delays(&mut self);

    /// Cells functionally and electrically equivalent to `cell` (same footprint).
    fn equiv_cells(&self, cell: CellId) -> Vec<CellId>;

    /// `true` if `net` is part of a clock network.
    fn is_clock(&self, net: NetId) -> bool;
    /// `true` if `vertex` sits on a register clock pin.
    fn is_register_clock_pin(&self, vertex: VertexId) -> bool;
    /// Non-clock driver vertices one hop upstream of `vertex` in the timing graph.
    fn fanin_drivers(&self, vertex: VertexId) -> Vec<VertexId>;
    /// Load vertices one hop downstream of `vertex` in the timing graph.
    fn fanout_loads(&self, vertex: VertexId) -> Vec<VertexId>;
    /// The driver pin a timing vertex corresponds to.
    fn pin_of_vertex(&self, vertex: VertexId) -> PinId;

    /// Marks the delay calculator stale (must precede any query after a
    /// wire-RC change or instance edit).
    fn delays_invalid(&mut self);
    /// Marks the arrival-time search stale (must precede any query after an
    /// instance edit).
    fn arrivals_invalid(&mut self);
    /// Deletes the cached parasitic model for a net.
    fn delete_parasitics(&mut self, net: NetId);
    /// `true` if `net` currently has a cached parasitic model.
    fn has_parasitics(&self, net: NetId) -> bool;
    /// Installs an estimated wire parasitic model for `net` at the active corner.
    fn set_parasitics(&mut self, net: NetId, model: crate::parasitics::PiElmore);
}

/// A branch of a Steiner tree: an edge between two points of known length.
#[derive(Clone, Copy, Debug)]
pub struct SteinerBranch {
    /// First endpoint.
    pub pt1: SteinerPtId,
    /// Pin at the first endpoint, if it coincides with one.
    pub pin1: Option<PinId>,
    /// Second endpoint.
    pub pt2: SteinerPtId,
    /// Pin at the second endpoint, if it coincides with one.
    pub pin2: Option<PinId>,
    /// Branch length in DBU.
    pub length_dbu: i64,
}

/// A rectilinear Steiner tree connecting a net's driver and load pins.
///
/// Modeled as an arena of points, each with zero or more children and the
/// edge length to each child, in the same spirit as `aion_pnr`'s `RouteNode`
/// tree of routing resources.
#[derive(Clone, Debug, Default)]
pub struct SteinerTree {
    root: Option<SteinerPtId>,
    locations: std::collections::HashMap<SteinerPtId, Point>,
    pins: std::collections::HashMap<SteinerPtId, PinId>,
    children: std::collections::HashMap<SteinerPtId, Vec<(SteinerPtId, i64)>>,
}

impl SteinerTree {
    /// Creates an empty tree. Use [`SteinerTreeBuilder`] to construct a real one.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tree's root point (the net's driver).
    pub fn root(&self) -> Option<SteinerPtId> {
        self.root
    }

    /// The DBU location of a point.
    pub fn location(&self, pt: SteinerPtId) -> Point {
        self.locations
            .get(&pt)
            .copied()
            .unwrap_or(Point::new(0, 0))
    }

    /// The pin coinciding with a point, if any.
    pub fn pin(&self, pt: SteinerPtId) -> Option<PinId> {
        self.pins.get(&pt).copied()
    }

    /// The children of a point and the edge length to each.
    pub fn children(&self, pt: SteinerPtId) -> &[(SteinerPtId, i64)] {
        self.children.get(&pt).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flattens the tree into its branch list, for the parasitic estimator.
    pub fn branches(&self) -> Vec<SteinerBranch> {
        let mut out = Vec::new();
        for (&pt1, kids) in &self.children {
            for &(pt2, length_dbu) in kids {
                out.push(SteinerBranch {
                    pt1,
                    pin1: self.pin(pt1),
                    pt2,
                    pin2: self.pin(pt2),
                    length_dbu,
                });
            }
        }
        out
    }
}

/// Builder for [`SteinerTree`], used by [`Steiner`] implementations.
#[derive(Default)]
pub struct SteinerTreeBuilder {
    tree: SteinerTree,
}

impl SteinerTreeBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a point at `location`, optionally coinciding with `pin`.
    pub fn add_point(&mut self, pt: SteinerPtId, location: Point, pin: Option<PinId>) -> &mut Self {
        self.tree.locations.insert(pt, location);
        if let Some(pin) = pin {
            self.tree.pins.insert(pt, pin);
        }
        self.tree.children.entry(pt).or_default();
        self
    }

    /// Adds a child edge `parent -> child` of the given length.
    pub fn add_child(&mut self, parent: SteinerPtId, child: SteinerPtId, length_dbu: i64) -> &mut Self {
        self.tree.children.entry(parent).or_default().push((child, length_dbu));
        self
    }

    /// Sets the tree's root (the net's driver point).
    pub fn set_root(&mut self, root: SteinerPtId) -> &mut Self {
        self.tree.root = Some(root);
        self
    }

    /// Consumes the builder, producing the finished tree.
    pub fn build(self) -> SteinerTree {
        self.tree
    }
}

/// The Steiner-tree construction service (STEINER in the design).
pub trait Steiner {
    /// Builds the rectilinear Steiner tree for `net`. Returns `None` for nets
    /// with fewer than two pins (nothing to route).
    fn make_tree(&self, net: NetId, netlist: &dyn Netlist) -> Option<SteinerTree>;
}
