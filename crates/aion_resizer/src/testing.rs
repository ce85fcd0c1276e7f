//! In-memory fakes for [`crate::ports::Netlist`], [`crate::ports::Timer`],
//! and [`crate::ports::Steiner`].
//!
//! These stand in for a real physical database and STA engine, in the same
//! spirit as `TestArch`/`TestMapper` in `aion_pnr`'s test suite: small,
//! hand-built, and only as capable as the scenarios that drive them require.

use std::collections::HashMap;

use crate::geometry::Point;
use crate::ids::{CellId, InstanceId, NetId, PinId, SteinerPtId, VertexId};
use crate::parasitics::PiElmore;
use crate::ports::{
    Corner, Direction, LimitCheck, MinMax, Netlist, SlackMatrix, Steiner, SteinerTree,
    SteinerTreeBuilder, Timer, TimingArc,
};

#[derive(Clone)]
struct CellRecord {
    name: String,
    is_buffer: bool,
    is_inverter: bool,
    is_tie: bool,
    area: f64,
    ports: Vec<(String, Direction)>,
    arcs: Vec<TimingArc>,
}

#[derive(Clone)]
struct InstanceRecord {
    name: String,
    cell: CellId,
    loc: Point,
    pins: Vec<PinId>,
}

#[derive(Clone, Default)]
struct NetRecord {
    name: String,
    pins: Vec<PinId>,
    power: bool,
    ground: bool,
}

#[derive(Clone, Copy)]
struct PinRecord {
    inst: Option<InstanceId>,
    direction: Direction,
    net: Option<NetId>,
}

/// A hand-built physical database sufficient to drive the resizer's own tests.
#[derive(Default)]
pub struct FakeNetlist {
    cells: Vec<CellRecord>,
    cell_names: HashMap<String, CellId>,
    port_names: Vec<Vec<String>>,
    instances: Vec<InstanceRecord>,
    instance_names: HashMap<String, InstanceId>,
    nets: Vec<NetRecord>,
    net_names: HashMap<String, NetId>,
    pins: Vec<PinRecord>,
    top_ports: Vec<(String, PinId)>,
    dbu_per_micron: i32,
    core_area: Option<crate::geometry::Rect>,
    next_anon: u32,
}

impl FakeNetlist {
    /// Creates an empty fake with a 1000 DBU/micron technology and no floorplan.
    pub fn new() -> Self {
        Self {
            dbu_per_micron: 1000,
            ..Default::default()
        }
    }

    /// Sets the placeable core rectangle.
    pub fn set_core_area(&mut self, rect: crate::geometry::Rect) {
        self.core_area = Some(rect);
    }

    /// Registers a library cell and its timing arcs. Returns its ID.
    pub fn add_cell(
        &mut self,
        name: &str,
        is_buffer: bool,
        is_inverter: bool,
        is_tie: bool,
        area: f64,
        ports: &[(&str, Direction)],
        arcs: &[TimingArc],
    ) -> CellId {
        let id = CellId::from_raw(self.cells.len() as u32);
        self.cells.push(CellRecord {
            name: name.to_string(),
            is_buffer,
            is_inverter,
            is_tie,
            area,
            ports: ports.iter().map(|(n, d)| (n.to_string(), *d)).collect(),
            arcs: arcs.to_vec(),
        });
        self.cell_names.insert(name.to_string(), id);
        id
    }

    /// Creates an instance of `cell` at `loc`, with one fresh unconnected pin
    /// per port the cell declares. Returns its ID.
    pub fn add_instance(&mut self, name: &str, cell: CellId, loc: Point) -> InstanceId {
        let id = InstanceId::from_raw(self.instances.len() as u32);
        let ports = self.cells[cell.as_raw() as usize].ports.clone();
        let mut pins = Vec::with_capacity(ports.len());
        for (_, direction) in &ports {
            let pin = PinId::from_raw(self.pins.len() as u32);
            self.pins.push(PinRecord {
                inst: Some(id),
                direction: *direction,
                net: None,
            });
            pins.push(pin);
        }
        self.instances.push(InstanceRecord {
            name: name.to_string(),
            cell,
            loc,
            pins,
        });
        self.instance_names.insert(name.to_string(), id);
        id
    }

    /// Creates a top-level port pin with no owning instance, immediately
    /// connected to a fresh net of the same name (the usual one-pin-per-port
    /// convention for a flat netlist).
    pub fn add_top_port(&mut self, name: &str, direction: Direction) -> (PinId, NetId) {
        let pin = PinId::from_raw(self.pins.len() as u32);
        self.pins.push(PinRecord {
            inst: None,
            direction,
            net: None,
        });
        self.top_ports.push((name.to_string(), pin));
        let net = self.make_net(name);
        self.pins[pin.as_raw() as usize].net = Some(net);
        self.nets[net.as_raw() as usize].pins.push(pin);
        (pin, net)
    }

    fn pin_record(&self, pin: PinId) -> &PinRecord {
        &self.pins[pin.as_raw() as usize]
    }

    fn port_index(&self, inst: InstanceId, port: &str) -> usize {
        let cell = self.instances[inst.as_raw() as usize].cell;
        self.cells[cell.as_raw() as usize]
            .ports
            .iter()
            .position(|(name, _)| name == port)
            .unwrap_or_else(|| panic!("no port named {port} on cell"))
    }
}

impl Netlist for FakeNetlist {
    fn cell_name(&self, cell: CellId) -> String {
        self.cells[cell.as_raw() as usize].name.clone()
    }

    fn is_buffer(&self, cell: CellId) -> bool {
        self.cells[cell.as_raw() as usize].is_buffer
    }

    fn is_inverter(&self, cell: CellId) -> bool {
        self.cells[cell.as_raw() as usize].is_inverter
    }

    fn is_func_one_zero(&self, cell: CellId) -> bool {
        self.cells[cell.as_raw() as usize].is_tie
    }

    fn cell_area(&self, cell: CellId) -> f64 {
        self.cells[cell.as_raw() as usize].area
    }

    fn timing_arcs(&self, cell: CellId) -> Vec<TimingArc> {
        self.cells[cell.as_raw() as usize].arcs.clone()
    }

    fn input_pin_capacitance(&self, pin: PinId) -> f64 {
        let Some(inst) = self.pin_record(pin).inst else {
            return 0.0;
        };
        let cell = self.instances[inst.as_raw() as usize].cell;
        self.cells[cell.as_raw() as usize]
            .arcs
            .first()
            .map(|arc| arc.input_pin_cap)
            .unwrap_or(0.0)
    }

    fn make_instance(&mut self, name: &str, cell: CellId, loc: Point) -> InstanceId {
        self.add_instance(name, cell, loc)
    }

    fn make_net(&mut self, name: &str) -> NetId {
        let id = NetId::from_raw(self.nets.len() as u32);
        self.nets.push(NetRecord {
            name: name.to_string(),
            ..Default::default()
        });
        self.net_names.insert(name.to_string(), id);
        id
    }

    fn connect_pin(&mut self, inst: InstanceId, port: &str, net: NetId) -> PinId {
        let idx = self.port_index(inst, port);
        let pin = self.instances[inst.as_raw() as usize].pins[idx];
        self.pins[pin.as_raw() as usize].net = Some(net);
        self.nets[net.as_raw() as usize].pins.push(pin);
        pin
    }

    fn disconnect_pin(&mut self, pin: PinId) {
        if let Some(net) = self.pins[pin.as_raw() as usize].net.take() {
            self.nets[net.as_raw() as usize].pins.retain(|&p| p != pin);
        }
    }

    fn delete_instance(&mut self, inst: InstanceId) {
        let pins = self.instances[inst.as_raw() as usize].pins.clone();
        for pin in pins {
            self.disconnect_pin(pin);
        }
    }

    fn delete_net(&mut self, net: NetId) {
        debug_assert!(self.nets[net.as_raw() as usize].pins.is_empty());
        self.net_names.retain(|_, &mut v| v != net);
    }

    fn replace_cell(&mut self, inst: InstanceId, cell: CellId) {
        self.instances[inst.as_raw() as usize].cell = cell;
    }

    fn set_location(&mut self, inst: InstanceId, loc: Point) {
        self.instances[inst.as_raw() as usize].loc = loc;
    }

    fn instance_location(&self, inst: InstanceId) -> Point {
        self.instances[inst.as_raw() as usize].loc
    }

    fn pin_location(&self, pin: PinId) -> Point {
        match self.pin_record(pin).inst {
            Some(inst) => self.instance_location(inst),
            None => Point::new(0, 0),
        }
    }

    fn direction(&self, pin: PinId) -> Direction {
        self.pin_record(pin).direction
    }

    fn net_of(&self, pin: PinId) -> Option<NetId> {
        self.pin_record(pin).net
    }

    fn pins_of_net(&self, net: NetId) -> Vec<PinId> {
        self.nets[net.as_raw() as usize].pins.clone()
    }

    fn pins_of_instance(&self, inst: InstanceId) -> Vec<PinId> {
        self.instances[inst.as_raw() as usize].pins.clone()
    }

    fn instance_of_pin(&self, pin: PinId) -> Option<InstanceId> {
        self.pin_record(pin).inst
    }

    fn cell_of_instance(&self, inst: InstanceId) -> CellId {
        self.instances[inst.as_raw() as usize].cell
    }

    fn port_name(&self, pin: PinId) -> String {
        if let Some(inst) = self.pin_record(pin).inst {
            let inst_rec = &self.instances[inst.as_raw() as usize];
            if let Some(idx) = inst_rec.pins.iter().position(|&p| p == pin) {
                return self.cells[inst_rec.cell.as_raw() as usize].ports[idx].0.clone();
            }
        }
        self.top_ports
            .iter()
            .find(|(_, p)| *p == pin)
            .map(|(name, _)| name.clone())
            .unwrap_or_default()
    }

    fn find_instance(&self, name: &str) -> Option<InstanceId> {
        self.instance_names.get(name).copied()
    }

    fn find_net(&self, name: &str) -> Option<NetId> {
        self.net_names.get(name).copied()
    }

    fn drivers(&self, net: NetId) -> Vec<PinId> {
        self.nets[net.as_raw() as usize]
            .pins
            .iter()
            .copied()
            .filter(|&p| self.is_driver_pin(p))
            .collect()
    }

    fn is_top_level_port(&self, pin: PinId) -> bool {
        self.pin_record(pin).inst.is_none()
    }

    fn is_driver_pin(&self, pin: PinId) -> bool {
        let rec = self.pin_record(pin);
        match rec.inst {
            Some(_) => rec.direction == Direction::Output,
            None => rec.direction == Direction::Input,
        }
    }

    fn is_load_pin(&self, pin: PinId) -> bool {
        !self.is_driver_pin(pin)
    }

    fn is_power(&self, net: NetId) -> bool {
        self.nets[net.as_raw() as usize].power
    }

    fn is_ground(&self, net: NetId) -> bool {
        self.nets[net.as_raw() as usize].ground
    }

    fn is_special(&self, net: NetId) -> bool {
        self.is_power(net) || self.is_ground(net)
    }

    fn all_instances(&self) -> Vec<InstanceId> {
        (0..self.instances.len() as u32).map(InstanceId::from_raw).collect()
    }

    fn all_nets(&self) -> Vec<NetId> {
        (0..self.nets.len() as u32).map(NetId::from_raw).collect()
    }

    fn top_ports(&self, direction: Direction) -> Vec<PinId> {
        self.top_ports
            .iter()
            .map(|(_, p)| *p)
            .filter(|&p| self.direction(p) == direction)
            .collect()
    }

    fn core_area(&self) -> Option<crate::geometry::Rect> {
        self.core_area
    }

    fn dbu_per_micron(&self) -> i32 {
        self.dbu_per_micron
    }

    fn design_area(&self) -> f64 {
        self.instances
            .iter()
            .map(|inst| self.cells[inst.cell.as_raw() as usize].area)
            .sum()
    }
}

impl FakeNetlist {
    /// Generates a fresh, never-before-used name with the given prefix. Only
    /// used by tests that need a name but don't care about collision policy
    /// (see [`crate::names`] for the CORE's real collision-aware generator).
    pub fn fresh_name(&mut self, prefix: &str) -> String {
        self.next_anon += 1;
        format!("{prefix}_{}", self.next_anon)
    }
}

#[derive(Clone, Copy, Default)]
struct CellTiming {
    intrinsic_delay: f64,
    drive_res: f64,
    input_cap: f64,
}

#[derive(Clone, Copy, Default)]
struct VertexState {
    slack: [[f64; 2]; 2],
}

/// A hand-built STA stand-in: per-cell RC timing characterization and
/// explicitly settable vertex slacks, rebuilt lazily from the netlist graph.
pub struct FakeTimer {
    cell_timing: HashMap<CellId, CellTiming>,
    equiv: HashMap<CellId, Vec<CellId>>,
    clocks: std::collections::HashSet<NetId>,
    register_clock_vertices: std::collections::HashSet<VertexId>,
    vertex_states: HashMap<VertexId, VertexState>,
    parasitics: HashMap<NetId, PiElmore>,
    fanout: HashMap<VertexId, Vec<VertexId>>,
    fanin: HashMap<VertexId, Vec<VertexId>>,
    load_caps: HashMap<PinId, f64>,
    cap_limits: HashMap<PinId, f64>,
    fanout_limits: HashMap<PinId, f64>,
    slew_limits: HashMap<PinId, f64>,
    pub(crate) find_requireds_calls: u32,
    pub(crate) find_delays_calls: u32,
}

impl Default for FakeTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeTimer {
    /// Creates an empty fake timer. All slacks default to `+infinity` (met).
    pub fn new() -> Self {
        Self {
            cell_timing: HashMap::new(),
            equiv: HashMap::new(),
            clocks: std::collections::HashSet::new(),
            register_clock_vertices: std::collections::HashSet::new(),
            vertex_states: HashMap::new(),
            parasitics: HashMap::new(),
            fanout: HashMap::new(),
            fanin: HashMap::new(),
            load_caps: HashMap::new(),
            cap_limits: HashMap::new(),
            fanout_limits: HashMap::new(),
            slew_limits: HashMap::new(),
            find_requireds_calls: 0,
            find_delays_calls: 0,
        }
    }

    /// Rebuilds the driver/load vertex adjacency from the current netlist
    /// graph. A real TIMER service keeps this current automatically; this
    /// fake requires an explicit call after any edit that changes
    /// connectivity and before a test relies on `fanout_loads`/`fanin_drivers`.
    pub fn sync_graph(&mut self, netlist: &dyn Netlist) {
        self.fanout.clear();
        self.fanin.clear();

        let mut link = |from: PinId, to: PinId, fanout: &mut HashMap<VertexId, Vec<VertexId>>, fanin: &mut HashMap<VertexId, Vec<VertexId>>| {
            let fv = VertexId::from_raw(from.as_raw());
            let tv = VertexId::from_raw(to.as_raw());
            fanout.entry(fv).or_default().push(tv);
            fanin.entry(tv).or_default().push(fv);
        };

        // Net arcs: driver pin -> each load pin on the same net.
        for net in netlist.all_nets() {
            let pins = netlist.pins_of_net(net);
            let drivers: Vec<PinId> = pins.iter().copied().filter(|&p| netlist.is_driver_pin(p)).collect();
            let loads: Vec<PinId> = pins.iter().copied().filter(|&p| netlist.is_load_pin(p)).collect();
            for &d in &drivers {
                for &l in &loads {
                    link(d, l, &mut self.fanout, &mut self.fanin);
                }
            }
        }

        // Internal cell arcs: every input pin -> every output pin of the
        // same instance, modeling the combinational path through the cell.
        for inst in netlist.all_instances() {
            let pins = netlist.pins_of_instance(inst);
            let inputs: Vec<PinId> = pins.iter().copied().filter(|&p| netlist.is_load_pin(p)).collect();
            let outputs: Vec<PinId> = pins.iter().copied().filter(|&p| netlist.is_driver_pin(p)).collect();
            for &i in &inputs {
                for &o in &outputs {
                    link(i, o, &mut self.fanout, &mut self.fanin);
                }
            }
        }
    }

    /// Sets a cell's RC timing characterization: `delay = intrinsic_delay +
    /// drive_res * load_cap`, `slew = 2 * drive_res * load_cap`.
    pub fn set_cell_timing(&mut self, cell: CellId, intrinsic_delay: f64, drive_res: f64, input_cap: f64) {
        self.cell_timing.insert(
            cell,
            CellTiming {
                intrinsic_delay,
                drive_res,
                input_cap,
            },
        );
    }

    /// Declares `equivalents` as footprint-equivalent alternatives to `cell`.
    pub fn set_equiv_cells(&mut self, cell: CellId, equivalents: Vec<CellId>) {
        self.equiv.insert(cell, equivalents);
    }

    /// Marks `net` as a clock net.
    pub fn set_clock(&mut self, net: NetId) {
        self.clocks.insert(net);
    }

    /// Overrides the load capacitance `loadCap` reports for `pin`. Defaults
    /// to `0.0` for any pin never set, since this fake does not model wire
    /// parasitics or fanin capacitance summation.
    pub fn set_load_cap(&mut self, pin: PinId, value: f64) {
        self.load_caps.insert(pin, value);
    }

    /// Overrides the capacitance limit `check_capacitance` reports for `pin`.
    /// Defaults to `f64::INFINITY` (no limit) for any pin never set.
    pub fn set_capacitance_limit(&mut self, pin: PinId, limit: f64) {
        self.cap_limits.insert(pin, limit);
    }

    /// Overrides the fanout limit `check_fanout` reports for `pin`. Defaults
    /// to `f64::INFINITY` (no limit) for any pin never set.
    pub fn set_fanout_limit(&mut self, pin: PinId, limit: f64) {
        self.fanout_limits.insert(pin, limit);
    }

    /// Overrides the slew limit `check_slew` reports for `pin`. Defaults to
    /// `f64::INFINITY` (no limit) for any pin never set.
    pub fn set_slew_limit(&mut self, pin: PinId, limit: f64) {
        self.slew_limits.insert(pin, limit);
    }

    /// Marks `vertex` as sitting on a register's clock pin.
    pub fn set_register_clock_pin(&mut self, vertex: VertexId) {
        self.register_clock_vertices.insert(vertex);
    }

    /// Directly sets the slack at a vertex for one rise/fall and min/max bound.
    pub fn set_slack(&mut self, vertex: VertexId, rise_fall: usize, mm: MinMax, value: f64) {
        let entry = self.vertex_states.entry(vertex).or_insert_with(|| VertexState {
            slack: [[f64::INFINITY; 2]; 2],
        });
        entry.slack[rise_fall][mm as usize] = value;
    }
}

impl Timer for FakeTimer {
    fn levelize(&mut self) {}

    fn ensure_graph(&mut self) {}

    fn ensure_clk_network(&mut self) {}

    fn load_cap(&self, pin: PinId, _corner: Corner) -> f64 {
        self.load_caps.get(&pin).copied().unwrap_or(0.0)
    }

    fn gate_delay(&self, cell: CellId, in_slew: f64, load_cap: f64) -> (f64, f64, f64) {
        let t = self.cell_timing.get(&cell).copied().unwrap_or_default();
        let _ = in_slew;
        let delay = t.intrinsic_delay + t.drive_res * load_cap;
        let slew = 2.0 * t.drive_res * load_cap;
        (delay, slew, slew)
    }

    fn buffer_delay(&self, cell: CellId, load_cap: f64) -> f64 {
        self.gate_delay(cell, 0.0, load_cap).0
    }

    fn vertex_of_pin(&self, pin: PinId) -> VertexId {
        VertexId::from_raw(pin.as_raw())
    }

    fn level(&self, _vertex: VertexId) -> u32 {
        0
    }

    fn vertex_slack(&self, vertex: VertexId, mm: MinMax) -> f64 {
        let state = self.vertex_states.get(&vertex).copied().unwrap_or(VertexState {
            slack: [[f64::INFINITY; 2]; 2],
        });
        state.slack[0][mm as usize].min(state.slack[1][mm as usize])
    }

    fn vertex_slacks(&self, vertex: VertexId) -> SlackMatrix {
        self.vertex_states
            .get(&vertex)
            .copied()
            .unwrap_or(VertexState {
                slack: [[f64::INFINITY; 2]; 2],
            })
            .slack
    }

    fn check_slew(&self, pin: PinId) -> LimitCheck {
        let limit = self.slew_limits.get(&pin).copied().unwrap_or(f64::INFINITY);
        LimitCheck {
            value: 0.0,
            limit,
            slack: limit,
        }
    }

    fn check_capacitance(&self, pin: PinId) -> LimitCheck {
        let value = self.load_caps.get(&pin).copied().unwrap_or(0.0);
        let limit = self.cap_limits.get(&pin).copied().unwrap_or(f64::INFINITY);
        LimitCheck {
            value,
            limit,
            slack: limit - value,
        }
    }

    fn check_fanout(&self, pin: PinId) -> LimitCheck {
        let vertex = self.vertex_of_pin(pin);
        let value = self.fanout.get(&vertex).map(Vec::len).unwrap_or(0) as f64;
        let limit = self.fanout_limits.get(&pin).copied().unwrap_or(f64::INFINITY);
        LimitCheck {
            value,
            limit,
            slack: limit - value,
        }
    }

    fn find_requireds(&mut self) {
        self.find_requireds_calls += 1;
    }

    fn find_delays(&mut self) {
        self.find_delays_calls += 1;
    }

    fn equiv_cells(&self, cell: CellId) -> Vec<CellId> {
        self.equiv.get(&cell).cloned().unwrap_or_default()
    }

    fn is_clock(&self, net: NetId) -> bool {
        self.clocks.contains(&net)
    }

    fn is_register_clock_pin(&self, vertex: VertexId) -> bool {
        self.register_clock_vertices.contains(&vertex)
    }

    fn fanin_drivers(&self, vertex: VertexId) -> Vec<VertexId> {
        self.fanin.get(&vertex).cloned().unwrap_or_default()
    }

    fn fanout_loads(&self, vertex: VertexId) -> Vec<VertexId> {
        self.fanout.get(&vertex).cloned().unwrap_or_default()
    }

    fn pin_of_vertex(&self, vertex: VertexId) -> PinId {
        PinId::from_raw(vertex.as_raw())
    }

    fn delays_invalid(&mut self) {}

    fn arrivals_invalid(&mut self) {}

    fn delete_parasitics(&mut self, net: NetId) {
        self.parasitics.remove(&net);
    }

    fn has_parasitics(&self, net: NetId) -> bool {
        self.parasitics.contains_key(&net)
    }

    fn set_parasitics(&mut self, net: NetId, model: PiElmore) {
        self.parasitics.insert(net, model);
    }
}

/// A Steiner-tree stand-in that connects every load directly to the driver
/// (a star topology). Adequate for exercising repair-walk logic on individual
/// branches; not a real rectilinear Steiner minimal tree.
#[derive(Default)]
pub struct FakeSteiner;

impl FakeSteiner {
    /// Creates the fake.
    pub fn new() -> Self {
        Self
    }
}

impl Steiner for FakeSteiner {
    fn make_tree(&self, net: NetId, netlist: &dyn Netlist) -> Option<SteinerTree> {
        let pins = netlist.pins_of_net(net);
        let driver = pins.iter().copied().find(|&p| netlist.is_driver_pin(p))?;
        let loads: Vec<PinId> = pins.iter().copied().filter(|&p| p != driver).collect();
        if loads.is_empty() {
            return None;
        }

        let mut builder = SteinerTreeBuilder::new();
        let root = SteinerPtId::from_raw(0);
        let driver_loc = netlist.pin_location(driver);
        builder.add_point(root, driver_loc, Some(driver));
        builder.set_root(root);

        for (i, &load) in loads.iter().enumerate() {
            let pt = SteinerPtId::from_raw(i as u32 + 1);
            let load_loc = netlist.pin_location(load);
            builder.add_point(pt, load_loc, Some(load));
            let length = Point::manhattan(driver_loc, load_loc);
            builder.add_child(root, pt, length);
        }

        Some(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_cell(netlist: &mut FakeNetlist) -> CellId {
        netlist.add_cell(
            "BUF_X1",
            true,
            false,
            false,
            1.0,
            &[("A", Direction::Input), ("Y", Direction::Output)],
            &[TimingArc {
                input_pin_cap: 1e-15,
                is_check: false,
                is_tristate: false,
            }],
        )
    }

    #[test]
    fn connect_and_query_roundtrip() {
        let mut netlist = FakeNetlist::new();
        let buf = buffer_cell(&mut netlist);
        let inst = netlist.add_instance("buf0", buf, Point::new(10, 10));
        let net = netlist.make_net("n0");
        let pins = netlist.pins_of_instance(inst);
        let a_pin = netlist.connect_pin(inst, "A", net);
        assert_eq!(pins[0], a_pin);
        assert_eq!(netlist.net_of(a_pin), Some(net));
        assert_eq!(netlist.pins_of_net(net), vec![a_pin]);
        assert!(netlist.is_load_pin(a_pin));
        assert_eq!(netlist.port_name(a_pin), "A");
    }

    #[test]
    fn fake_timer_rc_delay_model() {
        let mut netlist = FakeNetlist::new();
        let buf = buffer_cell(&mut netlist);
        let mut timer = FakeTimer::new();
        timer.set_cell_timing(buf, 0.01, 1.0e9, 1e-15);
        let (delay, rise, fall) = timer.gate_delay(buf, 0.0, 2e-15);
        assert!((delay - (0.01 + 1.0e9 * 2e-15)).abs() < 1e-12);
        assert_eq!(rise, fall);
        let _ = &netlist;
    }

    #[test]
    fn fake_steiner_star_topology() {
        let mut netlist = FakeNetlist::new();
        let buf = buffer_cell(&mut netlist);
        let drvr_inst = netlist.add_instance("d", buf, Point::new(0, 0));
        let load_inst = netlist.add_instance("l", buf, Point::new(100, 0));
        let net = netlist.make_net("n");
        netlist.connect_pin(drvr_inst, "Y", net);
        netlist.connect_pin(load_inst, "A", net);

        let steiner = FakeSteiner::new();
        let tree = steiner.make_tree(net, &netlist).unwrap();
        let branches = tree.branches();
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].length_dbu, 100);
    }
}
