//! Clock inverter cloning: duplicates a clock-tree inverter that fans out to
//! multiple loads so each load gets its own driver, the same fanout-collapse
//! idea as [`crate::tie_fanout`] applied to the clock network instead of tie
//! cells.

use std::collections::{HashSet, VecDeque};

use crate::ids::{InstanceId, PinId, VertexId};
use crate::names::UniqueIndex;
use crate::ports::Netlist;
use crate::ports::Timer;
use crate::repeater::insert_repeater;

/// Walks the clock network reachable from `clock_root`, stopping at register
/// clock pins, and clones every inverter instance along the way whose output
/// drives more than one load. Returns the number of inverter instances
/// inserted.
pub fn clone_clock_inverters(
    clock_root: PinId,
    names: &mut UniqueIndex,
    netlist: &mut dyn Netlist,
    timer: &mut dyn Timer,
) -> u32 {
    let inverter_instances = find_clock_inverters(clock_root, netlist, timer);
    let mut inserted = 0;
    for inst in inverter_instances {
        inserted += clone_inverter_per_load(inst, names, netlist);
    }
    inserted
}

fn find_clock_inverters(clock_root: PinId, netlist: &dyn Netlist, timer: &dyn Timer) -> Vec<InstanceId> {
    let mut visited: HashSet<VertexId> = HashSet::new();
    let mut queue: VecDeque<VertexId> = VecDeque::new();
    queue.push_back(timer.vertex_of_pin(clock_root));

    let mut found = Vec::new();
    while let Some(v) = queue.pop_front() {
        if !visited.insert(v) {
            continue;
        }
        if timer.is_register_clock_pin(v) {
            continue;
        }

        let pin = timer.pin_of_vertex(v);
        if netlist.is_driver_pin(pin) {
            if let Some(inst) = netlist.instance_of_pin(pin) {
                let cell = netlist.cell_of_instance(inst);
                if netlist.is_inverter(cell) {
                    found.push(inst);
                }
            }
        }

        for load_v in timer.fanout_loads(v) {
            queue.push_back(load_v);
        }
    }
    found
}

/// Duplicates `inst` (an inverter) once per load on its output net, wiring
/// each clone's input to the original driving net, then deletes `inst` and
/// its now-empty output net. Does nothing if the output has at most one load.
fn clone_inverter_per_load(inst: InstanceId, names: &mut UniqueIndex, netlist: &mut dyn Netlist) -> u32 {
    let cell = netlist.cell_of_instance(inst);
    let pins = netlist.pins_of_instance(inst);
    let output = pins.iter().copied().find(|&p| netlist.is_driver_pin(p)).expect("inverter has an output");
    let input = pins.iter().copied().find(|&p| netlist.is_load_pin(p)).expect("inverter has an input");
    let Some(input_net) = netlist.net_of(input) else {
        return 0;
    };
    let Some(output_net) = netlist.net_of(output) else {
        return 0;
    };

    let loads: Vec<_> = netlist
        .pins_of_net(output_net)
        .into_iter()
        .filter(|&p| p != output)
        .collect();
    if loads.len() <= 1 {
        return 0;
    }

    let mut inserted = 0;
    for load in loads {
        let loc = netlist.pin_location(load);
        let rep = insert_repeater(cell, loc, "clkinv", names, netlist);

        let out_net_name = names.make_unique_net_name("clknet", netlist);
        let out_net = netlist.make_net(&out_net_name);

        netlist.disconnect_pin(load);
        let port = netlist.port_name(load);
        let load_inst = netlist.instance_of_pin(load).expect("clock load pin has an owning instance");
        netlist.connect_pin(load_inst, &port, out_net);

        let rep_in_port = netlist.port_name(rep.input);
        netlist.connect_pin(rep.instance, &rep_in_port, input_net);
        let rep_out_port = netlist.port_name(rep.output);
        netlist.connect_pin(rep.instance, &rep_out_port, out_net);

        inserted += 1;
    }

    netlist.disconnect_pin(output);
    netlist.delete_instance(inst);
    netlist.delete_net(output_net);
    inserted
}
