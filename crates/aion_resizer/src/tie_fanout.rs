//! Tie fanout repair: replaces one tie cell driving many loads with one tie
//! cell duplicated next to each load.
//!
//! A single tie cell (a constant-0 or constant-1 driver) fanning out across
//! the whole design wastes wire and adds needless capacitance to a net that
//! never switches. Duplicating it collapses every tie net back down to a
//! single pin.

use crate::geometry::{Point, Rect};
use crate::ids::{CellId, InstanceId};
use crate::names::UniqueIndex;
use crate::ports::Netlist;
use crate::repeater::insert_repeater;

/// Chooses where to place a tie cell duplicated for one load: the load's own
/// location, clamped into the placeable core area if one is defined.
pub fn tie_location(load_loc: Point, core_area: Option<Rect>) -> Point {
    match core_area {
        Some(rect) => rect.closest_point(load_loc),
        None => load_loc,
    }
}

/// Duplicates every tie instance of `tie_cell` that fans out to more than one
/// load, giving each load its own tie instance and deleting the original.
/// Returns the number of tie instances inserted.
pub fn repair_tie_fanout(tie_cell: CellId, names: &mut UniqueIndex, netlist: &mut dyn Netlist) -> u32 {
    let core_area = netlist.core_area();
    let tie_instances: Vec<InstanceId> = netlist
        .all_instances()
        .into_iter()
        .filter(|&inst| netlist.cell_of_instance(inst) == tie_cell)
        .collect();

    let mut inserted = 0;
    for tie_inst in tie_instances {
        let output = netlist
            .pins_of_instance(tie_inst)
            .into_iter()
            .find(|&p| netlist.is_driver_pin(p))
            .expect("tie cell must have an output pin");
        let Some(tie_net) = netlist.net_of(output) else {
            continue;
        };
        let loads: Vec<_> = netlist
            .pins_of_net(tie_net)
            .into_iter()
            .filter(|&p| p != output)
            .collect();
        if loads.len() <= 1 {
            continue;
        }

        for load in loads {
            let load_loc = netlist.pin_location(load);
            let loc = tie_location(load_loc, core_area);
            let rep = insert_repeater(tie_cell, loc, "tie", names, netlist);
            let new_net_name = names.make_unique_net_name("tienet", netlist);
            let new_net = netlist.make_net(&new_net_name);

            netlist.disconnect_pin(load);
            let port = netlist.port_name(load);
            let inst = netlist
                .instance_of_pin(load)
                .expect("tie loads are always instance pins");
            netlist.connect_pin(inst, &port, new_net);

            let out_port = netlist.port_name(rep.output);
            netlist.connect_pin(rep.instance, &out_port, new_net);
            inserted += 1;
        }

        netlist.disconnect_pin(output);
        netlist.delete_instance(tie_inst);
        netlist.delete_net(tie_net);
    }
    inserted
}
