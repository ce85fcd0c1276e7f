//! Port buffer insertion: isolates top-level input and output ports behind a
//! dedicated buffer so the sizer never has to distinguish a port load or
//! driver from an ordinary gate's.
//!
//! `buffer_inputs` and `buffer_outputs` are idempotent per port: a port
//! already driving (or driven through) exactly one buffer is left alone.

use crate::ids::CellId;
use crate::names::UniqueIndex;
use crate::ports::{Direction, Netlist, Timer};
use crate::repeater::insert_repeater;

/// Inserts a buffer behind every top-level input port that doesn't already
/// have one, so internal loads are driven by a buffer instance rather than
/// directly by the port. Returns the number of buffers inserted.
pub fn buffer_inputs(
    buffer_cell: CellId,
    names: &mut UniqueIndex,
    netlist: &mut dyn Netlist,
    timer: &mut dyn Timer,
) -> u32 {
    let ports = netlist.top_ports(Direction::Input);
    let mut inserted = 0;
    for port in ports {
        if port_already_buffered(port, netlist) {
            continue;
        }
        let Some(port_net) = netlist.net_of(port) else {
            continue;
        };
        let loads: Vec<_> = netlist
            .pins_of_net(port_net)
            .into_iter()
            .filter(|&p| p != port)
            .collect();
        if loads.is_empty() {
            continue;
        }

        let loc = netlist.pin_location(port);
        let rep = insert_repeater(buffer_cell, loc, "input", names, netlist);

        let out_net = names.make_unique_net_name("net", netlist);
        let out_net = netlist.make_net(&out_net);
        for load in loads {
            netlist.disconnect_pin(load);
            reconnect(load, out_net, netlist);
        }
        reconnect(rep.input, port_net, netlist);
        reconnect(rep.output, out_net, netlist);

        timer.delays_invalid();
        timer.arrivals_invalid();
        inserted += 1;
    }
    inserted
}

/// Inserts a buffer ahead of every top-level output port that doesn't already
/// have one, so the port is driven by a dedicated buffer rather than directly
/// by an internal gate. Returns the number of buffers inserted.
pub fn buffer_outputs(
    buffer_cell: CellId,
    names: &mut UniqueIndex,
    netlist: &mut dyn Netlist,
    timer: &mut dyn Timer,
) -> u32 {
    let ports = netlist.top_ports(Direction::Output);
    let mut inserted = 0;
    for port in ports {
        if port_already_buffered(port, netlist) {
            continue;
        }
        let Some(port_net) = netlist.net_of(port) else {
            continue;
        };
        let drivers: Vec<_> = netlist
            .pins_of_net(port_net)
            .into_iter()
            .filter(|&p| p != port && netlist.is_driver_pin(p))
            .collect();
        if drivers.is_empty() {
            continue;
        }

        let loc = netlist.pin_location(port);
        let rep = insert_repeater(buffer_cell, loc, "output", names, netlist);

        let in_net = names.make_unique_net_name("net", netlist);
        let in_net = netlist.make_net(&in_net);
        for driver in drivers {
            netlist.disconnect_pin(driver);
            reconnect(driver, in_net, netlist);
        }
        reconnect(rep.input, in_net, netlist);
        reconnect(rep.output, port_net, netlist);

        timer.delays_invalid();
        timer.arrivals_invalid();
        inserted += 1;
    }
    inserted
}

/// A port is considered already buffered if it sits alone on its net with
/// exactly one instance pin attached that belongs to a buffer or inverter.
fn port_already_buffered(port: crate::ids::PinId, netlist: &dyn Netlist) -> bool {
    let Some(net) = netlist.net_of(port) else {
        return false;
    };
    let others: Vec<_> = netlist
        .pins_of_net(net)
        .into_iter()
        .filter(|&p| p != port)
        .collect();
    if others.len() != 1 {
        return false;
    }
    let Some(inst) = netlist.instance_of_pin(others[0]) else {
        return false;
    };
    let cell = netlist.cell_of_instance(inst);
    netlist.is_buffer(cell) || netlist.is_inverter(cell)
}

fn reconnect(pin: crate::ids::PinId, net: crate::ids::NetId, netlist: &mut dyn Netlist) {
    if let Some(inst) = netlist.instance_of_pin(pin) {
        let port = netlist.port_name(pin);
        netlist.connect_pin(inst, &port, net);
    }
}
