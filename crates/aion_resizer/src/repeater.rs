//! Shared helper for inserting a single buffering instance, used by the port
//! buffer inserter, tie fanout repairer, net repair walker, and hold
//! repairer.
//!
//! A "repeater" here is any two-pin (buffer or inverter) cell inserted to
//! break a net into two, driven by a fresh instance placed at a chosen
//! location. Naming and graph bookkeeping are identical across all four call
//! sites; only the placement and which loads move differ.

use crate::geometry::Point;
use crate::ids::{InstanceId, PinId};
use crate::names::UniqueIndex;
use crate::ports::{Direction, Netlist};

/// The pins of a freshly inserted two-pin repeater instance.
#[derive(Clone, Copy, Debug)]
pub struct Repeater {
    /// The instance itself.
    pub instance: InstanceId,
    /// Its input pin.
    pub input: PinId,
    /// Its output pin.
    pub output: PinId,
}

/// Creates an instance of `cell` (must be a buffer or inverter, i.e. have
/// exactly one input and one output port) at `loc`, named from `prefix`, with
/// both pins left unconnected.
pub fn insert_repeater(
    cell: crate::ids::CellId,
    loc: Point,
    prefix: &str,
    names: &mut UniqueIndex,
    netlist: &mut dyn Netlist,
) -> Repeater {
    let name = names.make_unique_instance_name(prefix, netlist);
    let instance = netlist.make_instance(&name, cell, loc);
    let pins = netlist.pins_of_instance(instance);
    let input = pins
        .iter()
        .copied()
        .find(|&p| netlist.direction(p) == Direction::Input)
        .expect("repeater cell must have an input pin");
    let output = pins
        .iter()
        .copied()
        .find(|&p| netlist.direction(p) == Direction::Output)
        .expect("repeater cell must have an output pin");
    Repeater {
        instance,
        input,
        output,
    }
}
