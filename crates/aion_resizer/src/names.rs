//! Collision-free name generation for inserted nets and instances.
//!
//! The CORE mints names such as `net_42` or `buf_17` for every repeater,
//! tie cell, and clock clone it inserts. [`UniqueIndex`] remembers the next
//! candidate suffix per prefix so successive calls don't restart the search
//! from zero, then probes [`Netlist`] to skip any name a human or an earlier
//! pass already claimed.

use std::collections::HashMap;

use crate::ports::Netlist;

/// Tracks the next untried numeric suffix for each name prefix handed out
/// by this CORE instance.
#[derive(Default, Debug)]
pub struct UniqueIndex {
    next_suffix: HashMap<String, u64>,
}

impl UniqueIndex {
    /// Creates an index with no history; the first name for any prefix will
    /// try suffix `1`.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_candidate(&mut self, prefix: &str) -> String {
        let suffix = self.next_suffix.entry(prefix.to_string()).or_insert(0);
        *suffix += 1;
        format!("{prefix}_{suffix}")
    }

    /// Generates a net name starting with `prefix` that does not already
    /// name a net in `netlist`.
    pub fn make_unique_net_name(&mut self, prefix: &str, netlist: &dyn Netlist) -> String {
        loop {
            let candidate = self.next_candidate(prefix);
            if netlist.find_net(&candidate).is_none() {
                return candidate;
            }
        }
    }

    /// Generates an instance name starting with `prefix` that does not
    /// already name an instance in `netlist`.
    pub fn make_unique_instance_name(&mut self, prefix: &str, netlist: &dyn Netlist) -> String {
        loop {
            let candidate = self.next_candidate(prefix);
            if netlist.find_instance(&candidate).is_none() {
                return candidate;
            }
        }
    }
}
