//! Gate-level netlist resizing: gate sizing, buffer insertion, wire and hold
//! repair, and clock inverter cloning, built on top of opaque timing,
//! netlist, and Steiner-tree services.
//!
//! This crate implements only the CORE decision logic. It never performs
//! static timing analysis, owns the physical database, or builds Steiner
//! trees itself — those are the [`ports::Timer`], [`ports::Netlist`], and
//! [`ports::Steiner`] services, consumed as trait objects so a real EDA
//! toolchain or a test fake can sit behind them interchangeably.

#![warn(missing_docs)]

pub mod clock_clone;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hold_repair;
pub mod ids;
pub mod names;
pub mod net_repair;
pub mod parasitics;
pub mod port_buffer;
pub mod ports;
pub mod queries;
pub mod repeater;
pub mod resizer;
pub mod sizer;
pub mod target_load;
pub mod tie_fanout;

#[cfg(test)]
pub mod testing;

pub use config::{ResizerConfig, WireRc};
pub use ports::{Netlist, Steiner, Timer};
pub use resizer::{Counters, Resizer};
