//! Resizer configuration surface.
//!
//! Mirrors the teacher's `aion_config` style: plain data, `serde(default)` on
//! every field, one doc comment per field. Loading this from a file or CLI
//! flags is outside the CORE's scope; callers construct it directly.

use serde::{Deserialize, Serialize};

/// Per-unit-length wire resistance and capacitance, used by the parasitic
/// estimator. Signal and clock nets may use different RC models.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct WireRc {
    /// Signal wire resistance, ohms per meter.
    #[serde(default = "default_wire_res")]
    pub wire_res: f64,
    /// Signal wire capacitance, farads per meter.
    #[serde(default = "default_wire_cap")]
    pub wire_cap: f64,
    /// Clock wire resistance, ohms per meter.
    #[serde(default = "default_wire_res")]
    pub wire_clk_res: f64,
    /// Clock wire capacitance, farads per meter.
    #[serde(default = "default_wire_cap")]
    pub wire_clk_cap: f64,
}

fn default_wire_res() -> f64 {
    2.5e3
}

fn default_wire_cap() -> f64 {
    1.6e-10
}

impl Default for WireRc {
    fn default() -> Self {
        Self {
            wire_res: default_wire_res(),
            wire_cap: default_wire_cap(),
            wire_clk_res: default_wire_res(),
            wire_clk_cap: default_wire_cap(),
        }
    }
}

/// Top-level resizer configuration, set once per CORE instance.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizerConfig {
    /// Wire RC model used by the parasitic estimator.
    pub wire_rc: WireRc,
    /// Fraction of the core area instances may occupy, in `(0.0, 1.0]`.
    pub max_utilization: f64,
    /// Library cell names excluded from sizing and repair insertion.
    pub dont_use: Vec<String>,
    /// Minimum Manhattan separation enforced between inserted repeaters, meters.
    pub separation: f64,
    /// Nets longer than this (meters) are eligible for long-wire repair.
    pub max_wire_length: f64,
    /// If `true`, hold repair may trade setup slack for hold slack up to zero.
    pub allow_setup_violations: bool,
}

impl Default for ResizerConfig {
    fn default() -> Self {
        Self {
            wire_rc: WireRc::default(),
            max_utilization: 1.0,
            dont_use: Vec::new(),
            separation: 0.0,
            max_wire_length: f64::INFINITY,
            allow_setup_violations: false,
        }
    }
}
