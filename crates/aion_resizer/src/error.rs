//! CORE error taxonomy.
//!
//! Two kinds of failure an entry point can report, both carried as
//! [`aion_common::AionResult`] — there is no resizer-specific error type:
//! a missing or empty required input (caught before any instance is
//! touched), and an internal-invariant violation (a NETLIST/TIMER result the
//! CORE does not expect, tagged with the call site that found it).
//!
//! Recoverable, user-facing conditions (area-exceeded abort, stale
//! parasitics) are not errors at all; they go through
//! [`aion_diagnostics::DiagnosticSink`] instead, same as `aion_timing::sta`.

use aion_common::InternalError;

/// A required input (resize library, buffer cell list) was empty. Always
/// caught before any edit is made.
pub fn configuration_error(detail: impl Into<String>) -> InternalError {
    InternalError::new(format!("configuration error: {}", detail.into()))
}

/// An invariant the CORE assumes NETLIST upholds did not hold, tagged with
/// the call site that discovered it.
pub fn internal_error(site: &str, detail: impl Into<String>) -> InternalError {
    InternalError::new(format!("{site}: {}", detail.into()))
}
