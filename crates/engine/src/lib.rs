//! Quality-signal evaluation engine.
//!
//! Selects the applicable signal sets for a document, runs each signal
//! under a wall-clock deadline, and merges per-signal scores, timings,
//! and errors into one serialized verdict. The public entry point
//! never raises; every failure mode degrades into verdict content.

#![warn(missing_docs)]

mod aggregate;
mod bounded;
mod engine;
mod registry;

pub use bounded::run_bounded;
pub use engine::Engine;
pub use registry::SignalRegistry;
