//! Sift core data models.
//!
//! This crate defines the data structures shared by the quality-signal
//! evaluation engine: the document under evaluation, the signal
//! capability, per-signal outcomes, the final verdict, and the engine
//! configuration surface.

#![warn(missing_docs)]

// Document under evaluation
mod document;

// Signal capability and outcomes
mod outcome;
mod signal;

// Verdict and configuration
mod config;
mod truncate;
mod verdict;

pub use config::{EngineConfig, Enforcement};
pub use document::{DocType, Document, ProgramLang};
pub use outcome::SignalOutcome;
pub use signal::{Applicability, ScoreValue, Signal};
pub use truncate::truncate_error;
pub use verdict::Verdict;
