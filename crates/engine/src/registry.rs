//! Signal registry - the applicability partition, built once.

use std::collections::HashMap;
use std::sync::Arc;

use sift_core::{Applicability, ProgramLang, Signal};

/// All registered signals, partitioned by applicability class.
///
/// Built once at startup and read-only afterwards; no synchronization
/// is needed post-initialization.
pub struct SignalRegistry {
    code: Vec<Arc<dyn Signal>>,
    text: Vec<Arc<dyn Signal>>,
    by_language: HashMap<ProgramLang, Vec<Arc<dyn Signal>>>,
}

impl SignalRegistry {
    /// Partition `signals` by their declared applicability.
    ///
    /// The partition is strict and disjoint: each signal lands in
    /// exactly one class plus at most one language bucket. A signal
    /// declared for [`ProgramLang::None`] lands in no bucket and never
    /// runs.
    pub fn new(signals: Vec<Arc<dyn Signal>>) -> Self {
        let mut code = Vec::new();
        let mut text = Vec::new();
        let mut by_language: HashMap<ProgramLang, Vec<Arc<dyn Signal>>> = HashMap::new();

        for signal in signals {
            match signal.applicability() {
                Applicability::Code => code.push(signal),
                Applicability::Text => text.push(signal),
                Applicability::Language(ProgramLang::None) => {
                    tracing::debug!(signal = signal.name(), "no language bucket, skipped");
                }
                Applicability::Language(lang) => {
                    by_language.entry(lang).or_default().push(signal);
                }
            }
        }

        Self {
            code,
            text,
            by_language,
        }
    }

    /// Signals applicable to every code or data document.
    pub fn code_signals(&self) -> &[Arc<dyn Signal>] {
        &self.code
    }

    /// Signals applicable to text documents.
    pub fn text_signals(&self) -> &[Arc<dyn Signal>] {
        &self.text
    }

    /// Signals specific to one programming language; empty if none
    /// are registered for it.
    pub fn language_signals(&self, lang: ProgramLang) -> &[Arc<dyn Signal>] {
        self.by_language
            .get(&lang)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of registered signals across all buckets.
    pub fn len(&self) -> usize {
        self.code.len()
            + self.text.len()
            + self.by_language.values().map(Vec::len).sum::<usize>()
    }

    /// Whether no signals are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
