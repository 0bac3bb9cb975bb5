//! Built-in quality signals.
//!
//! Small, deterministic heuristics over document content. The engine
//! does not care which signals exist; this crate provides a usable
//! default set plus [`FnSignal`] for wrapping plain functions as
//! signals.

#![warn(missing_docs)]

mod code;
mod lang;
mod text;

use std::sync::Arc;

use sift_core::{Applicability, Document, ProgramLang, ScoreValue, Signal};

/// A signal backed by a plain function.
pub struct FnSignal {
    name: &'static str,
    applicability: Applicability,
    score: fn(&Document) -> anyhow::Result<ScoreValue>,
}

impl FnSignal {
    /// Wrap `score` as a named signal.
    pub fn new(
        name: &'static str,
        applicability: Applicability,
        score: fn(&Document) -> anyhow::Result<ScoreValue>,
    ) -> Self {
        Self {
            name,
            applicability,
            score,
        }
    }
}

impl Signal for FnSignal {
    fn name(&self) -> &str {
        self.name
    }

    fn applicability(&self) -> Applicability {
        self.applicability
    }

    fn score(&self, doc: &Document) -> anyhow::Result<ScoreValue> {
        (self.score)(doc)
    }
}

/// The default signal set.
pub fn builtin_signals() -> Vec<Arc<dyn Signal>> {
    vec![
        // Generic code signals
        Arc::new(FnSignal::new(
            "qsc_code_size_file_byte",
            Applicability::Code,
            code::size_file_byte,
        )),
        Arc::new(FnSignal::new(
            "qsc_code_num_lines",
            Applicability::Code,
            code::num_lines,
        )),
        Arc::new(FnSignal::new(
            "qsc_code_num_chars_line_max",
            Applicability::Code,
            code::num_chars_line_max,
        )),
        Arc::new(FnSignal::new(
            "qsc_code_num_chars_line_mean",
            Applicability::Code,
            code::num_chars_line_mean,
        )),
        Arc::new(FnSignal::new(
            "qsc_code_frac_chars_alphabet",
            Applicability::Code,
            code::frac_chars_alphabet,
        )),
        Arc::new(FnSignal::new(
            "qsc_code_frac_lines_dupe_lines",
            Applicability::Code,
            code::frac_lines_dupe_lines,
        )),
        Arc::new(FnSignal::new(
            "qsc_code_cate_autogen",
            Applicability::Code,
            code::cate_autogen,
        )),
        // Language-specific signals
        Arc::new(FnSignal::new(
            "qsc_codepython_frac_lines_import",
            Applicability::Language(ProgramLang::Python),
            lang::python_frac_lines_import,
        )),
        Arc::new(FnSignal::new(
            "qsc_codego_num_func",
            Applicability::Language(ProgramLang::Go),
            lang::go_num_func,
        )),
        Arc::new(FnSignal::new(
            "qsc_codehtml_frac_chars_text",
            Applicability::Language(ProgramLang::Html),
            lang::html_frac_chars_text,
        )),
        // Text signals
        Arc::new(FnSignal::new(
            "qsc_doc_num_words",
            Applicability::Text,
            text::num_words,
        )),
        Arc::new(FnSignal::new(
            "qsc_doc_mean_word_length",
            Applicability::Text,
            text::mean_word_length,
        )),
        Arc::new(FnSignal::new(
            "qsc_doc_frac_unique_words",
            Applicability::Text,
            text::frac_unique_words,
        )),
    ]
}
