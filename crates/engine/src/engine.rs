//! Evaluation engine - classification and dispatch.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use sift_core::{
    truncate_error, DocType, Document, EngineConfig, ScoreValue, Signal, SignalOutcome, Verdict,
};
use sift_syntax::{signal_name, SyntaxError, SyntaxValidator};

use crate::aggregate;
use crate::bounded::{panic_message, run_bounded};
use crate::registry::SignalRegistry;

/// Quality-signal evaluation engine.
///
/// Stateless per call: only the registry and the validator's parser
/// instances persist across calls, read-only. One instance serves one
/// thread at a time; run several instances (sharing one registry) for
/// cross-document parallelism, since parser instances are not safe for
/// concurrent use.
pub struct Engine {
    registry: Arc<SignalRegistry>,
    validator: SyntaxValidator,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine over `registry` with `config`.
    pub fn new(registry: Arc<SignalRegistry>, config: EngineConfig) -> Result<Self, SyntaxError> {
        Ok(Self {
            registry,
            validator: SyntaxValidator::new()?,
            config,
        })
    }

    /// Evaluate one document and return the serialized verdict.
    ///
    /// Never panics and never returns an error: a failure that escapes
    /// per-signal containment degrades into a verdict holding a single
    /// `total_crush` error record.
    pub fn evaluate(&mut self, doc: Document) -> String {
        let budget = self.config.error_budget;
        let verdict = match panic::catch_unwind(AssertUnwindSafe(|| self.evaluate_inner(doc))) {
            Ok(verdict) => verdict,
            Err(payload) => {
                let message = truncate_error(&panic_message(payload.as_ref()), budget);
                tracing::error!(error = %message, "evaluation crashed");
                Verdict::catastrophic(message)
            }
        };
        aggregate::serialize(&verdict)
    }

    /// Classification branch and dispatch loop.
    fn evaluate_inner(&mut self, doc: Document) -> Verdict {
        let doc = Arc::new(doc);
        let mut scores = BTreeMap::new();
        let mut errors = BTreeMap::new();
        let mut timings = BTreeMap::new();

        match doc.doc_type {
            DocType::Unknown => {}
            DocType::Code | DocType::Data => {
                let registry = Arc::clone(&self.registry);
                self.run_set(registry.code_signals(), &doc, &mut scores, &mut errors, &mut timings);
                self.run_set(
                    registry.language_signals(doc.program_lang),
                    &doc,
                    &mut scores,
                    &mut errors,
                    &mut timings,
                );
                self.run_syntax_check(&doc, &mut scores, &mut errors);
            }
            DocType::Text => {
                let registry = Arc::clone(&self.registry);
                self.run_set(registry.text_signals(), &doc, &mut scores, &mut errors, &mut timings);
            }
        }

        aggregate::assemble(scores, errors, timings)
    }

    /// Run one signal set sequentially, recording every outcome.
    fn run_set(
        &self,
        signals: &[Arc<dyn Signal>],
        doc: &Arc<Document>,
        scores: &mut BTreeMap<String, ScoreValue>,
        errors: &mut BTreeMap<String, String>,
        timings: &mut BTreeMap<String, f64>,
    ) {
        for signal in signals {
            let name = signal.name().to_string();
            let deadline = self.config.deadline_for(&name);
            tracing::debug!(signal = %name, ?deadline, "running signal");

            let (outcome, elapsed) = run_bounded(
                self.config.enforcement,
                signal,
                doc,
                deadline,
                self.config.error_budget,
            );

            scores.insert(name.clone(), outcome.score());
            timings.insert(name.clone(), aggregate::round_elapsed(elapsed.as_secs_f64()));

            match outcome {
                SignalOutcome::Scored(_) => {}
                SignalOutcome::TimedOut { deadline } => {
                    tracing::warn!(signal = %name, ?deadline, "signal timed out");
                    let message =
                        format!("[WARN] {name} time out error, time set: {}", deadline.as_secs_f64());
                    errors.insert(name, truncate_error(&message, self.config.error_budget));
                }
                SignalOutcome::Failed { message } => {
                    tracing::warn!(signal = %name, error = %message, "signal failed");
                    let full = format!("[WARN] qname: {name}, Exception: {message}");
                    errors.insert(name, truncate_error(&full, self.config.error_budget));
                }
            }
        }
    }

    /// Record syntax validity as one additional named signal outcome.
    ///
    /// Runs only when a parser exists for the document's language; the
    /// parse itself is not dispatched through the timeout machinery.
    fn run_syntax_check(
        &mut self,
        doc: &Arc<Document>,
        scores: &mut BTreeMap<String, ScoreValue>,
        errors: &mut BTreeMap<String, String>,
    ) {
        if !self.validator.supports(doc.program_lang) {
            return;
        }

        let valid = self
            .validator
            .is_valid(doc.content.as_bytes(), doc.program_lang);
        let name = signal_name(doc.program_lang);
        scores.insert(name.clone(), Some(if valid { 1.0 } else { 0.0 }));
        if !valid {
            errors.insert(name, format!("[ERROR] {} syntax error", doc.program_lang));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::{Applicability, ProgramLang};
    use std::time::Duration;

    struct TestSignal {
        name: &'static str,
        applicability: Applicability,
        sleep: Option<Duration>,
    }

    impl Signal for TestSignal {
        fn name(&self) -> &str {
            self.name
        }

        fn applicability(&self) -> Applicability {
            self.applicability
        }

        fn score(&self, doc: &Document) -> anyhow::Result<ScoreValue> {
            if let Some(duration) = self.sleep {
                std::thread::sleep(duration);
            }
            Ok(Some(doc.content.lines().count() as f64))
        }
    }

    /// Panics before scoring even starts; used to breach per-signal
    /// containment and exercise the catastrophic path.
    struct HostileName;

    impl Signal for HostileName {
        fn name(&self) -> &str {
            panic!("hostile signal name")
        }

        fn applicability(&self) -> Applicability {
            Applicability::Code
        }

        fn score(&self, _doc: &Document) -> anyhow::Result<ScoreValue> {
            Ok(None)
        }
    }

    fn test_registry() -> Arc<SignalRegistry> {
        Arc::new(SignalRegistry::new(vec![
            Arc::new(TestSignal {
                name: "qsc_code_num_lines",
                applicability: Applicability::Code,
                sleep: None,
            }),
            Arc::new(TestSignal {
                name: "qsc_codego_num_lines",
                applicability: Applicability::Language(ProgramLang::Go),
                sleep: None,
            }),
            Arc::new(TestSignal {
                name: "qsc_doc_num_lines",
                applicability: Applicability::Text,
                sleep: None,
            }),
        ]))
    }

    fn engine() -> Engine {
        Engine::new(test_registry(), EngineConfig::default()).unwrap()
    }

    fn doc(content: &str, doc_type: DocType, program_lang: ProgramLang) -> Document {
        Document::new(
            content,
            "input",
            "en",
            "",
            content.len() as u64,
            program_lang,
            doc_type,
        )
    }

    fn parse(json: &str) -> serde_json::Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn unknown_document_yields_an_empty_verdict() {
        let out = engine().evaluate(doc("anything", DocType::Unknown, ProgramLang::Go));
        let v = parse(&out);
        assert_eq!(v["quality_signal"], serde_json::json!({}));
        assert_eq!(v["pre_hit"], serde_json::json!("0"));
        assert!(v.get("err_msg").is_none());
        assert!(v.get("time_map").is_none());
    }

    #[test]
    fn code_document_runs_generic_language_and_syntax_signals() {
        let out = engine().evaluate(doc(
            "package main\nfunc main() {}",
            DocType::Code,
            ProgramLang::Go,
        ));
        let v = parse(&out);
        assert_eq!(v["quality_signal"]["qsc_code_num_lines"], serde_json::json!(2.0));
        assert_eq!(v["quality_signal"]["qsc_codego_num_lines"], serde_json::json!(2.0));
        assert_eq!(v["quality_signal"]["qsc_syntax_go"], serde_json::json!(1.0));
        assert!(v.get("err_msg").is_none());
        assert!(v["time_map"]["qsc_code_num_lines"].as_f64().unwrap() >= 0.0);
        // The syntax check is not a dispatched signal; it has no timing.
        assert!(v["time_map"].get("qsc_syntax_go").is_none());
    }

    #[test]
    fn unbalanced_go_scores_syntax_zero_with_an_error_entry() {
        let out = engine().evaluate(doc(
            "package main\nfunc main() {",
            DocType::Code,
            ProgramLang::Go,
        ));
        let v = parse(&out);
        assert_eq!(v["quality_signal"]["qsc_syntax_go"], serde_json::json!(0.0));
        assert!(v["err_msg"]["qsc_syntax_go"]
            .as_str()
            .unwrap()
            .contains("syntax error"));
    }

    #[test]
    fn data_documents_run_code_signals() {
        let out = engine().evaluate(doc("k: v", DocType::Data, ProgramLang::None));
        let v = parse(&out);
        assert_eq!(v["quality_signal"]["qsc_code_num_lines"], serde_json::json!(1.0));
        assert!(v["quality_signal"].get("qsc_codego_num_lines").is_none());
        assert!(v["quality_signal"].get("qsc_doc_num_lines").is_none());
    }

    #[test]
    fn text_document_runs_text_signals_only() {
        let out = engine().evaluate(doc("one\ntwo", DocType::Text, ProgramLang::None));
        let v = parse(&out);
        assert_eq!(v["quality_signal"]["qsc_doc_num_lines"], serde_json::json!(2.0));
        assert!(v["quality_signal"].get("qsc_code_num_lines").is_none());
        assert!(v["quality_signal"].get("qsc_codego_num_lines").is_none());
    }

    #[test]
    fn language_signal_does_not_run_for_other_languages() {
        let out = engine().evaluate(doc(
            "print('hi')",
            DocType::Code,
            ProgramLang::Python,
        ));
        let v = parse(&out);
        assert!(v["quality_signal"].get("qsc_codego_num_lines").is_none());
        // Python has no parser, so no syntax signal appears either.
        assert!(v["quality_signal"].get("qsc_syntax_python").is_none());
    }

    #[test]
    fn evaluation_is_idempotent_for_deterministic_signals() {
        let mut e = engine();
        let first = e.evaluate(doc("a\nb\nc", DocType::Code, ProgramLang::Go));
        let second = e.evaluate(doc("a\nb\nc", DocType::Code, ProgramLang::Go));
        assert_eq!(parse(&first)["quality_signal"], parse(&second)["quality_signal"]);
    }

    #[test]
    fn over_deadline_signal_is_reported_as_timed_out() {
        let registry = Arc::new(SignalRegistry::new(vec![Arc::new(TestSignal {
            name: "qsc_code_slow",
            applicability: Applicability::Code,
            sleep: Some(Duration::from_secs(5)),
        }) as Arc<dyn Signal>]));
        let mut config = EngineConfig::default();
        config
            .deadline_overrides
            .insert("qsc_code_slow".to_string(), Duration::from_secs(1));
        let mut e = Engine::new(registry, config).unwrap();

        let out = e.evaluate(doc("x", DocType::Code, ProgramLang::None));
        let v = parse(&out);
        assert_eq!(v["quality_signal"]["qsc_code_slow"], serde_json::Value::Null);
        assert!(v["err_msg"]["qsc_code_slow"]
            .as_str()
            .unwrap()
            .contains("time set: 1"));
        assert!(v["time_map"]["qsc_code_slow"].as_f64().unwrap() >= 1.0);
    }

    #[test]
    fn failure_escaping_dispatch_degrades_to_a_catastrophic_verdict() {
        let registry = Arc::new(SignalRegistry::new(vec![
            Arc::new(HostileName) as Arc<dyn Signal>
        ]));
        let mut e = Engine::new(registry, EngineConfig::default()).unwrap();

        let out = e.evaluate(doc("x", DocType::Code, ProgramLang::None));
        let v = parse(&out);
        assert!(v["err_msg"]["total_crush"]
            .as_str()
            .unwrap()
            .contains("hostile signal name"));
        assert!(v.get("quality_signal").is_none());
    }

    #[test]
    fn entry_point_copes_with_degenerate_content() {
        let mut e = engine();
        for content in ["", "\u{0}\u{1}\u{2}", "\n\n\n", "é🦀\u{7f}"] {
            let out = e.evaluate(doc(content, DocType::Code, ProgramLang::Go));
            let v = parse(&out);
            assert!(v.get("quality_signal").is_some());
        }
    }

    #[test]
    fn builtin_signal_set_evaluates_end_to_end() {
        let registry = Arc::new(SignalRegistry::new(sift_signals::builtin_signals()));
        let mut e = Engine::new(registry, EngineConfig::default()).unwrap();

        let out = e.evaluate(doc(
            "package main\nfunc main() {}",
            DocType::Code,
            ProgramLang::Go,
        ));
        let v = parse(&out);
        assert_eq!(v["quality_signal"]["qsc_code_num_lines"], serde_json::json!(2.0));
        assert_eq!(v["quality_signal"]["qsc_codego_num_func"], serde_json::json!(1.0));
        assert_eq!(v["quality_signal"]["qsc_syntax_go"], serde_json::json!(1.0));
        assert!(v["quality_signal"].get("qsc_doc_num_words").is_none());
    }
}
