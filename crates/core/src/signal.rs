//! Signal capability - one named scoring function over a document.

use crate::document::{DocType, Document, ProgramLang};

/// Score produced by a signal: a number, or null when undefined.
pub type ScoreValue = Option<f64>;

/// Which documents a signal is eligible to run against.
///
/// Attached to each signal at registration; the registry's partition is
/// computed from this metadata, never from name prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Applicability {
    /// Every code or data document.
    Code,
    /// Code or data documents in one specific language.
    Language(ProgramLang),
    /// Natural-language documents only.
    Text,
}

impl Applicability {
    /// Whether a signal with this applicability is eligible for `doc`.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Applicability::Code => matches!(doc.doc_type, DocType::Code | DocType::Data),
            Applicability::Language(lang) => {
                *lang != ProgramLang::None
                    && doc.program_lang == *lang
                    && matches!(doc.doc_type, DocType::Code | DocType::Data)
            }
            Applicability::Text => doc.doc_type == DocType::Text,
        }
    }
}

/// A single named quality signal.
///
/// Implementations may be slow, may fail, and may not cooperate with
/// cancellation; the engine bounds their wall-clock cost and contains
/// their errors. A signal belongs to exactly one applicability class
/// and is never retried within one evaluation call.
pub trait Signal: Send + Sync {
    /// Stable signal name, used as the key in the verdict.
    fn name(&self) -> &str;

    /// Which documents this signal runs against.
    fn applicability(&self) -> Applicability;

    /// Score one document. `Ok(None)` records a null score.
    fn score(&self, doc: &Document) -> anyhow::Result<ScoreValue>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(doc_type: DocType, program_lang: ProgramLang) -> Document {
        Document::new("", "f", "en", "", 0, program_lang, doc_type)
    }

    #[test]
    fn code_applicability_covers_code_and_data() {
        let a = Applicability::Code;
        assert!(a.matches(&doc(DocType::Code, ProgramLang::Go)));
        assert!(a.matches(&doc(DocType::Data, ProgramLang::None)));
        assert!(!a.matches(&doc(DocType::Text, ProgramLang::None)));
        assert!(!a.matches(&doc(DocType::Unknown, ProgramLang::Go)));
    }

    #[test]
    fn language_applicability_requires_matching_language() {
        let a = Applicability::Language(ProgramLang::Python);
        assert!(a.matches(&doc(DocType::Code, ProgramLang::Python)));
        assert!(!a.matches(&doc(DocType::Code, ProgramLang::Go)));
        assert!(!a.matches(&doc(DocType::Text, ProgramLang::Python)));
    }

    #[test]
    fn language_none_never_matches() {
        let a = Applicability::Language(ProgramLang::None);
        assert!(!a.matches(&doc(DocType::Code, ProgramLang::None)));
        assert!(!a.matches(&doc(DocType::Data, ProgramLang::None)));
    }

    #[test]
    fn text_applicability_requires_text() {
        let a = Applicability::Text;
        assert!(a.matches(&doc(DocType::Text, ProgramLang::None)));
        assert!(!a.matches(&doc(DocType::Code, ProgramLang::None)));
    }
}
