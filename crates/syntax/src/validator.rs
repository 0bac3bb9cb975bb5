//! Per-language parsers and the validity check.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use sift_core::ProgramLang;
use tree_sitter::{Language, Parser};

/// Error constructing the validator.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    /// A grammar was rejected by the tree-sitter runtime.
    #[error("failed to load {lang} grammar: {source}")]
    Grammar {
        /// Language whose grammar failed to load.
        lang: ProgramLang,
        /// Underlying tree-sitter error.
        #[source]
        source: tree_sitter::LanguageError,
    },
}

/// Verdict key for the syntax signal of `lang`.
pub fn signal_name(lang: ProgramLang) -> String {
    format!("qsc_syntax_{lang}")
}

/// Checks whether source code parses without errors.
///
/// Holds one reusable parser per supported language. Instances must
/// not be shared across threads; run one validator per engine
/// instance.
pub struct SyntaxValidator {
    parsers: HashMap<ProgramLang, Parser>,
}

impl SyntaxValidator {
    /// Languages with a compiled grammar.
    pub const SUPPORTED: [ProgramLang; 5] = [
        ProgramLang::C,
        ProgramLang::Cpp,
        ProgramLang::Go,
        ProgramLang::Java,
        ProgramLang::JavaScript,
    ];

    /// Create a validator with one parser per supported language.
    pub fn new() -> Result<Self, SyntaxError> {
        let mut parsers = HashMap::new();
        for lang in Self::SUPPORTED {
            let Some(grammar) = grammar(lang) else {
                continue;
            };
            let mut parser = Parser::new();
            parser
                .set_language(&grammar)
                .map_err(|source| SyntaxError::Grammar { lang, source })?;
            parsers.insert(lang, parser);
        }
        Ok(Self { parsers })
    }

    /// Whether a parser exists for `lang`.
    pub fn supports(&self, lang: ProgramLang) -> bool {
        self.parsers.contains_key(&lang)
    }

    /// Parse `source` and report whether it is free of syntax errors.
    ///
    /// Languages without a parser are treated as valid: the absence of
    /// a grammar is not a syntax error. A parser crash or a parse that
    /// yields no tree is treated as invalid, never propagated.
    pub fn is_valid(&mut self, source: &[u8], lang: ProgramLang) -> bool {
        let Some(parser) = self.parsers.get_mut(&lang) else {
            return true;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| parser.parse(source, None))) {
            Ok(Some(tree)) => !tree.root_node().has_error(),
            Ok(None) => {
                tracing::warn!(lang = %lang, "parser returned no tree");
                false
            }
            Err(_) => {
                tracing::warn!(lang = %lang, "parser panicked");
                false
            }
        }
    }
}

fn grammar(lang: ProgramLang) -> Option<Language> {
    match lang {
        ProgramLang::C => Some(tree_sitter_c::LANGUAGE.into()),
        ProgramLang::Cpp => Some(tree_sitter_cpp::LANGUAGE.into()),
        ProgramLang::Go => Some(tree_sitter_go::LANGUAGE.into()),
        ProgramLang::Java => Some(tree_sitter_java::LANGUAGE.into()),
        ProgramLang::JavaScript => Some(tree_sitter_javascript::LANGUAGE.into()),
        _ => None,
    }
}
