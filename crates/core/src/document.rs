//! Document model - the immutable unit of evaluation.

use serde::{Deserialize, Serialize};

/// Programming language of a code or data document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramLang {
    /// C
    C,
    /// C++
    Cpp,
    /// C#
    CSharp,
    /// Go
    Go,
    /// HTML
    Html,
    /// Java
    Java,
    /// JavaScript
    JavaScript,
    /// Python
    Python,
    /// No programming language (text, data, or unclassified documents).
    None,
}

impl ProgramLang {
    /// Parse a lowercase language tag; unknown tags map to [`ProgramLang::None`].
    pub fn parse(tag: &str) -> Self {
        match tag {
            "c" => ProgramLang::C,
            "cpp" => ProgramLang::Cpp,
            "csharp" => ProgramLang::CSharp,
            "go" => ProgramLang::Go,
            "html" => ProgramLang::Html,
            "java" => ProgramLang::Java,
            "javascript" => ProgramLang::JavaScript,
            "python" => ProgramLang::Python,
            _ => ProgramLang::None,
        }
    }

    /// The lowercase tag used in signal names and serialized verdicts.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramLang::C => "c",
            ProgramLang::Cpp => "cpp",
            ProgramLang::CSharp => "csharp",
            ProgramLang::Go => "go",
            ProgramLang::Html => "html",
            ProgramLang::Java => "java",
            ProgramLang::JavaScript => "javascript",
            ProgramLang::Python => "python",
            ProgramLang::None => "none",
        }
    }
}

impl std::fmt::Display for ProgramLang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad classification of a document.
///
/// Fully determines which signal sets are eligible to run;
/// [`ProgramLang`] narrows further within code and data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// Source code
    Code,
    /// Structured data (configs, serialized records)
    Data,
    /// Natural-language text
    Text,
    /// Unclassified; no signals run
    Unknown,
}

impl DocType {
    /// Parse a lowercase document type; unknown tags map to [`DocType::Unknown`].
    pub fn parse(tag: &str) -> Self {
        match tag {
            "code" => DocType::Code,
            "data" => DocType::Data,
            "text" => DocType::Text,
            _ => DocType::Unknown,
        }
    }

    /// The lowercase tag used in serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Code => "code",
            DocType::Data => "data",
            DocType::Text => "text",
            DocType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One corpus item and its classification.
///
/// Created once per evaluation call, never mutated, discarded after the
/// call returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Raw text content
    pub content: String,

    /// Original file name
    pub filename: String,

    /// Declared human language or locale tag
    pub declared_language: String,

    /// File extension, without the leading dot
    pub extension: String,

    /// Size of the original file in bytes
    pub size_in_bytes: u64,

    /// Programming language, or [`ProgramLang::None`]
    pub program_lang: ProgramLang,

    /// Document classification
    pub doc_type: DocType,
}

impl Document {
    /// Create a document from its fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        content: impl Into<String>,
        filename: impl Into<String>,
        declared_language: impl Into<String>,
        extension: impl Into<String>,
        size_in_bytes: u64,
        program_lang: ProgramLang,
        doc_type: DocType,
    ) -> Self {
        Self {
            content: content.into(),
            filename: filename.into(),
            declared_language: declared_language.into(),
            extension: extension.into(),
            size_in_bytes,
            program_lang,
            doc_type,
        }
    }
}
