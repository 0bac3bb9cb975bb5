//! Extension-based document classification for the batch harness.

use sift_core::{DocType, ProgramLang};

/// Map a file extension (without the leading dot) to a classification.
pub fn classify_extension(extension: &str) -> (DocType, ProgramLang) {
    match extension {
        "c" | "h" => (DocType::Code, ProgramLang::C),
        "cc" | "cpp" | "cxx" | "hpp" => (DocType::Code, ProgramLang::Cpp),
        "cs" => (DocType::Code, ProgramLang::CSharp),
        "go" => (DocType::Code, ProgramLang::Go),
        "html" | "htm" => (DocType::Code, ProgramLang::Html),
        "java" => (DocType::Code, ProgramLang::Java),
        "js" | "jsx" | "mjs" => (DocType::Code, ProgramLang::JavaScript),
        "py" => (DocType::Code, ProgramLang::Python),
        "json" | "yaml" | "yml" | "csv" | "toml" => (DocType::Data, ProgramLang::None),
        "md" | "txt" | "rst" => (DocType::Text, ProgramLang::None),
        _ => (DocType::Unknown, ProgramLang::None),
    }
}
