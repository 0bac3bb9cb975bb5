//! Language-specific code signals.

use once_cell::sync::Lazy;
use regex::Regex;
use sift_core::{Document, ScoreValue};

static GO_FUNC_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*func\b").expect("static pattern"));

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static pattern"));

/// Fraction of Python lines that are import statements; null for empty
/// content.
pub(crate) fn python_frac_lines_import(doc: &Document) -> anyhow::Result<ScoreValue> {
    let mut total = 0usize;
    let mut imports = 0usize;
    for line in doc.content.lines() {
        total += 1;
        let trimmed = line.trim_start();
        if trimmed.starts_with("import ") || trimmed.starts_with("from ") {
            imports += 1;
        }
    }
    if total == 0 {
        return Ok(None);
    }
    Ok(Some(imports as f64 / total as f64))
}

/// Number of Go `func` declarations.
pub(crate) fn go_num_func(doc: &Document) -> anyhow::Result<ScoreValue> {
    Ok(Some(GO_FUNC_DECL.find_iter(&doc.content).count() as f64))
}

/// Fraction of HTML chars lying outside markup tags; null for empty
/// content.
pub(crate) fn html_frac_chars_text(doc: &Document) -> anyhow::Result<ScoreValue> {
    let total = doc.content.chars().count();
    if total == 0 {
        return Ok(None);
    }
    let stripped = HTML_TAG.replace_all(&doc.content, "");
    Ok(Some(stripped.chars().count() as f64 / total as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::{DocType, ProgramLang};

    fn doc(content: &str, lang: ProgramLang) -> Document {
        Document::new(content, "f", "en", "", content.len() as u64, lang, DocType::Code)
    }

    #[test]
    fn python_import_fraction() {
        let d = doc(
            "import os\nfrom sys import argv\n\nprint(argv)",
            ProgramLang::Python,
        );
        assert_eq!(python_frac_lines_import(&d).unwrap(), Some(0.5));
    }

    #[test]
    fn go_func_count_matches_declarations_only() {
        let d = doc(
            "package main\nfunc main() {}\nfunc helper(x int) int { return x }\nvar f = \"func\"",
            ProgramLang::Go,
        );
        assert_eq!(go_num_func(&d).unwrap(), Some(2.0));
    }

    #[test]
    fn html_text_fraction_strips_tags() {
        let d = doc("<p>hello</p>", ProgramLang::Html);
        // 5 text chars out of 12 total.
        let frac = html_frac_chars_text(&d).unwrap().unwrap();
        assert!((frac - 5.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn empty_content_scores_null() {
        assert_eq!(
            python_frac_lines_import(&doc("", ProgramLang::Python)).unwrap(),
            None
        );
        assert_eq!(html_frac_chars_text(&doc("", ProgramLang::Html)).unwrap(), None);
        assert_eq!(go_num_func(&doc("", ProgramLang::Go)).unwrap(), Some(0.0));
    }
}
