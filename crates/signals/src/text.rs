//! Natural-language text signals.

use std::collections::HashSet;

use sift_core::{Document, ScoreValue};

/// Whitespace-separated word count.
pub(crate) fn num_words(doc: &Document) -> anyhow::Result<ScoreValue> {
    Ok(Some(doc.content.split_whitespace().count() as f64))
}

/// Mean word length in chars; null when the document has no words.
pub(crate) fn mean_word_length(doc: &Document) -> anyhow::Result<ScoreValue> {
    let mut words = 0usize;
    let mut chars = 0usize;
    for word in doc.content.split_whitespace() {
        words += 1;
        chars += word.chars().count();
    }
    if words == 0 {
        return Ok(None);
    }
    Ok(Some(chars as f64 / words as f64))
}

/// Distinct-to-total word ratio; null when the document has no words.
pub(crate) fn frac_unique_words(doc: &Document) -> anyhow::Result<ScoreValue> {
    let mut total = 0usize;
    let mut unique = HashSet::new();
    for word in doc.content.split_whitespace() {
        total += 1;
        unique.insert(word);
    }
    if total == 0 {
        return Ok(None);
    }
    Ok(Some(unique.len() as f64 / total as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::{DocType, ProgramLang};

    fn doc(content: &str) -> Document {
        Document::new(
            content,
            "note.txt",
            "en",
            "txt",
            content.len() as u64,
            ProgramLang::None,
            DocType::Text,
        )
    }

    #[test]
    fn counts_words() {
        assert_eq!(num_words(&doc("one two  three")).unwrap(), Some(3.0));
        assert_eq!(num_words(&doc("")).unwrap(), Some(0.0));
    }

    #[test]
    fn mean_word_length_ignores_whitespace_runs() {
        assert_eq!(mean_word_length(&doc("ab  cdef")).unwrap(), Some(3.0));
        assert_eq!(mean_word_length(&doc("  ")).unwrap(), None);
    }

    #[test]
    fn unique_word_fraction() {
        assert_eq!(frac_unique_words(&doc("a b a a")).unwrap(), Some(0.5));
        assert_eq!(frac_unique_words(&doc("")).unwrap(), None);
    }
}
