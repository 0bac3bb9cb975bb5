//! Generic code signals, applicable to every code and data document.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use sift_core::{Document, ScoreValue};

/// Lines inspected for auto-generation markers.
const AUTOGEN_HEAD_LINES: usize = 10;

static AUTOGEN_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)auto[- ]?generated|generated by|do not edit").expect("static pattern")
});

/// Declared file size in bytes.
pub(crate) fn size_file_byte(doc: &Document) -> anyhow::Result<ScoreValue> {
    Ok(Some(doc.size_in_bytes as f64))
}

/// Number of lines.
pub(crate) fn num_lines(doc: &Document) -> anyhow::Result<ScoreValue> {
    Ok(Some(doc.content.lines().count() as f64))
}

/// Length in chars of the longest line.
pub(crate) fn num_chars_line_max(doc: &Document) -> anyhow::Result<ScoreValue> {
    let max = doc
        .content
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    Ok(Some(max as f64))
}

/// Mean line length in chars; null for empty content.
pub(crate) fn num_chars_line_mean(doc: &Document) -> anyhow::Result<ScoreValue> {
    let mut lines = 0usize;
    let mut chars = 0usize;
    for line in doc.content.lines() {
        lines += 1;
        chars += line.chars().count();
    }
    if lines == 0 {
        return Ok(None);
    }
    Ok(Some(chars as f64 / lines as f64))
}

/// Fraction of chars that are alphabetic; null for empty content.
pub(crate) fn frac_chars_alphabet(doc: &Document) -> anyhow::Result<ScoreValue> {
    let mut total = 0usize;
    let mut alpha = 0usize;
    for ch in doc.content.chars() {
        total += 1;
        if ch.is_alphabetic() {
            alpha += 1;
        }
    }
    if total == 0 {
        return Ok(None);
    }
    Ok(Some(alpha as f64 / total as f64))
}

/// Fraction of lines that duplicate an earlier line; null for empty
/// content.
pub(crate) fn frac_lines_dupe_lines(doc: &Document) -> anyhow::Result<ScoreValue> {
    let mut seen = HashSet::new();
    let mut total = 0usize;
    let mut dupes = 0usize;
    for line in doc.content.lines() {
        total += 1;
        if !seen.insert(line) {
            dupes += 1;
        }
    }
    if total == 0 {
        return Ok(None);
    }
    Ok(Some(dupes as f64 / total as f64))
}

/// 1 when the head of the file carries an auto-generation marker,
/// else 0.
pub(crate) fn cate_autogen(doc: &Document) -> anyhow::Result<ScoreValue> {
    let hit = doc
        .content
        .lines()
        .take(AUTOGEN_HEAD_LINES)
        .any(|line| AUTOGEN_MARKER.is_match(line));
    Ok(Some(if hit { 1.0 } else { 0.0 }))
}
