//! Error-text truncation.

/// Tail length preserved for over-budget messages.
const TAIL_CHARS: usize = 1000;

/// Head slack reserved for the tail plus the elision marker.
const HEAD_RESERVE: usize = 1005;

/// Shorten `text` to at most `budget` characters.
///
/// Budgets above 2000 keep the head and the last 1000 characters with
/// an elision marker between them, preserving the error's opening
/// context and its final message line. Smaller budgets keep the head
/// only. Slicing is char-boundary safe.
pub fn truncate_error(text: &str, budget: usize) -> String {
    let len = text.chars().count();
    if len <= budget {
        return text.to_string();
    }

    if budget > 2000 {
        let head: String = text.chars().take(budget - HEAD_RESERVE).collect();
        let tail: String = text.chars().skip(len - TAIL_CHARS).collect();
        format!("{head}\n...\n{tail}")
    } else {
        text.chars().take(budget).collect()
    }
}
