// Spam scoring - a pure heuristic over message content and nickname.
//
// No storage access here: the caller hands in the current banned-word
// snapshot, which keeps the scorer trivially testable.

use super::guestbook_models::BannedWord;

/// Characters counted towards the "excessive punctuation" signal.
const PUNCTUATION: &str = "!@#$%^&*()_+=[]{}|;:,.<>?";

/// Score a submission in [0.0, 1.0]. Higher means more likely spam.
///
/// Signals accumulate and the sum is clamped to 1.0:
/// - each banned word found in the lowercased content or nickname adds its
///   severity weight (0.8 / 0.5 / 0.2), once per word, uncapped across words
/// - more than 30% punctuation characters adds 0.3
/// - all-uppercase content longer than 10 chars adds 0.2
/// - any run of 5+ identical consecutive chars adds 0.3
/// - an http(s):// or www. substring adds 0.4
pub fn score(content: &str, nickname: &str, banned_words: &[BannedWord]) -> f64 {
    let mut score = 0.0;

    let content_lower = content.to_lowercase();
    let nickname_lower = nickname.to_lowercase();

    for banned in banned_words {
        let word = banned.word.to_lowercase();
        if word.is_empty() {
            continue;
        }
        if content_lower.contains(&word) || nickname_lower.contains(&word) {
            score += banned.severity.weight();
        }
    }

    let total_chars = content.chars().count();

    let punctuation_chars = content.chars().filter(|c| PUNCTUATION.contains(*c)).count();
    if total_chars > 0 && punctuation_chars as f64 > total_chars as f64 * 0.3 {
        score += 0.3;
    }

    if is_all_uppercase(content) && total_chars > 10 {
        score += 0.2;
    }

    if has_repeated_run(content, 5) {
        score += 0.3;
    }

    if content_lower.contains("http://")
        || content_lower.contains("https://")
        || content_lower.contains("www.")
    {
        score += 0.4;
    }

    score.min(1.0)
}

/// True when the content has at least one uppercase letter and no lowercase
/// letters. Uncased scripts (CJK and friends) never count as uppercase.
fn is_all_uppercase(content: &str) -> bool {
    let mut has_upper = false;
    for c in content.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper
}

/// True when any character repeats `min_run` or more times consecutively.
fn has_repeated_run(content: &str, min_run: usize) -> bool {
    let mut run = 0;
    let mut prev: Option<char> = None;
    for c in content.chars() {
        if Some(c) == prev {
            run += 1;
            if run >= min_run {
                return true;
            }
        } else {
            run = 1;
            prev = Some(c);
        }
    }
    false
}
