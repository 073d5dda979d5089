//! Sentence-level text normalization.

use std::collections::HashSet;

/// Sentence terminators, Western and CJK variants.
const TERMINATORS: [char; 6] = ['.', '!', '?', '。', '？', '！'];

/// Split a text blob into deduplicated phrase-like substrings.
///
/// Each phrase keeps its trailing terminator. Phrases are trimmed, and a
/// phrase consisting only of terminators is discarded. Duplicates keep
/// their first occurrence; order is irrelevant downstream since the
/// embedder aggregates by mean.
///
/// Empty input yields an empty vec — raising `NoContent` on an empty
/// phrase set is the embedder's job, not the normalizer's.
pub fn normalize_phrases(text: &str) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut seen = HashSet::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if TERMINATORS.contains(&ch) {
            push_phrase(&mut phrases, &mut seen, &mut current);
        }
    }
    push_phrase(&mut phrases, &mut seen, &mut current);

    phrases
}

fn push_phrase(phrases: &mut Vec<String>, seen: &mut HashSet<String>, current: &mut String) {
    let phrase = current.trim();
    let has_content = phrase.chars().any(|c| !TERMINATORS.contains(&c));
    if has_content && seen.insert(phrase.to_string()) {
        phrases.push(phrase.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_western_terminators() {
        let phrases = normalize_phrases("A cat sleeps. A dog barks! Who knows?");
        assert_eq!(
            phrases,
            vec!["A cat sleeps.", "A dog barks!", "Who knows?"]
        );
    }

    #[test]
    fn splits_on_cjk_terminators() {
        let phrases = normalize_phrases("猫が眠る。犬が吠える！なぜ？");
        assert_eq!(phrases, vec!["猫が眠る。", "犬が吠える！", "なぜ？"]);
    }

    #[test]
    fn deduplicates_repeated_phrases() {
        let phrases = normalize_phrases("The end. The end. Not the end.");
        assert_eq!(phrases, vec!["The end.", "Not the end."]);
    }

    #[test]
    fn keeps_trailing_phrase_without_terminator() {
        let phrases = normalize_phrases("First sentence. second without stop");
        assert_eq!(phrases, vec!["First sentence.", "second without stop"]);
    }

    #[test]
    fn empty_and_terminator_only_inputs_yield_nothing() {
        assert!(normalize_phrases("").is_empty());
        assert!(normalize_phrases("   ").is_empty());
        assert!(normalize_phrases("...!?").is_empty());
    }
}
