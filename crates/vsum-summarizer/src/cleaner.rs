//! Removal of conversational preamble from model output.

use std::sync::LazyLock;

use regex::Regex;

/// Substitutions applied in order, each anchored at the start of the text.
static PREAMBLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // English
        Regex::new(r"(?i)^(Okay|Here'?s?( is)?|Let me|I will|I'll|I can|I would|I am going to|Allow me to|Sure|Of course|Certainly|Alright).*?,\s*").unwrap(),
        Regex::new(r"(?i)^(Here'?s?( is)?|I'?ll?|Let me|I will|I can|I would|I am going to|Allow me to|Sure|Of course|Certainly).*?(summary|translate|breakdown|analysis).*?:\s*").unwrap(),
        Regex::new(r"(?i)^(Based on|According to).*?,\s*").unwrap(),
        Regex::new(r"(?i)^I understand.*?[.!]\s*").unwrap(),
        Regex::new(r"(?i)^(Now|First|Let's)\b,?\s*").unwrap(),
        Regex::new(r"(?i)^(Here are|The following is|This is|Below is).*?:\s*").unwrap(),
        Regex::new(r"(?i)^(I'll provide|Let me break|I'll break|I'll help|I've structured).*?:\s*").unwrap(),
        Regex::new(r"(?i)^(As requested|Following your|In response to).*?:\s*").unwrap(),
        // German
        Regex::new(r"(?i)^(Okay|Hier( ist)?|Lass mich|Ich werde|Ich kann|Ich würde|Ich möchte|Erlauben Sie mir|Sicher|Natürlich|Gewiss|In Ordnung).*?,\s*").unwrap(),
        Regex::new(r"(?i)^(Hier( ist)?|Ich werde|Lass mich|Ich kann|Ich würde|Ich möchte).*?(Zusammenfassung|Übersetzung|Analyse).*?:\s*").unwrap(),
        Regex::new(r"(?i)^(Basierend auf|Laut|Gemäß).*?,\s*").unwrap(),
        Regex::new(r"(?i)^Ich verstehe.*?[.!]\s*").unwrap(),
        Regex::new(r"(?i)^(Jetzt|Zunächst|Lass uns)\b,?\s*").unwrap(),
        Regex::new(r"(?i)^(Hier sind|Folgendes|Dies ist|Im Folgenden).*?:\s*").unwrap(),
        Regex::new(r"(?i)^(Ich werde|Lass mich|Ich helfe|Ich habe strukturiert).*?:\s*").unwrap(),
        Regex::new(r"(?i)^(Wie gewünscht|Entsprechend Ihrer|Als Antwort auf).*?:\s*").unwrap(),
    ]
});

/// Per-line substitutions applied after the preamble patterns.
static LINE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Per line: `label:` prefixes not opened by a summary marker
        Regex::new(r"(?m)^[^:\n🎯🎙\x{FE0F}#*\-•]+:\s*").unwrap(),
        // Per line: bare numbered-list prefixes
        Regex::new(r"(?m)^[\s\d]+\.\s*").unwrap(),
    ]
});

/// Strip model preamble ("Okay, …", "Here is the summary:", "Basierend auf …,"),
/// unmarked `label:` prefixes and bare list numbers, then trim.
///
/// The substitution sequence is repeated until the text stops changing, so
/// cleaning already-clean output is a no-op.
pub fn clean_model_output(text: &str) -> String {
    to_fixpoint(text, |t| {
        let t = apply(&PREAMBLE_PATTERNS, t);
        apply(&LINE_PATTERNS, &t)
    })
}

/// Strip only the leading preamble, leaving line structure intact.
///
/// Used for timestamped transcripts, where `[00:15]` must survive.
pub fn strip_preamble(text: &str) -> String {
    to_fixpoint(text, |t| apply(&PREAMBLE_PATTERNS, t))
}

/// Substitutions only delete, so every productive pass shortens the text.
fn to_fixpoint(text: &str, pass: impl Fn(&str) -> String) -> String {
    let mut current = text.trim().to_string();

    loop {
        let next = pass(&current).trim().to_string();
        if next == current {
            return current;
        }
        current = next;
    }
}

fn apply(patterns: &[Regex], text: &str) -> String {
    patterns
        .iter()
        .fold(text.to_string(), |acc, re| re.replace_all(&acc, "").into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str = "🎯 TITLE: Ownership explained\n\n• Borrowing rules\n• Lifetimes\n\n# Notes\n- keep it simple";

    #[test]
    fn test_removes_english_preamble() {
        assert_eq!(
            clean_model_output("Okay, here is the summary you asked for:\n🎯 TITLE: Rust"),
            "🎯 TITLE: Rust"
        );
        assert_eq!(
            clean_model_output("Based on the transcript, 🎯 TITLE: Rust"),
            "🎯 TITLE: Rust"
        );
        assert_eq!(
            clean_model_output("I understand. 🎯 TITLE: Rust"),
            "🎯 TITLE: Rust"
        );
        assert_eq!(
            clean_model_output("Here's a breakdown of the video:\n🎯 TITLE: Rust"),
            "🎯 TITLE: Rust"
        );
    }

    #[test]
    fn test_removes_german_preamble() {
        assert_eq!(
            clean_model_output("Hier ist die Zusammenfassung des Videos:\n🎯 TITEL: Rust"),
            "🎯 TITEL: Rust"
        );
        assert_eq!(
            clean_model_output("Basierend auf dem Transkript, 🎯 TITEL: Rust"),
            "🎯 TITEL: Rust"
        );
        assert_eq!(
            clean_model_output("Ich verstehe! 🎯 TITEL: Rust"),
            "🎯 TITEL: Rust"
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(clean_model_output("SURE, 🎯 TITLE: x"), "🎯 TITLE: x");
    }

    #[test]
    fn test_strips_numbered_prefixes() {
        assert_eq!(clean_model_output("🎯 TITLE: x\n1. first\n2. second"), "🎯 TITLE: x\nfirst\nsecond");
    }

    #[test]
    fn test_strips_unmarked_labels() {
        assert_eq!(clean_model_output("🎯 TITLE: x\nNote: keep this"), "🎯 TITLE: x\nkeep this");
    }

    #[test]
    fn test_strips_every_chained_label() {
        assert_eq!(
            clean_model_output("🎯 TITLE: x\na:b:c:d:e:f:g:h:i:j:k"),
            "🎯 TITLE: x\nk"
        );
    }

    #[test]
    fn test_leaves_words_starting_with_keywords() {
        assert_eq!(clean_model_output("Nowhere to hide"), "Nowhere to hide");
    }

    #[test]
    fn test_clean_output_is_unchanged() {
        assert_eq!(clean_model_output(CLEAN), CLEAN);
    }

    #[test]
    fn test_strip_preamble_keeps_timestamps() {
        assert_eq!(
            strip_preamble("Below is the transcript:\n[00:00] Hello\n[00:15] Next: part"),
            "[00:00] Hello\n[00:15] Next: part"
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Okay, Sure, Here is the summary:\n🎯 TITLE: x",
            "Alright, let me start. 1. one\n2. two",
            "Hier ist die Analyse:\n   3. drei",
            "🎯 TITLE: x\na:b:c:d:e:f:g:h:i:j:k",
            CLEAN,
        ];
        for input in inputs {
            let once = clean_model_output(input);
            assert_eq!(clean_model_output(&once), once, "input: {input:?}");
        }
    }
}
