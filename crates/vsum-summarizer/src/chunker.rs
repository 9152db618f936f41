//! Word-window chunking of long transcripts.

/// Default maximum characters per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 7000;

/// Default overlap budget; one word is carried per ten characters.
pub const DEFAULT_OVERLAP: usize = 1000;

/// Upper bound on trailing words carried into the next chunk.
pub fn overlap_words(overlap: usize) -> usize {
    (overlap / 10).max(1)
}

/// Number of trailing words of an emitted window carried into the next one.
///
/// At most [`overlap_words`] words that fit in `overlap` characters
/// together with their separators, and never the whole window.
pub fn carried_words(window: &[&str], overlap: usize) -> usize {
    let max_words = overlap_words(overlap).min(window.len().saturating_sub(1));
    let mut count = 0;
    let mut len = 0;

    for word in window.iter().rev().take(max_words) {
        let next = len + word.chars().count() + 1;
        if next > overlap {
            break;
        }
        len = next;
        count += 1;
    }

    count
}

/// Split text into overlapping chunks of whole words.
///
/// Words are separated by single spaces. Before a word is appended, the
/// current window is emitted if adding the word would push it past
/// `chunk_size`; the next window then starts with the [`carried_words`]
/// tail of the emitted one. Lengths count characters. A chunk stays within
/// `chunk_size + overlap` unless it holds a word longer than `chunk_size`,
/// and every chunk after the first adds at least one new word.
pub fn split_into_chunks(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in text.split(' ') {
        let word_len = word.chars().count();

        if current_len + word_len > chunk_size && !current.is_empty() {
            chunks.push(current.join(" "));
            let keep_from = current.len() - carried_words(&current, overlap);
            current.drain(..keep_from);
            current_len = if current.is_empty() { 0 } else { joined_len(&current) + 1 };
        }

        current.push(word);
        current_len += word_len + 1;
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

fn joined_len(words: &[&str]) -> usize {
    let chars: usize = words.iter().map(|w| w.chars().count()).sum();
    chars + words.len().saturating_sub(1)
}
