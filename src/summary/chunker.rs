//! Sentence-aligned transcript chunking.
//!
//! A sentence ends at `.`, `!` or `?` followed by whitespace. Sentences are
//! packed greedily into chunks of at most `max_chunk_size` characters; a
//! sentence is never split, so one longer than the limit becomes a chunk of
//! its own.

/// Default soft limit on chunk length, in characters
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 10_000;

fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// Split `text` into trimmed, non-empty sentences in document order.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch.is_whitespace() && prev.is_some_and(is_terminator) {
            let sentence = text[start..idx].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }

            // Swallow the rest of the whitespace run
            start = text.len();
            while let Some(&(next_idx, next)) = chars.peek() {
                if !next.is_whitespace() {
                    start = next_idx;
                    break;
                }
                chars.next();
            }
            prev = None;
            continue;
        }
        prev = Some(ch);
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

/// Pack the sentences of `text` into chunks joined by single spaces.
pub fn split_into_chunks(text: &str, max_chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in split_sentences(text) {
        let sentence_len = sentence.chars().count();

        if !current.is_empty() && current_len + 1 + sentence_len > max_chunk_size {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(sentence);
        current_len += sentence_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(split_into_chunks("", 100).is_empty());
        assert!(split_into_chunks("   \n\t ", 100).is_empty());
    }

    #[test]
    fn test_no_terminator_is_single_chunk() {
        let chunks = split_into_chunks("  just one long thought without an ending ", 10);
        assert_eq!(chunks, vec!["just one long thought without an ending"]);
    }

    #[test]
    fn test_sentence_boundaries() {
        let sentences = split_sentences("Hi there. How are you?  Fine!\nGood.");
        assert_eq!(sentences, vec!["Hi there.", "How are you?", "Fine!", "Good."]);
    }

    #[test]
    fn test_punctuation_without_whitespace_is_not_a_boundary() {
        let sentences = split_sentences("Version 1.5 shipped. See e.g.the notes");
        assert_eq!(sentences, vec!["Version 1.5 shipped.", "See e.g.the notes"]);
    }

    #[test]
    fn test_greedy_packing() {
        // Each sentence is 4 chars; "aaa. bbb." is 9 chars
        let chunks = split_into_chunks("aaa. bbb. ccc. ddd. eee.", 9);
        assert_eq!(chunks, vec!["aaa. bbb.", "ccc. ddd.", "eee."]);
    }

    #[test]
    fn test_oversized_sentence_emitted_whole() {
        let long = format!("{}.", "x".repeat(50));
        let text = format!("Short one. {} Tail.", long);
        let chunks = split_into_chunks(&text, 20);
        assert_eq!(chunks, vec!["Short one.".to_string(), long, "Tail.".to_string()]);
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        // "é" is two bytes but one character
        let chunks = split_into_chunks("éé. éé.", 7);
        assert_eq!(chunks, vec!["éé. éé."]);
    }
}
