//! Word-boundary text chunker.
//!
//! Splits a text blob into substrings that are each as long as possible
//! without exceeding `chunk_size` characters, never splitting a word.
//! A lone word longer than `chunk_size` still becomes its own chunk.
//!
//! Chunk boundaries are deterministic given identical input and size,
//! so re-running an import produces the same sequence.

/// Split text into chunks by greedy word packing.
///
/// Words are runs of non-whitespace; sizes are measured in characters.
/// A word is added to the current chunk unless it (plus one separating
/// space) would push the chunk past `chunk_size`, in which case the
/// current chunk is closed and the word starts a new one.
pub fn split_into_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        if current_chars > 0 && current_chars + 1 + word_chars > chunk_size {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if current_chars > 0 {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
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
    fn test_short_text_single_chunk() {
        let chunks = split_into_chunks("hello world", 100);
        assert_eq!(chunks, vec!["hello world"]);
    }

    #[test]
    fn test_empty_text_no_chunks() {
        assert!(split_into_chunks("", 100).is_empty());
        assert!(split_into_chunks("   \n\t  ", 100).is_empty());
    }

    #[test]
    fn test_splits_at_word_boundaries() {
        let chunks = split_into_chunks("aaa bbb ccc ddd", 7);
        assert_eq!(chunks, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn test_no_chunk_exceeds_size() {
        let text = "the quick brown fox jumps over the lazy dog and keeps on running";
        for size in [5usize, 10, 15, 20] {
            for chunk in split_into_chunks(text, size) {
                assert!(
                    chunk.chars().count() <= size,
                    "chunk {:?} exceeds size {}",
                    chunk,
                    size
                );
            }
        }
    }

    #[test]
    fn test_overlong_word_becomes_own_chunk() {
        let chunks = split_into_chunks("hi incomprehensibilities yo", 10);
        assert_eq!(chunks, vec!["hi", "incomprehensibilities", "yo"]);
    }

    #[test]
    fn test_reconstruction_preserves_token_sequence() {
        let text = "one\ttwo  three\nfour five six seven eight nine ten";
        let chunks = split_into_chunks(text, 12);
        let rejoined = chunks.join(" ");
        let original: Vec<&str> = text.split_whitespace().collect();
        let restored: Vec<&str> = rejoined.split_whitespace().collect();
        assert_eq!(original, restored);
    }

    #[test]
    fn test_char_counted_not_byte_counted() {
        // Four 3-byte characters per word; byte counting would split these.
        let chunks = split_into_chunks("日本語だ 日本語だ", 9);
        assert_eq!(chunks, vec!["日本語だ 日本語だ"]);
    }

    #[test]
    fn test_deterministic() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        assert_eq!(split_into_chunks(text, 11), split_into_chunks(text, 11));
    }
}
