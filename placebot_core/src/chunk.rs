//! Splitting long replies into platform-sized text chunks.
//!
//! The chat platform caps one text message at 320 characters, so longer
//! fulfillment text is cut into ~300-character pieces at word boundaries.

/// Hard platform limit for a single text message.
pub const TEXT_LIMIT: usize = 320;

/// Target chunk length once a message has to be split.
const CHUNK_TARGET: usize = 300;

/// Split `text` into platform-sized chunks.
///
/// Text at or under [`TEXT_LIMIT`] comes back as a single chunk.
/// Concatenating the returned chunks reproduces the input exactly.
#[must_use]
pub fn split(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= TEXT_LIMIT {
        return vec![text.to_string()];
    }
    chunk(&chars, CHUNK_TARGET)
}

fn chunk(chars: &[char], len: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut prev = 0;
    while chars.len() - prev > len {
        let target = prev + len;
        // Cut just after a space so no boundary lands inside a word:
        // first space at or past the target, else the nearest space
        // before it. A single word longer than the chunk length gets a
        // hard cut at the target so the scan always terminates.
        let cut = (target..chars.len())
            .find(|&i| chars[i] == ' ')
            .or_else(|| (prev + 1..target).rev().find(|&i| chars[i] == ' '))
            .map_or(target, |i| i + 1);
        out.push(chars[prev..cut].iter().collect());
        prev = cut;
    }
    if prev < chars.len() {
        out.push(chars[prev..].iter().collect());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n)
            .map(|i| format!("word{i}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let text = "where can I get coffee?";
        assert_eq!(split(text), vec![text.to_string()]);

        let exactly_limit = "x".repeat(TEXT_LIMIT);
        assert_eq!(split(&exactly_limit), vec![exactly_limit.clone()]);
    }

    #[test]
    fn concatenation_reproduces_input() {
        let text = words(120);
        assert!(text.chars().count() > TEXT_LIMIT);
        let chunks = split(&text);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn boundaries_never_split_words() {
        let text = words(150);
        for chunk in split(&text) {
            // Every non-final boundary cut lands right after a space.
            assert!(chunk.ends_with(' ') || text.ends_with(&chunk));
        }
    }

    #[test]
    fn oversized_single_word_is_hard_cut() {
        let text = "a".repeat(700);
        let chunks = split(&text);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.concat(), text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 300));
    }

    #[test]
    fn multibyte_text_is_not_broken() {
        let text = "ü".repeat(400);
        let chunks = split(&text);
        assert_eq!(chunks.concat(), text);
    }
}
