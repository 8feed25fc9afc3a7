//! Recursive character splitting of document text.
//!
//! Lengths are measured in characters, not bytes.

/// Separators tried in order; the first one present in the text is used.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Split `text` into chunks of roughly `max_size` characters.
///
/// Consecutive chunks from one separator split share a trailing run of whole
/// pieces of at most `overlap` characters. That run is always carried in full,
/// so a chunk can exceed `max_size` by up to the overlap. A single piece
/// longer than `max_size` is emitted whole rather than cut.
pub fn chunk_text(text: &str, max_size: usize, overlap: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if char_len(text) <= max_size {
        return vec![text.to_string()];
    }

    match SEPARATORS.iter().find(|sep| text.contains(*sep)) {
        Some(separator) => split_on_separator(text, separator, max_size, overlap),
        None => split_by_size(text, max_size, overlap),
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Joined length of `pieces` after appending one of `len` characters.
fn grown_len(current: usize, is_empty: bool, sep_len: usize, len: usize) -> usize {
    if is_empty {
        len
    } else {
        current + sep_len + len
    }
}

fn split_on_separator(text: &str, separator: &str, max_size: usize, overlap: usize) -> Vec<String> {
    let sep_len = char_len(separator);
    let pieces = text.split(separator).map(str::trim).filter(|p| !p.is_empty());

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0;

    for piece in pieces {
        let piece_len = char_len(piece);

        if !current.is_empty() && current_len + sep_len + piece_len > max_size {
            chunks.push(current.join(separator));

            // Seed the next chunk with trailing pieces that fit in `overlap`.
            let mut seed: Vec<&str> = Vec::new();
            let mut seed_len = 0;
            for prev in current.iter().rev() {
                let next_len = grown_len(seed_len, seed.is_empty(), sep_len, char_len(prev));
                if next_len > overlap {
                    break;
                }
                seed.insert(0, prev);
                seed_len = next_len;
            }

            current = seed;
            current_len = seed_len;
        }

        current_len = grown_len(current_len, current.is_empty(), sep_len, piece_len);
        current.push(piece);
    }

    if !current.is_empty() {
        chunks.push(current.join(separator));
    }

    chunks
}

/// Fixed-width windows for text without any separator.
fn split_by_size(text: &str, max_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let width = max_size.max(1);
    let stride = max_size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + width).min(chars.len());
        let window: String = chars[start..end].iter().collect();
        if !window.trim().is_empty() {
            chunks.push(window);
        }
        if end == chars.len() {
            break;
        }
        start += stride;
    }

    chunks
}
