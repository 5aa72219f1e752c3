//! Splits long text into numbered tweet-sized chunks.

/// Maximum tweet length in characters.
pub const TWEET_LIMIT: usize = 280;

/// Minimum characters reserved for the ` (i/n)` suffix.
const SUFFIX_RESERVE: usize = 10;

/// Greedily packs whitespace-separated words into chunks of at most
/// `max_len - 10` characters, then appends ` (i/n)` when there is more than
/// one chunk. A word longer than the budget is split across chunks.
///
/// The reserve grows when the suffix itself needs more than 10 characters
/// (1000 chunks or more), so every chunk stays within `max_len`. When
/// `max_len` cannot fit one character plus a suffix, chunks are packed to
/// `max_len` and left unnumbered. A zero `max_len` yields no chunks.
pub fn content_to_thread(body: &str, max_len: usize) -> Vec<String> {
    if max_len == 0 {
        return Vec::new();
    }

    let mut reserve = SUFFIX_RESERVE;
    loop {
        let Some(budget) = max_len.checked_sub(reserve).filter(|&b| b > 0) else {
            return pack(body, max_len);
        };
        let chunks = pack(body, budget);
        let total = chunks.len();
        if total <= 1 {
            return chunks;
        }

        // a smaller budget can only add chunks, so this settles
        let needed = suffix_len(total).max(SUFFIX_RESERVE);
        if needed > reserve {
            reserve = needed;
            continue;
        }
        return chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| format!("{chunk} ({}/{total})", i + 1))
            .collect();
    }
}

/// Widest ` (i/n)` suffix for a thread of `total` chunks.
fn suffix_len(total: usize) -> usize {
    let digits = total.checked_ilog10().map_or(1, |d| d as usize + 1);
    4 + 2 * digits
}

fn pack(body: &str, budget: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in body.split_whitespace() {
        for piece in split_word(word, budget) {
            let piece_len = piece.chars().count();
            if current_len == 0 {
                current.push_str(piece);
                current_len = piece_len;
            } else if current_len + 1 + piece_len <= budget {
                current.push(' ');
                current.push_str(piece);
                current_len += 1 + piece_len;
            } else {
                chunks.push(std::mem::take(&mut current));
                current.push_str(piece);
                current_len = piece_len;
            }
        }
    }
    if current_len > 0 {
        chunks.push(current);
    }
    chunks
}

/// Splits `word` into pieces of at most `budget` characters.
fn split_word(word: &str, budget: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = word;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(budget)
            .map_or(rest.len(), |(idx, _)| idx);
        pieces.push(&rest[..end]);
        rest = &rest[end..];
    }
    pieces
}
