//! Sequence similarity for fuzzy name matching.
//!
//! Ratcliff/Obershelp "gestalt" matching: find the longest common block,
//! recurse on the pieces left and right of it, and score
//! `2 * matched / (len(a) + len(b))`. The ratio is bounded in [0, 1] and
//! equal to 1 only for identical strings. The raw ratio is not symmetric,
//! since tie-breaking between equally long blocks depends on argument
//! order; [`similarity`] scores both orders and keeps the higher one.

/// Similarity ratio of two strings, compared character by character
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Order-independent score: the larger of the two directed ratios
pub fn similarity(a: &str, b: &str) -> f64 {
    ratio(a, b).max(ratio(b, a))
}

/// Whether `similarity(a, b)` exceeds `threshold`
pub fn is_similar(a: &str, b: &str, threshold: f64) -> bool {
    similarity(a, b) > threshold
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        matched += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }

    matched
}

/// Longest block `a[i..i+size] == b[j..j+size]` inside the given windows.
/// Ties resolve to the smallest `i`, then the smallest `j`.
fn longest_match(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let width = b_hi - b_lo;
    let mut best = (a_lo, b_lo, 0);
    // run[k + 1] = length of the common suffix ending at (i, b_lo + k)
    let mut prev = vec![0usize; width + 1];
    let mut run = vec![0usize; width + 1];

    for i in a_lo..a_hi {
        for k in 0..width {
            let j = b_lo + k;
            run[k + 1] = if a[i] == b[j] { prev[k] + 1 } else { 0 };
            let size = run[k + 1];
            if size > best.2 {
                best = (i + 1 - size, j + 1 - size, size);
            }
        }
        std::mem::swap(&mut prev, &mut run);
    }

    best
}
