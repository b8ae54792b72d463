//! Textual similarity between two claims
//!
//! Ratcliff/Obershelp ratio: the longest common block is found, then the
//! same search recurses on the unmatched pieces to its left and right. The
//! ratio is `2 * matched / (len(a) + len(b))` over lowercased characters.
//!
//! The block search breaks ties by position, which makes the raw algorithm
//! order-sensitive (`"ab"` vs `"ba"`). Inputs are put into a canonical order
//! first so that `similarity(a, b) == similarity(b, a)` exactly.

use std::collections::HashMap;

/// Similarity ratio in `[0.0, 1.0]`
///
/// `1.0` for strings equal after lowercasing (including two empty strings),
/// `0.0` when they share no character.
///
/// # Examples
///
/// ```
/// use attest_dedup::similarity;
///
/// assert_eq!(similarity("Hello", "hello"), 1.0);
/// assert_eq!(similarity("abc", "xyz"), 0.0);
/// assert!(similarity("Fact 1", "Fact 2") > 0.8);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let (first, second) = if b < a { (b, a) } else { (a, b) };

    let first: Vec<char> = first.chars().collect();
    let second: Vec<char> = second.chars().collect();

    let total = first.len() + second.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&first, &second) as f64 / total as f64
}

/// Total size of all matching blocks between `a` and `b`
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        positions.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, &positions, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest block with `a[i..i+size] == b[j..j+size]` inside the given ranges
///
/// Ties go to the smallest `i`, then the smallest `j`.
fn longest_match(
    a: &[char],
    positions: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

    // run_ending_at[j] = length of the match ending at a[i - 1], b[j]
    let mut run_ending_at: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(js) = positions.get(c) {
            for &j in js {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let size = j
                    .checked_sub(1)
                    .and_then(|prev| run_ending_at.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, size);
                if size > best_size {
                    best_i = i + 1 - size;
                    best_j = j + 1 - size;
                    best_size = size;
                }
            }
        }
        run_ending_at = next;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(value: f64, expected: f64) -> bool {
        (value - expected).abs() < 0.001
    }

    #[test]
    fn test_identical_after_lowercasing() {
        assert_eq!(similarity("Hello", "hello"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_disjoint() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("abc", ""), 0.0);
    }

    #[test]
    fn test_known_ratios() {
        assert!(approx(similarity("Fact 1", "Fact 2"), 0.833));
        assert!(approx(
            similarity("The Eiffel Tower is in Paris", "The Eiffel Tower is located in Paris"),
            0.875
        ));
        assert!(approx(
            similarity("The Eiffel Tower is in Paris", "The Louvre Museum is in Paris"),
            0.632
        ));
        assert!(approx(
            similarity(
                "The Eiffel Tower is located in Paris, France.",
                "The Eiffel Tower is in Paris, France."
            ),
            0.902
        ));
    }

    #[test]
    fn test_order_sensitive_pair_is_symmetric() {
        assert_eq!(similarity("ab", "ba"), 0.5);
        assert_eq!(similarity("ba", "ab"), 0.5);
    }

    #[test]
    fn test_matching_chars_recurses_both_sides() {
        let a: Vec<char> = "xabcyde".chars().collect();
        let b: Vec<char> = "abczde".chars().collect();
        // "abc" then "de" on the right
        assert_eq!(matching_chars(&a, &b), 5);
    }

    proptest! {
        #[test]
        fn prop_similarity_bounded(a in ".{0,40}", b in ".{0,40}") {
            let s = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&s));
        }

        #[test]
        fn prop_similarity_symmetric(a in "[a-eA-E ]{0,30}", b in "[a-eA-E ]{0,30}") {
            prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
        }

        #[test]
        fn prop_self_similarity_is_one(a in ".{0,40}") {
            prop_assert_eq!(similarity(&a, &a), 1.0);
        }
    }
}
