//! Bounded transposition-aware edit distance.
//!
//! Uses the Lowrance–Wagner construction: alongside the usual
//! insert/delete/substitute recurrence, each cell may close a transposition
//! against the last row where the current reference symbol matched and the
//! last column where the current candidate symbol matched. The last-match
//! rows live in a hash map keyed by symbol, so bytes and codepoints share one
//! implementation without a fixed-size alphabet table.

use std::cmp::min;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Dense `(len1 + 2) x (len2 + 2)` score matrix in row-major order.
struct ScoreMatrix {
    cells: Vec<usize>,
    cols: usize,
}

impl ScoreMatrix {
    fn new(rows: usize, cols: usize, fill: usize) -> Self {
        ScoreMatrix {
            cells: vec![fill; rows * cols],
            cols,
        }
    }

    fn get(&self, row: usize, col: usize) -> usize {
        self.cells[row * self.cols + col]
    }

    fn set(&mut self, row: usize, col: usize, val: usize) {
        self.cells[row * self.cols + col] = val;
    }
}

/// Calculates the Damerau–Levenshtein distance between `s1` and `s2`, where
/// adjacent transpositions count as a single edit.
///
/// The early exit under `max_distance` happens at row boundaries only: once a
/// completed row ends over budget the function returns `max_distance + 1`.
/// This mirrors the classic construction and can reject early even when a
/// longer prefix would have recovered, so a bounded call is a filter, not an
/// exact distance; the unbounded result is always exact.
///
/// # Example
/// ```
/// use textfuzzy::distance::damerau;
///
/// let ab: Vec<char> = "ab".chars().collect();
/// let ba: Vec<char> = "ba".chars().collect();
/// assert_eq!(1, damerau::distance(&ab, &ba, None));
/// ```
pub fn distance<Elem>(s1: &[Elem], s2: &[Elem], max_distance: Option<usize>) -> usize
where
    Elem: Eq + Hash + Copy,
{
    let len1 = s1.len();
    let len2 = s2.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    // Row index where each symbol last matched in the candidate; absent
    // symbols read as row 0, which points into the score-ceiling border.
    let mut last_match_row: FxHashMap<Elem, usize> = FxHashMap::default();

    let score_ceil = len1 + len2;
    let mut matrix = ScoreMatrix::new(len1 + 2, len2 + 2, score_ceil);
    matrix.set(1, 1, 0);
    for j in 1..=len2 {
        matrix.set(1, j + 1, j);
    }

    for i in 1..=len1 {
        matrix.set(i + 1, 1, i);

        // Column where s1[i - 1] last matched within this row.
        let mut last_match_col = 0usize;

        for j in 1..=len2 {
            let k = last_match_row.get(&s2[j - 1]).copied().unwrap_or(0);
            let l = last_match_col;
            let swap_score = matrix.get(k, l) + (i - k).saturating_sub(1) + (j - l);

            if s1[i - 1] == s2[j - 1] {
                last_match_col = j;
                matrix.set(i + 1, j + 1, min(matrix.get(i, j), swap_score));
            } else {
                let other = min(
                    matrix.get(i, j),
                    min(matrix.get(i + 1, j), matrix.get(i, j + 1)),
                ) + 1;
                matrix.set(i + 1, j + 1, min(swap_score, other));
            }
        }

        if let Some(max) = max_distance {
            if matrix.get(i + 1, len2 + 1) > max {
                return max.saturating_add(1);
            }
        }

        last_match_row.insert(s1[i - 1], i);
    }

    matrix.get(len1 + 1, len2 + 1)
}
