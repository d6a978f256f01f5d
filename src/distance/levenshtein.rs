//! Bounded plain edit distance (banded Wagner–Fischer).

use std::cmp::min;

/// Calculates the Levenshtein distance between `s1` and `s2`.
///
/// When `max_distance` is given, only the diagonal band of width
/// `2 * max_distance + 1` is computed: any true distance within the bound
/// never needs cells outside it. Cells outside the band hold a sentinel
/// larger than the bound so they cannot win a minimum. Once a whole row's
/// minimum exceeds the bound the computation stops, since no suffix can bring
/// the distance back under it.
///
/// Returns the true distance when it is within the bound (always, when
/// unbounded), otherwise some value greater than `max_distance`.
///
/// # Example
/// ```
/// use textfuzzy::distance::levenshtein;
///
/// let kitten: Vec<char> = "kitten".chars().collect();
/// let sitting: Vec<char> = "sitting".chars().collect();
/// assert_eq!(3, levenshtein::distance(&kitten, &sitting, None));
/// assert!(levenshtein::distance(&kitten, &sitting, Some(2)) > 2);
/// ```
pub fn distance<Elem>(s1: &[Elem], s2: &[Elem], max_distance: Option<usize>) -> usize
where
    Elem: PartialEq,
{
    let len1 = s1.len();
    let len2 = s2.len();

    let large_value = match max_distance {
        Some(max) => max.saturating_add(1),
        None => std::cmp::max(len1, len2),
    };

    let mut prev: Vec<usize> = (0..=len2).collect();
    let mut next: Vec<usize> = vec![0; len2 + 1];

    for (i, c1) in s1.iter().enumerate().map(|(i, c1)| (i + 1, c1)) {
        // Columns of row i worth computing. Everything outside
        // [i - max, i + max] gets the sentinel.
        let mut min_j = 1;
        let mut max_j = len2;
        if let Some(max) = max_distance {
            if i > max {
                min_j = i - max;
            }
            max_j = min(max_j, max + i);
        }

        next[0] = i;
        let mut row_min = next[0];
        for j in 1..=len2 {
            if j < min_j || j > max_j {
                next[j] = large_value;
            } else if *c1 == s2[j - 1] {
                next[j] = prev[j - 1];
            } else {
                let delete = prev[j] + 1;
                let insert = next[j - 1] + 1;
                let substitute = prev[j - 1] + 1;
                next[j] = min(delete, min(insert, substitute));
            }
            row_min = min(row_min, next[j]);
        }

        if let Some(max) = max_distance {
            if row_min > max {
                // Every cell of this row is over budget already.
                return large_value;
            }
        }

        std::mem::swap(&mut prev, &mut next);
    }

    prev[len2]
}
