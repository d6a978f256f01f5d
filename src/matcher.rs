//! The matcher: one reference string, many candidates.

use std::cmp::min;
use std::io::BufRead;

use tracing::{debug, trace};

use crate::alphabet::{ByteAlphabet, CodepointAlphabet};
use crate::distance::{damerau, levenshtein};
use crate::error::MatchError;
use crate::text::Text;

/// Longest line the file scanner accepts, in bytes after stripping the line
/// ending.
pub const MAX_LINE_BYTES: usize = 0x10000;

/// Configuration for a [`Matcher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MatcherOptions {
    /// Maximum edit distance to accept; `None` means unbounded.
    pub max_distance: Option<usize>,
    /// Count adjacent transpositions as a single edit.
    pub transpositions: bool,
    /// Report exact matches as not found.
    pub skip_exact: bool,
    /// Switch off the alphabet reject filters.
    pub no_alphabet_filter: bool,
    /// Compare codepoints instead of bytes.
    pub codepoints: bool,
    /// Accepted for compatibility; per-operation edit costs are not
    /// evaluated.
    pub variable_costs: bool,
}

/// Result of a single comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    /// Whether the candidate matched within the active bound.
    pub found: bool,
    /// The computed distance; greater than the bound when the candidate was
    /// rejected.
    pub distance: usize,
}

/// A match recorded during a tie-collecting scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub distance: usize,
    pub offset: usize,
}

#[derive(Debug, Default)]
struct ScanState {
    active: bool,
    collect_ties: bool,
    saved_max: Option<usize>,
    /// Working bound at the moment the scan ended, kept for filtering the
    /// collected candidates.
    final_bound: Option<usize>,
    offset: usize,
    best: Option<usize>,
    best_distance: Option<usize>,
    candidates: Vec<Candidate>,
}

/// A fuzzy matcher holding one reference string and its derived alphabets.
///
/// Construction is deterministic and side-effect-free, so parallel workloads
/// can build one matcher per shard from the same reference. A single matcher
/// must not be shared between concurrent comparisons: the scan state, the
/// tightening bound and the rejection counters are all mutated in place.
///
/// # Example
/// ```
/// use textfuzzy::{Matcher, MatcherOptions, Text};
///
/// let mut matcher = Matcher::new(
///     "kitten",
///     MatcherOptions {
///         max_distance: Some(4),
///         ..Default::default()
///     },
/// )
/// .unwrap();
///
/// let result = matcher.compare(&Text::new("sitting"));
/// assert!(result.found);
/// assert_eq!(result.distance, 3);
/// ```
#[derive(Debug)]
pub struct Matcher {
    reference: Text,
    max_distance: Option<usize>,
    transpositions: bool,
    skip_exact: bool,
    codepoint_mode: bool,
    byte_alphabet: Option<ByteAlphabet>,
    codepoint_alphabet: Option<CodepointAlphabet>,
    scan: ScanState,
    length_rejections: usize,
    alphabet_rejections: usize,
    codepoint_alphabet_rejections: usize,
    last_distance: Option<usize>,
}

impl Matcher {
    /// Builds a matcher for `reference`, deriving the alphabet filters once.
    ///
    /// In codepoint mode a reference without a decoded codepoint view gets a
    /// synthesized one (ASCII bytes as themselves, anything else as a
    /// sentinel matching nothing).
    pub fn new<T: Into<Text>>(reference: T, options: MatcherOptions) -> Result<Self, MatchError> {
        let mut reference = reference.into();
        if options.codepoints {
            reference.ensure_codepoints();
        }

        let byte_alphabet = if !options.codepoints && !options.no_alphabet_filter {
            Some(ByteAlphabet::build(reference.bytes()))
        } else {
            None
        };
        let codepoint_alphabet = if options.codepoints && !options.no_alphabet_filter {
            let codepoints = reference
                .codepoints()
                .expect("codepoint-mode reference has a codepoint view");
            Some(CodepointAlphabet::build(codepoints)?)
        } else {
            None
        };

        debug!(
            reference_len = reference.bytes().len(),
            max_distance = ?options.max_distance,
            transpositions = options.transpositions,
            codepoints = options.codepoints,
            "matcher built"
        );

        Ok(Matcher {
            reference,
            max_distance: options.max_distance,
            transpositions: options.transpositions,
            skip_exact: options.skip_exact,
            codepoint_mode: options.codepoints,
            byte_alphabet,
            codepoint_alphabet,
            scan: ScanState::default(),
            length_rejections: 0,
            alphabet_rejections: 0,
            codepoint_alphabet_rejections: 0,
            last_distance: None,
        })
    }

    pub fn reference(&self) -> &Text {
        &self.reference
    }

    pub fn max_distance(&self) -> Option<usize> {
        self.max_distance
    }

    /// Candidates rejected because their length ruled a match out.
    pub fn length_rejections(&self) -> usize {
        self.length_rejections
    }

    /// Candidates rejected by the byte alphabet filter.
    pub fn alphabet_rejections(&self) -> usize {
        self.alphabet_rejections
    }

    /// Candidates rejected by the codepoint alphabet filter.
    pub fn codepoint_alphabet_rejections(&self) -> usize {
        self.codepoint_alphabet_rejections
    }

    /// Distance computed by the most recent comparison that reached the
    /// distance engine, whether or not it was a match.
    pub fn last_distance(&self) -> Option<usize> {
        self.last_distance
    }

    /// Compares a candidate against the reference.
    ///
    /// Under a bounded `max_distance` the reject gates run first: length,
    /// then the alphabet filter of the active mode. A gate rejection reports
    /// `found: false` with a distance just over the bound without running the
    /// distance engine.
    pub fn compare(&mut self, candidate: &Text) -> Comparison {
        let result = self.compare_gated(candidate);
        if self.scan.active {
            self.record_scan_result(result);
        }
        result
    }

    fn compare_gated(&mut self, candidate: &Text) -> Comparison {
        if let Some(max) = self.max_distance {
            let rejected = Comparison {
                found: false,
                distance: max.saturating_add(1),
            };

            let ref_len = self.reference.len(self.codepoint_mode);
            let cand_len = candidate.len(self.codepoint_mode);
            if ref_len.abs_diff(cand_len) > max {
                self.length_rejections += 1;
                return rejected;
            }

            if !self.codepoint_mode {
                if let Some(alphabet) = &self.byte_alphabet {
                    if alphabet.enabled() && alphabet.reject(candidate.bytes(), max) {
                        self.alphabet_rejections += 1;
                        return rejected;
                    }
                }
            } else if let Some(alphabet) = &self.codepoint_alphabet {
                if alphabet.enabled() && cand_len > max {
                    let synthesized;
                    let codepoints = match candidate.codepoints() {
                        Some(codepoints) => codepoints,
                        None => {
                            synthesized = candidate.synthesized_codepoints();
                            synthesized.as_slice()
                        }
                    };
                    if alphabet.reject(codepoints, max) {
                        self.codepoint_alphabet_rejections += 1;
                        return rejected;
                    }
                }
            }
        }

        let distance = self.engine_distance(candidate);
        self.last_distance = Some(distance);

        let mut found = match self.max_distance {
            Some(max) => distance < max,
            None => true,
        };
        if self.skip_exact && distance == 0 {
            found = false;
        }
        Comparison { found, distance }
    }

    fn engine_distance(&self, candidate: &Text) -> usize {
        if self.codepoint_mode {
            let reference = self
                .reference
                .codepoints()
                .expect("codepoint-mode reference has a codepoint view");
            let synthesized;
            let codepoints = match candidate.codepoints() {
                Some(codepoints) => codepoints,
                None => {
                    synthesized = candidate.synthesized_codepoints();
                    synthesized.as_slice()
                }
            };
            if self.transpositions {
                damerau::distance(codepoints, reference, self.max_distance)
            } else {
                levenshtein::distance(codepoints, reference, self.max_distance)
            }
        } else if self.transpositions {
            damerau::distance(candidate.bytes(), self.reference.bytes(), self.max_distance)
        } else {
            levenshtein::distance(candidate.bytes(), self.reference.bytes(), self.max_distance)
        }
    }

    /// Starts a scan over a stream of candidates.
    ///
    /// During a scan the bound is inclusive (a candidate at exactly the
    /// configured distance still matches) and tightens as better candidates
    /// are found, so later candidates are judged against the best seen so
    /// far. A scan already in progress is ended first.
    pub fn begin_scan(&mut self, collect_ties: bool) {
        if self.scan.active {
            self.end_scan();
        }
        trace!(collect_ties, max_distance = ?self.max_distance, "scan started");
        self.scan.saved_max = self.max_distance;
        self.max_distance = self.max_distance.map(|max| max.saturating_add(1));
        self.scan.active = true;
        self.scan.collect_ties = collect_ties;
        self.scan.final_bound = None;
        self.scan.offset = 0;
        self.scan.best = None;
        self.scan.best_distance = None;
        self.scan.candidates.clear();
    }

    /// Ends the scan and restores the configured `max_distance`.
    pub fn end_scan(&mut self) {
        if !self.scan.active {
            return;
        }
        self.scan.final_bound = self.max_distance;
        self.max_distance = self.scan.saved_max;
        self.scan.active = false;
        trace!(
            candidates = self.scan.candidates.len(),
            best = ?self.scan.best,
            "scan ended"
        );
    }

    fn record_scan_result(&mut self, result: Comparison) {
        let offset = self.scan.offset;
        self.scan.offset += 1;
        if !result.found {
            return;
        }

        if self.scan.collect_ties {
            self.scan.candidates.push(Candidate {
                distance: result.distance,
                offset,
            });
            // Keep ties at the new best eligible: anything more than one
            // worse is pruned from here on.
            self.tighten(result.distance.saturating_add(2));
        } else {
            let improved = self
                .scan
                .best_distance
                .map_or(true, |best| result.distance < best);
            if improved {
                self.scan.best = Some(offset);
                self.scan.best_distance = Some(result.distance);
            }
            self.tighten(result.distance.saturating_add(1));
        }
    }

    fn tighten(&mut self, bound: usize) {
        self.max_distance = Some(match self.max_distance {
            Some(current) => min(current, bound),
            None => bound,
        });
    }

    /// The candidates collected by the current or most recent tie-collecting
    /// scan, reduced to the entries still within the final bound, in
    /// discovery order.
    ///
    /// The reduction is what makes the two-phase protocol work: the bound
    /// tightens while scanning, so entries appended early may be worse than
    /// the eventual winners and are dropped here.
    pub fn candidates(&self) -> Vec<Candidate> {
        let bound = if self.scan.active {
            self.max_distance
        } else {
            self.scan.final_bound
        };
        self.scan
            .candidates
            .iter()
            .filter(|candidate| bound.map_or(true, |b| candidate.distance < b))
            .copied()
            .collect()
    }

    /// Releases the collected candidate list.
    pub fn clear_candidates(&mut self) {
        self.scan.candidates = Vec::new();
    }

    /// Scans `words` and returns the offset of the closest match within the
    /// bound, or `None`. The first candidate at the final minimum wins; the
    /// scan stops early at an exact match unless exact matches are skipped.
    pub fn nearest<'a, I>(&mut self, words: I) -> Option<usize>
    where
        I: IntoIterator<Item = &'a Text>,
    {
        self.begin_scan(false);
        for word in words {
            let result = self.compare(word);
            if result.found && result.distance == 0 && !self.skip_exact {
                break;
            }
        }
        self.end_scan();
        self.scan.best
    }

    /// Scans `words` collecting every candidate, and returns the offsets
    /// still within the final bound, in discovery order.
    pub fn nearest_ties<'a, I>(&mut self, words: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a Text>,
    {
        self.begin_scan(true);
        for word in words {
            self.compare(word);
        }
        self.end_scan();
        self.candidates()
            .into_iter()
            .map(|candidate| candidate.offset)
            .collect()
    }

    /// Scans a line source and returns the closest line within the bound.
    ///
    /// Lines may use any ending convention; the ending is stripped before
    /// comparison. The first line at the final minimum is kept. Lines longer
    /// than [`MAX_LINE_BYTES`] fail with [`MatchError::LineTooLong`].
    pub fn scan_lines<R: BufRead>(&mut self, mut reader: R) -> Result<Option<String>, MatchError> {
        self.begin_scan(false);
        let outcome = self.run_line_scan(&mut reader);
        self.end_scan();
        outcome
    }

    fn run_line_scan<R: BufRead>(&mut self, reader: &mut R) -> Result<Option<String>, MatchError> {
        let mut best: Option<String> = None;
        let mut line = 0usize;
        let mut buf: Vec<u8> = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line += 1;
            while matches!(buf.last(), Some(b'\n' | b'\r')) {
                buf.pop();
            }
            if buf.len() > MAX_LINE_BYTES {
                return Err(MatchError::LineTooLong {
                    line,
                    length: buf.len(),
                    limit: MAX_LINE_BYTES,
                });
            }

            let candidate = Text::from_bytes(buf.clone());
            let result = self.compare(&candidate);
            if result.found {
                if self.scan.best == Some(self.scan.offset - 1) {
                    best = Some(String::from_utf8_lossy(&buf).into_owned());
                }
                if result.distance == 0 && !self.skip_exact {
                    break;
                }
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(reference: &str, options: MatcherOptions) -> Matcher {
        Matcher::new(reference, options).unwrap()
    }

    #[test]
    fn unbounded_compare_reports_true_distance() {
        let mut m = matcher("kitten", MatcherOptions::default());
        let result = m.compare(&Text::new("sitting"));
        assert!(result.found);
        assert_eq!(result.distance, 3);
        assert_eq!(m.last_distance(), Some(3));
    }

    #[test]
    fn exact_match_found_unless_skipped() {
        let mut m = matcher("same", MatcherOptions::default());
        assert!(m.compare(&Text::new("same")).found);

        let mut skipping = matcher(
            "same",
            MatcherOptions {
                skip_exact: true,
                ..Default::default()
            },
        );
        let result = skipping.compare(&Text::new("same"));
        assert!(!result.found);
        assert_eq!(result.distance, 0);
    }

    #[test]
    fn bounded_compare_is_strict() {
        let mut m = matcher(
            "kitten",
            MatcherOptions {
                max_distance: Some(3),
                ..Default::default()
            },
        );
        assert!(!m.compare(&Text::new("sitting")).found);

        let mut wider = matcher(
            "kitten",
            MatcherOptions {
                max_distance: Some(4),
                ..Default::default()
            },
        );
        let result = wider.compare(&Text::new("sitting"));
        assert!(result.found);
        assert_eq!(result.distance, 3);
    }

    #[test]
    fn length_gate_counts_rejections() {
        let mut m = matcher(
            "cat",
            MatcherOptions {
                max_distance: Some(1),
                ..Default::default()
            },
        );
        assert!(!m.compare(&Text::new("caterpillar")).found);
        assert_eq!(m.length_rejections(), 1);
        // Gate rejections never reach the engine.
        assert_eq!(m.last_distance(), None);
    }

    #[test]
    fn alphabet_gate_counts_rejections() {
        let mut m = matcher(
            "cat",
            MatcherOptions {
                max_distance: Some(1),
                ..Default::default()
            },
        );
        assert!(!m.compare(&Text::new("dog")).found);
        assert_eq!(m.alphabet_rejections(), 1);
    }

    #[test]
    fn alphabet_filter_can_be_disabled() {
        let mut m = matcher(
            "cat",
            MatcherOptions {
                max_distance: Some(1),
                no_alphabet_filter: true,
                ..Default::default()
            },
        );
        assert!(!m.compare(&Text::new("dog")).found);
        assert_eq!(m.alphabet_rejections(), 0);
        // The engine did the rejecting instead.
        assert_eq!(m.last_distance(), Some(2));
    }

    #[test]
    fn transpositions_selectable() {
        let mut plain = matcher("ab", MatcherOptions::default());
        assert_eq!(plain.compare(&Text::new("ba")).distance, 2);

        let mut trans = matcher(
            "ab",
            MatcherOptions {
                transpositions: true,
                ..Default::default()
            },
        );
        assert_eq!(trans.compare(&Text::new("ba")).distance, 1);
    }

    #[test]
    fn codepoint_mode_measures_characters() {
        let mut m = matcher(
            "über",
            MatcherOptions {
                codepoints: true,
                ..Default::default()
            },
        );
        assert_eq!(m.compare(&Text::new("uber")).distance, 1);

        let mut bytes = matcher("über", MatcherOptions::default());
        // ü is two bytes, so the byte-oriented distance is 2.
        assert_eq!(bytes.compare(&Text::new("uber")).distance, 2);
    }

    #[test]
    fn bounded_codepoint_gate_counts_rejections() {
        let mut m = matcher(
            "über",
            MatcherOptions {
                max_distance: Some(2),
                codepoints: true,
                ..Default::default()
            },
        );
        assert!(!m.compare(&Text::new("xyz")).found);
        assert_eq!(m.codepoint_alphabet_rejections(), 1);
        // Gate rejections never reach the engine.
        assert_eq!(m.last_distance(), None);

        // A byte-only candidate is gated through its synthesized view.
        let raw = Text::from_bytes(vec![0xF0, 0x9F, 0x92, 0xA9]);
        assert!(!m.compare(&raw).found);
        assert_eq!(m.codepoint_alphabet_rejections(), 2);
    }

    #[test]
    fn bounded_codepoint_gate_passes_close_candidates() {
        let mut m = matcher(
            "über",
            MatcherOptions {
                max_distance: Some(2),
                codepoints: true,
                ..Default::default()
            },
        );
        // One miss (the u) stays under the bound; the engine decides.
        let result = m.compare(&Text::new("uber"));
        assert!(result.found);
        assert_eq!(result.distance, 1);
        assert_eq!(m.codepoint_alphabet_rejections(), 0);

        // Candidates no longer than the bound skip the gate entirely.
        let result = m.compare(&Text::new("zz"));
        assert!(!result.found);
        assert_eq!(m.codepoint_alphabet_rejections(), 0);
        assert_eq!(m.last_distance(), Some(4));
    }

    #[test]
    fn byte_candidates_in_codepoint_mode_use_the_sentinel() {
        let mut m = matcher(
            "naïve",
            MatcherOptions {
                codepoints: true,
                ..Default::default()
            },
        );
        // The candidate's 0xC3 0xAF pair cannot decode through the byte
        // view; both bytes count as substitutions/inserts against ï.
        let candidate = Text::from_bytes("naïve".as_bytes().to_vec());
        let result = m.compare(&candidate);
        assert_eq!(result.distance, 2);
    }

    #[test]
    fn scan_restores_bound() {
        let mut m = matcher(
            "cat",
            MatcherOptions {
                max_distance: Some(2),
                ..Default::default()
            },
        );
        let words: Vec<Text> = ["bat", "hat"].iter().map(|w| Text::new(w)).collect();
        m.nearest(words.iter());
        assert_eq!(m.max_distance(), Some(2));
    }

    #[test]
    fn nearest_keeps_first_best() {
        let mut m = matcher(
            "cat",
            MatcherOptions {
                max_distance: Some(2),
                ..Default::default()
            },
        );
        let words: Vec<Text> = ["bat", "hat", "mat"].iter().map(|w| Text::new(w)).collect();
        assert_eq!(m.nearest(words.iter()), Some(0));
    }

    #[test]
    fn nearest_stops_at_exact_match() {
        let mut m = matcher(
            "cat",
            MatcherOptions {
                max_distance: Some(2),
                ..Default::default()
            },
        );
        let words: Vec<Text> = ["hat", "cat", "bat"].iter().map(|w| Text::new(w)).collect();
        assert_eq!(m.nearest(words.iter()), Some(1));
        // The scan broke off before the last word.
        assert_eq!(m.scan.offset, 2);
    }

    #[test]
    fn empty_scan_finds_nothing() {
        let mut m = matcher("cat", MatcherOptions::default());
        let empty: Vec<Text> = Vec::new();
        assert_eq!(m.nearest(empty.iter()), None);
        assert!(m.nearest_ties(empty.iter()).is_empty());
    }
}
