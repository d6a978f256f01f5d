//! `textfuzzy` is a fuzzy string-matching library built around a fixed
//! reference string: construct a [`Matcher`] once, then test many candidates
//! against it (spelling suggestion, near-duplicate detection, typo-tolerant
//! dictionary lookup).
//!
//! ## Key Features
//!
//! - **Bounded edit distance**: plain Levenshtein and transposition-aware
//!   Damerau-Levenshtein, each in byte-oriented and codepoint-oriented form,
//!   with a distance bound that cuts work off early.
//! - **Multi-stage reject filters**: candidates are dropped by cheap length
//!   and alphabet checks before any dynamic programming runs. The filters
//!   only ever prune; they never change a result.
//! - **Scan protocol**: scans over word lists or line sources tighten the
//!   bound as better matches appear, so the whole stream is judged against
//!   the best seen so far.
//!
//! ## Usage
//!
//! ```rust
//! use textfuzzy::{Matcher, MatcherOptions, Text};
//!
//! // Single comparisons against one reference.
//! let mut matcher = Matcher::new("kitten", MatcherOptions::default()).unwrap();
//! let result = matcher.compare(&Text::new("sitting"));
//! assert_eq!(result.distance, 3);
//!
//! // Find the closest entry of a word list, within a bound.
//! let mut matcher = Matcher::new(
//!     "acquire",
//!     MatcherOptions {
//!         max_distance: Some(2),
//!         ..Default::default()
//!     },
//! )
//! .unwrap();
//! let words: Vec<Text> = ["akquire", "acquit", "banana"]
//!     .iter()
//!     .map(|w| Text::new(w))
//!     .collect();
//! assert_eq!(matcher.nearest(words.iter()), Some(0));
//! ```
//!
//! The distance functions are also usable on their own:
//!
//! ```rust
//! use textfuzzy::distance::{damerau, levenshtein};
//!
//! assert_eq!(2, levenshtein::distance(b"ab", b"ba", None));
//! assert_eq!(1, damerau::distance(b"ab", b"ba", None));
//! ```

#![forbid(unsafe_code)]
#![allow(
    // things are often more readable this way
    clippy::module_name_repetitions,
    // noisy
    clippy::missing_errors_doc,
)]

mod alphabet;
pub mod distance;
mod error;
mod matcher;
mod text;

pub use error::MatchError;
pub use matcher::{Candidate, Comparison, Matcher, MatcherOptions, MAX_LINE_BYTES};
pub use text::Text;
