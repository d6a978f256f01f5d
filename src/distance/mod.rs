//! Bounded edit-distance implementations.
//!
//! Both functions are generic over the element type, so the same code runs
//! over bytes (`&[u8]`) and decoded codepoints. Passing a `max_distance`
//! restricts the work to what is needed to decide whether the distance lies
//! within the bound; the return value is then only exact when it is within
//! the bound.

pub mod damerau;
pub mod levenshtein;
