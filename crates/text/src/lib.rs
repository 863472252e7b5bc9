//! Text cleaning
//!
//! Strips characters that break downstream encoding (emoji/pictograph
//! ranges, control characters, the mathematical-operators block) and
//! collapses whitespace. Pure functions of their input: same input, same
//! output, no locale dependence.

mod cleaner;

pub use cleaner::{clean, clean_batch, clean_bytes, is_text_safe, CleanStats, CleanedText};
