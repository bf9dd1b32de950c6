//! Lexical similarity scoring and the duplicate gate
//!
//! - [`scorer`]: pure pairwise similarity in [0, 100]
//! - [`gate`]: fetches a candidate and every registered work, scores the
//!   pairs in registration order, and rejects at a fixed threshold

pub mod gate;
pub mod scorer;

pub use gate::{DuplicateGate, GateConfig, SimilarityVerdict};
pub use scorer::score;
