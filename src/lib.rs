//! Unsupervised rhyme-learning and tagging engine for corpora of poetic
//! text.
//!
//! Given a corpus of poems, [`model::RhymeEngine`] learns, without
//! supervision, which line-final words rhyme in a given language, by
//! iterating between collocation statistics and a phonetic component model
//! until the two converge. A trained (or loaded) engine then tags unseen
//! poems by grouping their rhyming lines.
//!
//! The core pipeline is: [`ipa`] extracts a reversed phonetic fingerprint
//! from each line's transcribed final word; [`tokenizer`] and [`corpus`]
//! bind that to a line record and a rhyme-word vocabulary; [`frequency`]
//! and [`collocation`] find statistically significant word pairs within a
//! sliding window; [`probability`] turns those into per-component
//! probabilities; [`scorer`] and [`detector`] use the probabilities to find
//! and chain-link rhymes; [`training`] drives detection and estimation to a
//! fixed point; [`output`] renders the result.

pub mod collocation;
pub mod corpus;
pub mod detector;
pub mod error;
pub mod frequency;
pub mod ipa;
pub mod keys;
pub mod model;
pub mod output;
pub mod probability;
pub mod scorer;
pub mod settings;
pub mod tokenizer;
pub mod training;
pub mod transcriber;

pub use corpus::Poem;
pub use error::{Result, RhymeError};
pub use model::{RhymeEngine, TagOverrides};
pub use output::{OutputFormat, TagOutput};
pub use settings::Settings;
pub use training::TrainingReport;
pub use transcriber::Transcriber;
