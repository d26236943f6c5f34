//! Free-text query translation.
//!
//! Splits a text query into size, color and general tokens using a
//! [`ClassificationTable`] and turns them into an engine boolean query.

mod classification;
mod translator;

pub use classification::{ClassificationTable, ClassifiedTokens, DEFAULT_COLORS, DEFAULT_SIZES};
pub use translator::{QueryTranslator, PHRASE_BOOST};
